use serde_json::json;

use crate::common::{ADMIN_EMAIL, ADMIN_PASSWORD, TestApp, routes};

mod login {
    use super::*;

    #[tokio::test]
    async fn seeded_admin_can_log_in() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::LOGIN,
                &json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}),
                None,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["email"], ADMIN_EMAIL);
    }

    #[tokio::test]
    async fn email_is_case_insensitive() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::LOGIN,
                &json!({"email": "  ADMIN@School.edu.vn ", "password": ADMIN_PASSWORD}),
                None,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::LOGIN,
                &json!({"email": ADMIN_EMAIL, "password": "nope"}),
                None,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_email_is_rejected_the_same_way() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::LOGIN,
                &json!({"email": "someone@else.vn", "password": ADMIN_PASSWORD}),
                None,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn there_is_no_fallback_admin_when_none_is_configured() {
        let app = TestApp::spawn_with(|config| {
            config.auth.admin_email = None;
            config.auth.admin_password = None;
        })
        .await;

        let res = app
            .post(
                routes::LOGIN,
                &json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}),
                None,
            )
            .await;

        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::LOGIN, &json!({"email": 5}), None).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod me {
    use super::*;

    #[tokio::test]
    async fn returns_the_logged_in_admin() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app.get(routes::ME, Some(&token)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["email"], ADMIN_EMAIL);
        assert!(res.body["id"].is_number());
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::ME, None).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::ME, Some("not-a-jwt")).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod session {
    use super::*;

    #[tokio::test]
    async fn root_path_shows_search() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::session("/"), None).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["state"], json!({"view": "search"}));
        assert_eq!(res.body["authenticated"], false);
    }

    #[tokio::test]
    async fn admin_path_without_token_shows_login_form() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::session("/admin"), None).await;

        assert_eq!(
            res.body["state"],
            json!({"view": "admin", "admin": "logged_out"})
        );
    }

    #[tokio::test]
    async fn admin_path_with_token_shows_management() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app.get(&routes::session("/admin"), Some(&token)).await;

        assert_eq!(
            res.body["state"],
            json!({"view": "admin", "admin": "logged_in"})
        );
        assert_eq!(res.body["authenticated"], true);
        assert_eq!(res.body["email"], ADMIN_EMAIL);
    }

    #[tokio::test]
    async fn invalid_token_is_treated_as_logged_out() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::session("/admin"), Some("stale")).await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.body["state"],
            json!({"view": "admin", "admin": "logged_out"})
        );
    }
}
