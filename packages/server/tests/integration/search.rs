use sea_orm::TransactionTrait;
use serde_json::json;

use crate::common::{TestApp, routes};

async fn app_with_record() -> (TestApp, String) {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let id = app
        .create_student(&token, "NGUYEN VAN A", "HSG001", "001203004567")
        .await;
    (app, id)
}

#[tokio::test]
async fn exact_triple_finds_the_record_regardless_of_case() {
    let (app, id) = app_with_record().await;

    let res = app
        .post(
            routes::SEARCH,
            &json!({"full_name": "nguyen van a", "sbd": "hsg001", "cccd": "001203004567"}),
            None,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["id"], id);
    assert_eq!(res.body["score_display"], "17.25");
    assert_eq!(res.body["award"], "Giải Nhì");
}

#[tokio::test]
async fn off_by_one_national_id_is_not_found() {
    let (app, _) = app_with_record().await;

    let res = app
        .post(
            routes::SEARCH,
            &json!({"full_name": "nguyen van a", "sbd": "hsg001", "cccd": "001203004568"}),
            None,
        )
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn matching_name_with_wrong_exam_id_is_not_found() {
    let (app, _) = app_with_record().await;

    let res = app
        .post(
            routes::SEARCH,
            &json!({"full_name": "NGUYEN VAN A", "sbd": "HSG002", "cccd": "001203004567"}),
            None,
        )
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn partial_name_is_not_a_match() {
    let (app, _) = app_with_record().await;

    let res = app
        .post(
            routes::SEARCH,
            &json!({"full_name": "NGUYEN VAN", "sbd": "HSG001", "cccd": "001203004567"}),
            None,
        )
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn separators_and_extra_spaces_are_ignored() {
    let (app, id) = app_with_record().await;

    let res = app
        .post(
            routes::SEARCH,
            &json!({"full_name": "  nguyen  van   a ", "sbd": " HSG001 ", "cccd": "001-203-004-567"}),
            None,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["id"], id);
}

#[tokio::test]
async fn short_national_id_is_a_validation_error() {
    let (app, _) = app_with_record().await;

    let res = app
        .post(
            routes::SEARCH,
            &json!({"full_name": "NGUYEN VAN A", "sbd": "HSG001", "cccd": "00120300"}),
            None,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn blank_name_is_a_validation_error() {
    let (app, _) = app_with_record().await;

    let res = app
        .post(
            routes::SEARCH,
            &json!({"full_name": "   ", "sbd": "HSG001", "cccd": "001203004567"}),
            None,
        )
        .await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn unavailable_store_reports_service_busy() {
    let app = TestApp::spawn_with(|config| {
        config.database.max_connections = 1;
        config.search.timeout_ms = 50;
    })
    .await;

    // Hold the only pooled connection so the lookup cannot start.
    let txn = app.db.begin().await.unwrap();

    let res = app
        .post(
            routes::SEARCH,
            &json!({"full_name": "NGUYEN VAN A", "sbd": "HSG001", "cccd": "001203004567"}),
            None,
        )
        .await;

    assert_eq!(res.status, 503, "{}", res.text);
    assert_eq!(res.body["code"], "SERVICE_BUSY");

    txn.rollback().await.unwrap();
}
