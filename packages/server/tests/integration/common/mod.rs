use std::net::SocketAddr;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use rust_xlsxwriter::Workbook;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tempfile::TempDir;

use server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ImportConfig, SearchConfig, ServerConfig,
};
use server::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@school.edu.vn";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

pub mod routes {
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const ME: &str = "/api/v1/auth/me";
    pub const SEARCH: &str = "/api/v1/search";
    pub const STUDENTS: &str = "/api/v1/students";
    pub const IMPORT: &str = "/api/v1/students/import";
    pub const IMPORT_TEMPLATE: &str = "/api/v1/students/import/template";
    pub const SITE_CONFIG: &str = "/api/v1/site-config";

    pub fn session(path: &str) -> String {
        format!("/api/v1/auth/session?path={path}")
    }

    pub fn student(id: &str) -> String {
        format!("/api/v1/students/{id}")
    }
}

/// A running test server backed by its own SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    _db_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

fn test_config(db_url: String) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            url: db_url,
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 8,
        },
        auth: AuthConfig {
            jwt_secret: "test-secret-for-integration-tests".to_string(),
            token_ttl_hours: 1,
            admin_email: Some(ADMIN_EMAIL.to_string()),
            admin_password: Some(ADMIN_PASSWORD.to_string()),
        },
        search: SearchConfig { timeout_ms: 5000 },
        import: ImportConfig {
            max_rows: 100,
            max_upload_bytes: 1024 * 1024,
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with a tweaked configuration.
    pub async fn spawn_with(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let db_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            db_dir.path().join("portal.db").display()
        );

        let mut config = test_config(db_url);
        customize(&mut config);

        let db = server::database::init_db(&config.database)
            .await
            .expect("Failed to initialize test database");
        server::seed::seed_admin(&db, &config.auth)
            .await
            .expect("Failed to seed administrator");

        let app = server::build_router(AppState::new(db.clone(), config));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            _db_dir: db_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn with_token(builder: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
        match token {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        }
    }

    pub async fn post(&self, path: &str, body: &Value, token: Option<&str>) -> TestResponse {
        let req = Self::with_token(self.client.post(self.url(path)), token);
        let res = req
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    pub async fn put(&self, path: &str, body: &Value, token: Option<&str>) -> TestResponse {
        let req = Self::with_token(self.client.put(self.url(path)), token);
        let res = req
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");
        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let req = Self::with_token(self.client.get(self.url(path)), token);
        let res = req.send().await.expect("Failed to send GET request");
        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        let req = Self::with_token(self.client.delete(self.url(path)), token);
        let res = req.send().await.expect("Failed to send DELETE request");
        TestResponse::from_response(res).await
    }

    /// Upload `bytes` as the `file` field of a multipart form.
    pub async fn upload(&self, path: &str, bytes: Vec<u8>, token: &str) -> TestResponse {
        let form = Form::new().part("file", Part::bytes(bytes).file_name("diem.xlsx"));
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart request");
        TestResponse::from_response(res).await
    }

    /// Log in as the seeded administrator and return the token.
    pub async fn admin_token(&self) -> String {
        let res = self
            .post(
                routes::LOGIN,
                &serde_json::json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}),
                None,
            )
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Create a record via the API and return its `id`.
    pub async fn create_student(
        &self,
        token: &str,
        full_name: &str,
        sbd: &str,
        cccd: &str,
    ) -> String {
        let res = self
            .post(
                routes::STUDENTS,
                &student_body(full_name, sbd, cccd),
                Some(token),
            )
            .await;
        assert_eq!(res.status, 201, "create_student failed: {}", res.text);
        res.id()
    }
}

pub fn student_body(full_name: &str, sbd: &str, cccd: &str) -> Value {
    serde_json::json!({
        "full_name": full_name,
        "sbd": sbd,
        "cccd": cccd,
        "school": "THPT Chuyên",
        "subject": "Toán học",
        "score": 17.25,
        "award": "Giải Nhì",
    })
}

/// Build an `.xlsx` workbook with the import header row followed by `rows`.
pub fn workbook<S: AsRef<str>>(rows: &[[S; 7]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in ::common::import::TEMPLATE_HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            let cell = cell.as_ref();
            if !cell.is_empty() {
                sheet.write_string(r as u32 + 1, col as u16, cell).unwrap();
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> String {
        self.body["id"]
            .as_str()
            .expect("response body should contain 'id'")
            .to_string()
    }
}
