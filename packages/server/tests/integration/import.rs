use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;

use crate::common::{TestApp, routes, workbook};

#[tokio::test]
async fn valid_batch_is_inserted_whole() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let file = workbook(&[
        ["nguyễn văn a", "hsg001", "001203004567", "THPT A", "Toán", "18,5", "Giải Nhất"],
        ["", "", "", "", "", "", ""],
        ["Trần Thị B", "HSG002", "001-203-004-568", "THPT B", "Lý", "12", ""],
    ]);

    let res = app.upload(routes::IMPORT, file, &token).await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["inserted"], 2);

    let res = app
        .post(
            routes::SEARCH,
            &json!({"full_name": "NGUYỄN VĂN A", "sbd": "HSG001", "cccd": "001203004567"}),
            None,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["score_display"], "18.50");
    assert_eq!(res.body["award"], "Giải Nhất");

    let res = app
        .post(
            routes::SEARCH,
            &json!({"full_name": "trần thị b", "sbd": "hsg002", "cccd": "001203004568"}),
            None,
        )
        .await;
    assert_eq!(res.body["award"], "Không đạt");
}

#[tokio::test]
async fn duplicate_within_batch_rejects_everything() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let file = workbook(&[
        ["A", "HSG001", "001203004567", "", "", "10", ""],
        ["B", "hsg001", "001203004568", "", "", "10", ""],
    ]);

    let res = app.upload(routes::IMPORT, file, &token).await;

    assert_eq!(res.status, 400, "{}", res.text);
    assert_eq!(res.body["code"], "IMPORT_REJECTED");
    assert_eq!(res.body["details"]["row"], 3);
    assert_eq!(res.body["details"]["rule"], "duplicate_in_batch");
    assert_eq!(res.body["details"]["first_row"], 2);
    assert_eq!(res.body["details"]["value"], "HSG001");

    let res = app.get(routes::STUDENTS, Some(&token)).await;
    assert_eq!(res.body["pagination"]["total"], 0);
}

#[tokio::test]
async fn collision_with_roster_names_the_existing_record() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let existing = app
        .create_student(&token, "A", "HSG001", "001203004567")
        .await;
    let file = workbook(&[
        ["C", "HSG010", "001203004570", "", "", "10", ""],
        ["B", "HSG002", "001 203 004 567", "", "", "10", ""],
    ]);

    let res = app.upload(routes::IMPORT, file, &token).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["details"]["rule"], "duplicate_in_roster");
    assert_eq!(res.body["details"]["field"], "cccd");
    assert_eq!(res.body["details"]["existing_id"], existing);

    let res = app.get(routes::STUDENTS, Some(&token)).await;
    assert_eq!(res.body["pagination"]["total"], 1);
}

#[tokio::test]
async fn invalid_national_id_is_reported_with_its_row() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let file = workbook(&[["A", "HSG001", "0012030045", "", "", "10", ""]]);

    let res = app.upload(routes::IMPORT, file, &token).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["details"]["row"], 2);
    assert_eq!(res.body["details"]["rule"], "invalid_national_id");
}

#[tokio::test]
async fn header_only_sheet_is_a_validation_error() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app.upload(routes::IMPORT, workbook::<&str>(&[]), &token).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn non_spreadsheet_upload_is_a_validation_error() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .upload(routes::IMPORT, b"name,sbd,cccd\n".to_vec(), &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn too_many_rows_are_refused() {
    let app = TestApp::spawn_with(|config| config.import.max_rows = 1).await;
    let token = app.admin_token().await;
    let file = workbook(&[
        ["A", "HSG001", "001203004567", "", "", "10", ""],
        ["B", "HSG002", "001203004568", "", "", "10", ""],
    ]);

    let res = app.upload(routes::IMPORT, file, &token).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn downloaded_template_imports_cleanly() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .client
        .get(format!("http://{}{}", app.addr, routes::IMPORT_TEMPLATE))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let disposition = res.headers()["content-disposition"].to_str().unwrap();
    assert!(disposition.contains("Mau_Nhap_Diem_HSG.xlsx"));
    let bytes = res.bytes().await.unwrap().to_vec();

    let res = app.upload(routes::IMPORT, bytes, &token).await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["inserted"], 2);
}

#[tokio::test]
async fn import_requires_authentication() {
    let app = TestApp::spawn().await;

    let res = app
        .client
        .post(format!("http://{}{}", app.addr, routes::IMPORT))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 401);
}

#[tokio::test]
async fn unique_violation_in_a_later_chunk_rolls_back_the_whole_batch() {
    let app = TestApp::spawn_with(|config| config.import.max_rows = 1000).await;
    let token = app.admin_token().await;
    app.create_student(&token, "A", "HSG001", "001203004567")
        .await;

    // A refused duplicate leaves the freshly loaded snapshot cached.
    let res = app
        .post(
            routes::STUDENTS,
            &crate::common::student_body("A", "HSG001", "001203004567"),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, 409);

    // Written behind the cache's back; collides with row 510 of the batch.
    let now = chrono::Utc::now();
    server::entity::student::ActiveModel {
        id: Set(uuid::Uuid::new_v4()),
        full_name: Set("OUTSIDE WRITER".into()),
        sbd: Set("HSG0510".into()),
        cccd: Set("009999999999".into()),
        school: Set(String::new()),
        subject: Set(String::new()),
        score: Set(1.0),
        award: Set(::common::Award::NotAwarded),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&app.db)
    .await
    .unwrap();

    let rows: Vec<[String; 7]> = (0..520)
        .map(|i| {
            [
                format!("HOC SINH {i}"),
                format!("HSG{i:04}"),
                format!("0012030{i:05}"),
                String::new(),
                String::new(),
                "10".to_string(),
                String::new(),
            ]
        })
        .collect();

    let res = app.upload(routes::IMPORT, workbook(&rows), &token).await;

    assert_eq!(res.status, 409, "{}", res.text);
    assert_eq!(res.body["code"], "PERSISTENCE_CONFLICT");

    let res = app.get(routes::STUDENTS, Some(&token)).await;
    assert_eq!(res.body["pagination"]["total"], 2);
}
