use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use common::import::{TEMPLATE_FILE_NAME, rows_from_sheet, validate_batch};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::student;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::handlers::student::map_unique_violation;
use crate::models::import::ImportResponse;
use crate::state::AppState;
use crate::utils::spreadsheet::{build_template, read_first_sheet};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Rows per INSERT statement; keeps SQLite under its bind-parameter limit.
const INSERT_CHUNK_SIZE: usize = 500;

#[utoipa::path(
    post,
    path = "/import",
    tag = "Import",
    operation_id = "importStudents",
    summary = "Bulk import records from a spreadsheet",
    description = "Reads the first worksheet of the uploaded `.xlsx` file (multipart field `file`). Row 1 is the header; columns are full name, exam ID, national ID, school, subject, score, award. Every row is validated against the rest of the batch and the roster. If any row fails, nothing is inserted and the first failing row is reported.",
    request_body(content_type = "multipart/form-data", description = "`.xlsx` workbook in the `file` field"),
    responses(
        (status = 201, description = "Whole batch inserted", body = ImportResponse),
        (status = 400, description = "Unreadable file (VALIDATION_ERROR) or rejected row (IMPORT_REJECTED)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Concurrent write took an identifier (PERSISTENCE_CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(admin_id = auth_user.admin_id))]
pub async fn import_students(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut file: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
            file = Some(data.to_vec());
            break;
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    if file.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".into()));
    }

    let rows = rows_from_sheet(read_first_sheet(&file)?);
    if rows.is_empty() {
        return Err(AppError::Validation(
            "Spreadsheet contains no data rows".into(),
        ));
    }
    let max_rows = state.config.import.max_rows;
    if rows.len() > max_rows {
        return Err(AppError::Validation(format!(
            "Spreadsheet has {} data rows; at most {max_rows} are accepted per import",
            rows.len()
        )));
    }

    let roster = state.roster.snapshot(&state.db).await?;
    let accepted = validate_batch(&rows, &roster).map_err(|rejection| {
        tracing::info!(
            row = rejection.row,
            rule = rejection.reason.rule(),
            "Import rejected"
        );
        AppError::ImportRejected(rejection)
    })?;

    let now = chrono::Utc::now();
    let models: Vec<student::ActiveModel> = accepted
        .into_iter()
        .map(|fields| student::ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(fields.full_name),
            sbd: Set(fields.sbd),
            cccd: Set(fields.cccd),
            school: Set(fields.school),
            subject: Set(fields.subject),
            score: Set(fields.score),
            award: Set(fields.award),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .collect();
    let inserted = models.len();

    let txn = state.db.begin().await?;
    for chunk in models.chunks(INSERT_CHUNK_SIZE) {
        student::Entity::insert_many(chunk.to_vec())
            .exec_without_returning(&txn)
            .await
            .map_err(map_unique_violation)?;
    }
    txn.commit().await?;
    state.roster.invalidate().await;

    tracing::info!(inserted, "Import committed");
    Ok((StatusCode::CREATED, Json(ImportResponse { inserted })))
}

#[utoipa::path(
    get,
    path = "/import/template",
    tag = "Import",
    operation_id = "downloadImportTemplate",
    summary = "Download the import template",
    description = "An `.xlsx` workbook with the expected header row and two sample rows.",
    responses(
        (status = 200, description = "Template workbook (`.xlsx` bytes)"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_auth_user))]
pub async fn download_template(_auth_user: AuthUser) -> Result<impl IntoResponse, AppError> {
    let bytes =
        build_template().map_err(|e| AppError::Internal(format!("Template build error: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{TEMPLATE_FILE_NAME}\""),
            ),
        ],
        bytes,
    ))
}

/// Body limit layer for the upload route.
pub fn upload_body_limit(max_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_bytes)
}
