use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::normalize::normalize_name;
use common::{Duplicate, IdentityField, StudentFields, check_duplicate};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::LikeExpr;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::student;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::student::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Students",
    operation_id = "listStudents",
    summary = "List the roster",
    description = "Returns a page of records, most recently created first. `search` matches anywhere in the full name or exam ID, case-insensitively.",
    params(StudentListQuery),
    responses(
        (status = 200, description = "Page of records", body = StudentListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query))]
pub async fn list_students(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<StudentListQuery>,
) -> Result<Json<StudentListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    // Database offsets are signed 64-bit.
    let offset = (page - 1)
        .checked_mul(per_page)
        .filter(|offset| i64::try_from(*offset).is_ok())
        .ok_or_else(|| AppError::Validation("page is out of range".into()))?;

    let mut select = student::Entity::find();

    if let Some(ref search) = query.search {
        // Names and exam IDs are stored uppercase.
        let term = escape_like(&normalize_name(search));
        if !term.is_empty() {
            let pattern = format!("%{term}%");
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::col(student::Column::FullName)
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(Expr::col(student::Column::Sbd).like(LikeExpr::new(pattern).escape('\\'))),
            );
        }
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by_desc(student::Column::CreatedAt)
        .order_by_asc(student::Column::Sbd)
        .offset(Some(offset))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(StudentResponse::from)
        .collect();

    Ok(Json(StudentListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Students",
    operation_id = "createStudent",
    summary = "Add a record",
    description = "Normalizes the fields, then refuses the record if its exam ID or national ID is already in the roster.",
    request_body = StudentRequest,
    responses(
        (status = 201, description = "Record created", body = StudentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Exam ID or national ID taken (DUPLICATE_RECORD, PERSISTENCE_CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload))]
pub async fn create_student(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<StudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let fields = payload.into_fields()?;

    let roster = state.roster.snapshot(&state.db).await?;
    if let Some(dup) = check_duplicate(&fields.sbd, &fields.cccd, &roster, None) {
        return Err(duplicate_error(&dup, &fields));
    }

    let now = chrono::Utc::now();
    let new_student = student::ActiveModel {
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
    };

    let model = new_student
        .insert(&state.db)
        .await
        .map_err(map_unique_violation)?;
    state.roster.invalidate().await;

    Ok((StatusCode::CREATED, Json(StudentResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Students",
    operation_id = "getStudent",
    summary = "Get a record by ID",
    params(("id" = Uuid, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Record", body = StudentResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Record not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(%id))]
pub async fn get_student(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentResponse>, AppError> {
    let model = find_student(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Students",
    operation_id = "updateStudent",
    summary = "Replace a record",
    description = "Replaces every field of the record. The record itself is ignored by the duplicate check, so keeping its own exam ID and national ID is allowed.",
    params(("id" = Uuid, Path, description = "Record ID")),
    request_body = StudentRequest,
    responses(
        (status = 200, description = "Record updated", body = StudentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Record not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Exam ID or national ID taken (DUPLICATE_RECORD, PERSISTENCE_CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(%id))]
pub async fn update_student(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<StudentRequest>,
) -> Result<Json<StudentResponse>, AppError> {
    let fields = payload.into_fields()?;

    let existing = find_student(&state.db, id).await?;

    let roster = state.roster.snapshot(&state.db).await?;
    if let Some(dup) = check_duplicate(&fields.sbd, &fields.cccd, &roster, Some(id)) {
        return Err(duplicate_error(&dup, &fields));
    }

    let mut active: student::ActiveModel = existing.into();
    active.full_name = Set(fields.full_name);
    active.sbd = Set(fields.sbd);
    active.cccd = Set(fields.cccd);
    active.school = Set(fields.school);
    active.subject = Set(fields.subject);
    active.score = Set(fields.score);
    active.award = Set(fields.award);
    active.updated_at = Set(chrono::Utc::now());

    let model = active
        .update(&state.db)
        .await
        .map_err(map_unique_violation)?;
    state.roster.invalidate().await;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Students",
    operation_id = "deleteStudent",
    summary = "Delete a record",
    params(("id" = Uuid, Path, description = "Record ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Record not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(%id))]
pub async fn delete_student(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = student::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Record not found".into()));
    }
    state.roster.invalidate().await;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/",
    tag = "Students",
    operation_id = "deleteAllStudents",
    summary = "Delete the whole roster",
    description = "Removes every record. Refused unless `confirm=true` is passed.",
    params(DeleteAllQuery),
    responses(
        (status = 200, description = "Roster cleared", body = DeleteAllResponse),
        (status = 400, description = "Missing confirmation (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(admin_id = auth_user.admin_id))]
pub async fn delete_all_students(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<DeleteAllQuery>,
) -> Result<Json<DeleteAllResponse>, AppError> {
    if query.confirm != Some(true) {
        return Err(AppError::Validation(
            "Deleting all records requires confirm=true".into(),
        ));
    }

    let result = student::Entity::delete_many().exec(&state.db).await?;
    state.roster.invalidate().await;

    tracing::warn!(deleted = result.rows_affected, "Roster cleared");
    Ok(Json(DeleteAllResponse {
        deleted: result.rows_affected,
    }))
}

async fn find_student<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<student::Model, AppError> {
    student::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Record not found".into()))
}

fn duplicate_error(dup: &Duplicate<'_>, fields: &StudentFields) -> AppError {
    let value = match dup.field {
        IdentityField::ExamId => &fields.sbd,
        IdentityField::NationalId => &fields.cccd,
    };
    AppError::Duplicate(format!(
        "The {} {} already belongs to {} ({})",
        dup.field, value, dup.record.full_name, dup.record.sbd
    ))
}

/// The roster snapshot can lag behind the table; the unique indexes decide.
pub(crate) fn map_unique_violation(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::warn!(%detail, "Unique constraint rejected a write");
            AppError::Conflict("The exam ID or national ID is already in use".into())
        }
        _ => AppError::from(e),
    }
}
