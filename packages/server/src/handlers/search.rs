use std::time::Duration;

use axum::{Json, extract::State};
use common::search::SearchQuery;
use sea_orm::*;
use tracing::instrument;

use crate::entity::student;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::search::{SearchRequest, SearchResultResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Search",
    operation_id = "searchResult",
    summary = "Look up one candidate's result",
    description = "Returns the record whose exam ID and national ID both equal the normalized input and whose full name matches case-insensitively. Partial matches are never returned. The national ID may contain separators; its first 12 digits are used.",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching record", body = SearchResultResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "No matching record (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "Store unavailable or too slow, retry later (SERVICE_BUSY)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn search(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SearchRequest>,
) -> Result<Json<SearchResultResponse>, AppError> {
    let query = SearchQuery::normalize(&payload.full_name, &payload.sbd, &payload.cccd)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let timeout = Duration::from_millis(state.config.search.timeout_ms);
    let found = tokio::time::timeout(timeout, find_match(&state.db, &query))
        .await
        .map_err(|_| {
            tracing::warn!(timeout_ms = state.config.search.timeout_ms, "Search timed out");
            AppError::ServiceBusy
        })??;

    let record = found.ok_or_else(|| {
        AppError::NotFound("No result matches the given name, exam ID and national ID".into())
    })?;

    Ok(Json(record.into()))
}

async fn find_match<C: ConnectionTrait>(
    db: &C,
    query: &SearchQuery,
) -> Result<Option<student::Model>, AppError> {
    let candidates = student::Entity::find()
        .filter(student::Column::Sbd.eq(&query.sbd))
        .filter(student::Column::Cccd.eq(&query.cccd))
        .all(db)
        .await?;

    let mut matches = candidates
        .into_iter()
        .filter(|m| query.name_matches(&m.full_name));
    let first = matches.next();
    if matches.next().is_some() {
        return Err(AppError::Internal(
            "More than one record shares an exam ID and national ID".into(),
        ));
    }

    Ok(first)
}
