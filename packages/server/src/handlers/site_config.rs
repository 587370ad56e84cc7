use axum::{Json, extract::State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::site_config;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::site_config::{SiteConfigRequest, SiteConfigResponse};
use crate::seed::ensure_site_config;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Site Config",
    operation_id = "getSiteConfig",
    summary = "Get the header and footer text",
    description = "Public. Creates the configuration with default text on first load.",
    responses(
        (status = 200, description = "Site configuration", body = SiteConfigResponse),
        (status = 503, description = "Store unavailable (SERVICE_BUSY)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_site_config(
    State(state): State<AppState>,
) -> Result<Json<SiteConfigResponse>, AppError> {
    let model = ensure_site_config(&state.db).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/",
    tag = "Site Config",
    operation_id = "updateSiteConfig",
    summary = "Replace the header and footer text",
    request_body = SiteConfigRequest,
    responses(
        (status = 200, description = "Site configuration updated", body = SiteConfigResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(admin_id = auth_user.admin_id))]
pub async fn update_site_config(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SiteConfigRequest>,
) -> Result<Json<SiteConfigResponse>, AppError> {
    let payload = payload.validate()?;

    let txn = state.db.begin().await?;
    let existing = ensure_site_config(&txn).await?;

    let mut active: site_config::ActiveModel = existing.into();
    active.header_top = Set(payload.header_top);
    active.header_sub = Set(payload.header_sub);
    active.main_title = Set(payload.main_title);
    active.footer_copyright = Set(payload.footer_copyright);
    active.footer_address = Set(payload.footer_address);
    active.footer_support = Set(payload.footer_support);
    active.favicon_url = Set(payload.favicon_url);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!("Site configuration updated");
    Ok(Json(model.into()))
}
