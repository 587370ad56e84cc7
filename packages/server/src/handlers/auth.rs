use axum::{
    Json,
    extract::{Query, State},
};
use common::view::View;
use sea_orm::*;
use tracing::instrument;

use crate::entity::admin_user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, MaybeAuthUser};
use crate::extractors::json::AppJson;
use crate::models::auth::{
    LoginRequest, LoginResponse, MeResponse, SessionQuery, SessionResponse,
};
use crate::state::AppState;
use crate::utils::{hash, jwt};

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in as an administrator",
    description = "Checks the email and password against the stored administrators and returns a bearer token. Emails are compared case-insensitively.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong email or password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();

    let admin = admin_user::Entity::find()
        .filter(admin_user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let is_valid = hash::verify_password(&payload.password, &admin.password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {e}")))?;
    if !is_valid {
        tracing::info!(admin_id = admin.id, "Rejected login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = jwt::sign(
        admin.id,
        &admin.email,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_hours,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))?;

    tracing::info!(admin_id = admin.id, "Administrator logged in");

    Ok(Json(LoginResponse {
        token,
        email: admin.email,
    }))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "getCurrentAdmin",
    summary = "Get the logged-in administrator",
    responses(
        (status = 200, description = "Current administrator", body = MeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(admin_id = auth_user.admin_id))]
pub async fn me(auth_user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth_user.admin_id,
        email: auth_user.email,
    })
}

#[utoipa::path(
    get,
    path = "/session",
    tag = "Auth",
    operation_id = "getSession",
    summary = "Resolve the view for a path",
    description = "Returns which view a client opening `path` should show: the public search, or the admin area logged out or logged in. A missing or invalid token is treated as logged out.",
    params(SessionQuery),
    responses(
        (status = 200, description = "View state", body = SessionResponse),
    ),
)]
#[instrument(skip(auth, query))]
pub async fn session(
    MaybeAuthUser(auth): MaybeAuthUser,
    Query(query): Query<SessionQuery>,
) -> Json<SessionResponse> {
    let path = query.path.as_deref().unwrap_or("/");
    let authenticated = auth.is_some();

    Json(SessionResponse {
        state: View::for_path(path, authenticated),
        authenticated,
        email: auth.map(|a| a.email),
    })
}
