// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{LoginRequest, LoginResponse, RefreshResponse, SessionUser},
};

// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let response = app_state
        .token_service
        .login_user(&payload.email, &payload.password)?;

    Ok(Json(response))
}

// POST /api/auth/logout
// Os tokens não têm estado no servidor; o cliente descarta o dele.
pub async fn logout(AuthenticatedUser(user): AuthenticatedUser) -> StatusCode {
    tracing::info!("Logout de {}", user.email);
    StatusCode::NO_CONTENT
}

// POST /api/auth/refresh
pub async fn refresh(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<RefreshResponse>, AppError> {
    let token = app_state.token_service.create_token(&user)?;
    Ok(Json(RefreshResponse { token }))
}

// GET /api/users/me
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<SessionUser> {
    Json(SessionUser::from(&user))
}
