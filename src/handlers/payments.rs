// src/handlers/payments.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AdminUser, AuthenticatedUser},
    models::payment::{CreatePaymentRequest, RecordPaymentRequest},
};

// GET /api/payments
pub async fn list_payments(
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let payments = app_state.services.payments.get_all().await?;
    Ok((StatusCode::OK, Json(payments)))
}

// GET /api/payments/student/{id}
pub async fn payments_by_student(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !user.can_access_student(&student_id) {
        return Err(AppError::Forbidden);
    }

    let payments = app_state.services.payments.get_by_student_id(&student_id).await?;
    Ok((StatusCode::OK, Json(payments)))
}

// POST /api/payments
pub async fn create_payment(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let payment = app_state.services.payments.create(payload).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

// POST /api/payments/record
pub async fn record_payment(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    app_state
        .services
        .payments
        .record_payment(&payload.student_id, &payload.month)
        .await?;

    tracing::info!(
        "{} registrou o pagamento de {} ({})",
        admin.email,
        payload.student_id,
        payload.month
    );
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/payments/summary
pub async fn payment_summary(
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.services.payments.get_summary().await?;
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/payments/overdue
pub async fn overdue_payments(
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let payments = app_state.services.payments.get_overdue_payments().await?;
    Ok((StatusCode::OK, Json(payments)))
}
