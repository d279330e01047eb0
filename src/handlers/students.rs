// src/handlers/students.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AdminUser, AuthenticatedUser},
    models::student::{
        CreateStudentRequest, Instrument, PaymentStatus, SearchQuery, UpdateStudentRequest,
    },
};

// GET /api/students
pub async fn list_students(
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let students = app_state.services.students.get_all().await?;
    Ok((StatusCode::OK, Json(students)))
}

// GET /api/students/{id}
pub async fn get_student(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !user.can_access_student(&id) {
        return Err(AppError::Forbidden);
    }

    let student = app_state
        .services
        .students
        .get_by_id(&id)
        .await?
        .ok_or(AppError::StudentNotFound(id))?;

    Ok((StatusCode::OK, Json(student)))
}

// POST /api/students
pub async fn create_student(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let student = app_state.services.students.create(payload).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

// PUT /api/students/{id}
pub async fn update_student(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let student = app_state.services.students.update(&id, payload).await?;
    Ok((StatusCode::OK, Json(student)))
}

// DELETE /api/students/{id}
// Idempotente: excluir um id inexistente também responde 204.
pub async fn delete_student(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    app_state.services.students.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/students/search?q=
pub async fn search_students(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let students = app_state.services.students.search(&query.q).await?;
    Ok((StatusCode::OK, Json(students)))
}

// GET /api/students/by-instrument/{instrument}
pub async fn students_by_instrument(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(instrument): Path<Instrument>,
) -> Result<impl IntoResponse, AppError> {
    let students = app_state.services.students.get_by_instrument(instrument).await?;
    Ok((StatusCode::OK, Json(students)))
}

// GET /api/students/by-payment-status/{status}
pub async fn students_by_payment_status(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(status): Path<PaymentStatus>,
) -> Result<impl IntoResponse, AppError> {
    let students = app_state.services.students.get_by_payment_status(status).await?;
    Ok((StatusCode::OK, Json(students)))
}
