// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{employee::CreateEmployeeRequest, question::CreateQuestionRequest},
    store::DynStore,
    utils::jwt::Claims,
};

/// Creates an employee record.
/// Admin only.
pub async fn create_employee(
    State(store): State<DynStore>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::Validation(validation_errors.to_string()));
    }

    let employee = store.insert_employee(payload).await?;

    Ok((StatusCode::CREATED, Json(employee)))
}

/// Adds a question to the catalog. Chapter weights change with the next load.
/// Admin only.
pub async fn create_question(
    State(store): State<DynStore>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::Validation(validation_errors.to_string()));
    }

    let question = store.insert_question(payload).await?;

    Ok((StatusCode::CREATED, Json(question)))
}

/// Deletes a catalog question by ID.
/// Admin only.
pub async fn delete_question(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_question(id).await? {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Deletes an evaluation result. The only mutation a stored result allows.
/// Admin only.
pub async fn delete_evaluation(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_result(id).await? {
        return Err(AppError::NotFound("Evaluation not found".to_string()));
    }

    tracing::info!("Evaluation {} deleted by {}", id, claims.sub);

    Ok(StatusCode::NO_CONTENT)
}
