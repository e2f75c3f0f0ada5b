// src/handlers/evaluation.rs

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::questions::load_catalog,
    models::{
        employee::Employee,
        evaluation::{
            EmployeeRef, EvaluateRequest, EvaluationListParams, NewEvaluationResult, ScoreRequest,
            SubmitEvaluationRequest,
        },
    },
    scoring::{
        Periode, Rating, ScoreSheet, classify_chapter_score, classify_global_score,
        compute_scores, validate_submitted_scores,
    },
    store::DynStore,
    utils::html::sanitize_chapter_comments,
};

/// Scores plus the qualitative rating of each of them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    #[serde(flatten)]
    pub sheet: ScoreSheet,
    pub global_rating: Rating,
    pub chapter_ratings: BTreeMap<String, Rating>,
}

impl From<ScoreSheet> for ScoreResponse {
    fn from(sheet: ScoreSheet) -> Self {
        let chapter_ratings = sheet
            .chapter_scores
            .iter()
            .map(|(name, score)| (name.clone(), classify_chapter_score(*score)))
            .collect();

        ScoreResponse {
            global_rating: classify_global_score(sheet.global_score),
            chapter_ratings,
            sheet,
        }
    }
}

/// Resolves the employee an evaluation is about.
/// A missing or unknown employee blocks the submission.
async fn resolve_employee(
    store: &DynStore,
    employee_ref: Option<&EmployeeRef>,
) -> Result<Employee, AppError> {
    let id = employee_ref
        .and_then(EmployeeRef::id)
        .ok_or_else(|| AppError::Validation("Missing employee selection".to_string()))?;

    store
        .get_employee(id)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Unknown employee {}", id)))
}

/// Computes scores for a set of answers without storing anything.
pub async fn score_answers(
    State(store): State<DynStore>,
    Json(req): Json<ScoreRequest>,
) -> Result<impl IntoResponse, AppError> {
    let catalog = load_catalog(&store).await?;
    let sheet = compute_scores(&catalog, &req.answers)?;

    Ok(Json(ScoreResponse::from(sheet)))
}

/// Scores raw answers server-side and stores the resulting evaluation.
pub async fn evaluate(
    State(store): State<DynStore>,
    Json(req): Json<EvaluateRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = req.validate() {
        return Err(AppError::Validation(validation_errors.to_string()));
    }

    let employee = resolve_employee(&store, req.employee_id.as_ref()).await?;
    let periode: Periode = req.periode.parse()?;
    let catalog = load_catalog(&store).await?;

    let sheet = compute_scores(&catalog, &req.answers).inspect_err(|e| {
        tracing::warn!("Rejected evaluation of employee {}: {}", employee.id, e);
    })?;
    let chapter_comments = sanitize_chapter_comments(&catalog, req.chapter_comments)?;

    let result = store
        .insert_result(NewEvaluationResult {
            employee_id: employee.id,
            employee_name: req.employee_name.unwrap_or_else(|| employee.full_name()),
            periode,
            chapter_scores: sheet.chapter_scores,
            global_score: sheet.global_score,
            chapter_comments,
        })
        .await?;

    tracing::info!(
        "Stored evaluation {} for employee {} ({}): {:.2}/20",
        result.id,
        employee.id,
        result.periode,
        result.global_score
    );

    Ok((StatusCode::CREATED, Json(result)))
}

/// Stores an evaluation whose scores were computed by the client.
///
/// The scores are checked again against the current catalog; resubmitting
/// the same employee and periode creates another record.
pub async fn submit_evaluation(
    State(store): State<DynStore>,
    Json(req): Json<SubmitEvaluationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = req.validate() {
        return Err(AppError::Validation(validation_errors.to_string()));
    }

    let employee = resolve_employee(&store, req.employee_id.as_ref()).await?;
    let periode: Periode = req.periode.parse()?;
    let catalog = load_catalog(&store).await?;

    validate_submitted_scores(&catalog, &req.chapter_scores, req.global_score).inspect_err(|e| {
        tracing::warn!("Rejected submission for employee {}: {}", employee.id, e);
    })?;
    let chapter_comments = sanitize_chapter_comments(&catalog, req.chapter_comments)?;

    let result = store
        .insert_result(NewEvaluationResult {
            employee_id: employee.id,
            employee_name: req.employee_name,
            periode,
            chapter_scores: req.chapter_scores,
            global_score: req.global_score,
            chapter_comments,
        })
        .await?;

    tracing::info!(
        "Stored submitted evaluation {} for employee {} ({})",
        result.id,
        employee.id,
        result.periode
    );

    Ok((StatusCode::CREATED, Json(result)))
}

/// Lists results, optionally narrowed by year, month and chef scope.
pub async fn list_evaluations(
    State(store): State<DynStore>,
    Query(params): Query<EvaluationListParams>,
) -> Result<impl IntoResponse, AppError> {
    let filter = params.into_filter()?;
    let results = store.list_results(&filter).await?;

    Ok(Json(results))
}

pub async fn get_evaluation(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = store
        .get_result(id)
        .await?
        .ok_or(AppError::NotFound("Evaluation not found".to_string()))?;

    Ok(Json(result))
}
