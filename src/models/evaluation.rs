// src/models/evaluation.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::AppError,
    models::employee::EmployeeSummary,
    scoring::{Answer, Periode, period::validate_periode},
};

/// How an employee is referenced inside an evaluation document.
///
/// Clients send either the raw id (number or numeric string) or the populated
/// employee object; both normalize to the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmployeeRef {
    Id(i64),
    Text(String),
    Populated(EmployeeSummary),
}

impl EmployeeRef {
    pub fn id(&self) -> Option<i64> {
        match self {
            EmployeeRef::Id(id) => Some(*id),
            EmployeeRef::Text(raw) => raw.trim().parse().ok(),
            EmployeeRef::Populated(summary) => Some(summary.id),
        }
    }

    pub fn summary(&self) -> Option<&EmployeeSummary> {
        match self {
            EmployeeRef::Populated(summary) => Some(summary),
            _ => None,
        }
    }
}

/// A persisted evaluation. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    #[serde(rename = "_id")]
    pub id: i64,
    pub employee_id: EmployeeRef,
    pub employee_name: String,
    pub periode: String,
    pub chapter_scores: BTreeMap<String, f64>,
    pub global_score: f64,
    #[serde(default)]
    pub chapter_comments: BTreeMap<String, String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A validated evaluation ready to be written by the store.
#[derive(Debug, Clone)]
pub struct NewEvaluationResult {
    pub employee_id: i64,
    pub employee_name: String,
    pub periode: Periode,
    pub chapter_scores: BTreeMap<String, f64>,
    pub global_score: f64,
    pub chapter_comments: BTreeMap<String, String>,
}

/// DTO for `POST /evaluationresultat`: scores computed by the client.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEvaluationRequest {
    pub employee_id: Option<EmployeeRef>,
    #[validate(length(min = 1, max = 200, message = "Employee name is required."))]
    pub employee_name: String,
    #[validate(custom(function = validate_periode))]
    pub periode: String,
    pub chapter_scores: BTreeMap<String, f64>,
    pub global_score: f64,
    #[serde(default)]
    pub chapter_comments: BTreeMap<String, String>,
}

/// DTO for `POST /evaluations`: raw answers, scored by the server.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub employee_id: Option<EmployeeRef>,
    /// Falls back to the employee directory when omitted.
    #[validate(length(min = 1, max = 200))]
    pub employee_name: Option<String>,
    #[validate(custom(function = validate_periode))]
    pub periode: String,
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub chapter_comments: BTreeMap<String, String>,
}

/// DTO for `POST /evaluations/score`.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub answers: Vec<Answer>,
}

/// Query parameters shared by the result listing and the leaderboard.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationListParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub chef_id: Option<i64>,
    pub user_role: Option<String>,
}

/// Storage-level filter derived from [`EvaluationListParams`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    /// Restrict to the team of this chef.
    pub chef_id: Option<i64>,
}

impl EvaluationListParams {
    /// Chefs only see their own team; every other role sees all results.
    pub fn into_filter(self) -> Result<EvaluationFilter, AppError> {
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(AppError::Validation(format!("Invalid month: {}", month)));
            }
        }

        let is_chef = self
            .user_role
            .as_deref()
            .is_some_and(|role| role.eq_ignore_ascii_case("chef"));

        let chef_id = if is_chef {
            Some(self.chef_id.ok_or_else(|| {
                AppError::Validation("chefId is required for the chef role".to_string())
            })?)
        } else {
            None
        };

        Ok(EvaluationFilter {
            year: self.year,
            month: self.month,
            chef_id,
        })
    }
}
