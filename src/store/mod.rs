// src/store/mod.rs

//! Persistence seam. Handlers only ever talk to [`EvaluationStore`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::GLOBAL_SCALE,
    error::AppError,
    models::{
        employee::{CreateEmployeeRequest, Employee},
        evaluation::{EvaluationFilter, EvaluationResult, NewEvaluationResult},
        question::{CreateQuestionRequest, Question},
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type DynStore = Arc<dyn EvaluationStore>;

/// Mirrors the `evaluation_results` CHECK constraint so both stores reject
/// an out-of-scale score the same way.
pub(crate) fn check_global_score(new: &NewEvaluationResult) -> Result<(), AppError> {
    if new.global_score.is_finite() && (0.0..=GLOBAL_SCALE).contains(&new.global_score) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Global score {} must be between 0 and {}",
            new.global_score, GLOBAL_SCALE
        )))
    }
}

#[async_trait]
pub trait EvaluationStore: Send + Sync {
    /// Writes a new result. No uniqueness on employee + periode.
    async fn insert_result(&self, new: NewEvaluationResult) -> Result<EvaluationResult, AppError>;

    /// Results matching `filter`, oldest first.
    async fn list_results(&self, filter: &EvaluationFilter) -> Result<Vec<EvaluationResult>, AppError>;

    async fn get_result(&self, id: i64) -> Result<Option<EvaluationResult>, AppError>;

    /// Returns whether a row was removed.
    async fn delete_result(&self, id: i64) -> Result<bool, AppError>;

    /// The whole catalog in insertion order.
    async fn list_questions(&self) -> Result<Vec<Question>, AppError>;

    async fn insert_question(&self, new: CreateQuestionRequest) -> Result<Question, AppError>;

    async fn delete_question(&self, id: i64) -> Result<bool, AppError>;

    async fn list_employees(&self, chef_id: Option<i64>) -> Result<Vec<Employee>, AppError>;

    async fn get_employee(&self, id: i64) -> Result<Option<Employee>, AppError>;

    async fn insert_employee(&self, new: CreateEmployeeRequest) -> Result<Employee, AppError>;
}
