// src/store/memory.rs

use async_trait::async_trait;
use sqlx::types::Json;
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{
        employee::{CreateEmployeeRequest, Employee},
        evaluation::{EmployeeRef, EvaluationFilter, EvaluationResult, NewEvaluationResult},
        question::{CreateQuestionRequest, Question},
    },
    scoring::Periode,
    store::{EvaluationStore, check_global_score},
};

#[derive(Default)]
struct Tables {
    results: Vec<EvaluationResult>,
    questions: Vec<Question>,
    employees: Vec<Employee>,
    next_result_id: i64,
    next_question_id: i64,
    next_employee_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Process-local store with the same semantics as [`super::PgStore`].
/// Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn employee(&self, id: i64) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    fn matches(&self, result: &EvaluationResult, filter: &EvaluationFilter) -> bool {
        let Some(employee_id) = result.employee_id.id() else {
            return false;
        };

        let in_periode = result
            .periode
            .parse::<Periode>()
            .is_ok_and(|p| p.matches(filter.year, filter.month));

        let in_team = filter.chef_id.is_none_or(|chef_id| {
            self.employee(employee_id)
                .is_some_and(|e| e.chef_id == Some(chef_id))
        });

        in_periode && in_team
    }
}

#[async_trait]
impl EvaluationStore for MemoryStore {
    async fn insert_result(&self, new: NewEvaluationResult) -> Result<EvaluationResult, AppError> {
        check_global_score(&new)?;

        let mut tables = self.tables.write().await;
        if tables.employee(new.employee_id).is_none() {
            return Err(AppError::Validation(format!(
                "Unknown employee {}",
                new.employee_id
            )));
        }

        let result = EvaluationResult {
            id: next_id(&mut tables.next_result_id),
            employee_id: EmployeeRef::Id(new.employee_id),
            employee_name: new.employee_name,
            periode: new.periode.to_string(),
            chapter_scores: new.chapter_scores,
            global_score: new.global_score,
            chapter_comments: new.chapter_comments,
            created_at: chrono::Utc::now(),
        };
        tables.results.push(result.clone());

        Ok(result)
    }

    async fn list_results(&self, filter: &EvaluationFilter) -> Result<Vec<EvaluationResult>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .results
            .iter()
            .filter(|r| tables.matches(r, filter))
            .cloned()
            .collect())
    }

    async fn get_result(&self, id: i64) -> Result<Option<EvaluationResult>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.results.iter().find(|r| r.id == id).cloned())
    }

    async fn delete_result(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.results.len();
        tables.results.retain(|r| r.id != id);
        Ok(tables.results.len() != before)
    }

    async fn list_questions(&self) -> Result<Vec<Question>, AppError> {
        Ok(self.tables.read().await.questions.clone())
    }

    async fn insert_question(&self, new: CreateQuestionRequest) -> Result<Question, AppError> {
        let mut tables = self.tables.write().await;
        let question = Question {
            id: next_id(&mut tables.next_question_id),
            chapter_name: new.chapter_name.trim().to_string(),
            prompt_text: new.prompt_text,
            options: Json(new.options),
            created_at: Some(chrono::Utc::now()),
        };
        tables.questions.push(question.clone());

        Ok(question)
    }

    async fn delete_question(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.questions.len();
        tables.questions.retain(|q| q.id != id);
        Ok(tables.questions.len() != before)
    }

    async fn list_employees(&self, chef_id: Option<i64>) -> Result<Vec<Employee>, AppError> {
        let tables = self.tables.read().await;
        let mut employees: Vec<Employee> = tables
            .employees
            .iter()
            .filter(|e| chef_id.is_none_or(|chef| e.chef_id == Some(chef)))
            .cloned()
            .collect();
        employees.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });

        Ok(employees)
    }

    async fn get_employee(&self, id: i64) -> Result<Option<Employee>, AppError> {
        Ok(self.tables.read().await.employee(id).cloned())
    }

    async fn insert_employee(&self, new: CreateEmployeeRequest) -> Result<Employee, AppError> {
        let mut tables = self.tables.write().await;
        if let Some(chef_id) = new.chef_id {
            if tables.employee(chef_id).is_none() {
                return Err(AppError::Validation(format!("Unknown chef {}", chef_id)));
            }
        }

        let employee = Employee {
            id: next_id(&mut tables.next_employee_id),
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            position: new.position,
            chef_id: new.chef_id,
            created_at: Some(chrono::Utc::now()),
        };
        tables.employees.push(employee.clone());

        Ok(employee)
    }
}
