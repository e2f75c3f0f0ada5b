// src/store/postgres.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, types::Json};

use crate::{
    error::AppError,
    models::{
        employee::{CreateEmployeeRequest, Employee},
        evaluation::{EmployeeRef, EvaluationFilter, EvaluationResult, NewEvaluationResult},
        question::{CreateQuestionRequest, Question},
    },
    store::{EvaluationStore, check_global_score},
};

const RESULT_COLUMNS: &str = "r.id, r.employee_id, r.employee_name, r.periode, r.chapter_scores, \
     r.global_score, r.chapter_comments, r.created_at";

/// Row shape of the 'evaluation_results' table.
#[derive(FromRow)]
struct EvaluationRow {
    id: i64,
    employee_id: i64,
    employee_name: String,
    periode: String,
    chapter_scores: Json<BTreeMap<String, f64>>,
    global_score: f64,
    chapter_comments: Json<BTreeMap<String, String>>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<EvaluationRow> for EvaluationResult {
    fn from(row: EvaluationRow) -> Self {
        EvaluationResult {
            id: row.id,
            employee_id: EmployeeRef::Id(row.employee_id),
            employee_name: row.employee_name,
            periode: row.periode,
            chapter_scores: row.chapter_scores.0,
            global_score: row.global_score,
            chapter_comments: row.chapter_comments.0,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EvaluationStore for PgStore {
    async fn insert_result(&self, new: NewEvaluationResult) -> Result<EvaluationResult, AppError> {
        check_global_score(&new)?;

        let row = sqlx::query_as::<_, EvaluationRow>(
            r#"
            INSERT INTO evaluation_results
                (employee_id, employee_name, periode, chapter_scores, global_score, chapter_comments)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, employee_id, employee_name, periode, chapter_scores,
                      global_score, chapter_comments, created_at
            "#,
        )
        .bind(new.employee_id)
        .bind(&new.employee_name)
        .bind(new.periode.to_string())
        .bind(Json(&new.chapter_scores))
        .bind(new.global_score)
        .bind(Json(&new.chapter_comments))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert evaluation result: {:?}", e);
            AppError::Storage(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn list_results(&self, filter: &EvaluationFilter) -> Result<Vec<EvaluationResult>, AppError> {
        let mut query_builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM evaluation_results r JOIN employees e ON e.id = r.employee_id WHERE TRUE",
            RESULT_COLUMNS
        ));

        if let Some(year) = filter.year {
            query_builder
                .push(" AND r.periode LIKE ")
                .push_bind(format!("{:04}-%", year));
        }
        if let Some(month) = filter.month {
            query_builder
                .push(" AND r.periode LIKE ")
                .push_bind(format!("%-{:02}", month));
        }
        if let Some(chef_id) = filter.chef_id {
            query_builder.push(" AND e.chef_id = ").push_bind(chef_id);
        }
        query_builder.push(" ORDER BY r.created_at, r.id");

        let rows: Vec<EvaluationRow> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list evaluation results: {:?}", e);
                AppError::Storage(e.to_string())
            })?;

        Ok(rows.into_iter().map(EvaluationResult::from).collect())
    }

    async fn get_result(&self, id: i64) -> Result<Option<EvaluationResult>, AppError> {
        let row = sqlx::query_as::<_, EvaluationRow>(&format!(
            "SELECT {} FROM evaluation_results r WHERE r.id = $1",
            RESULT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(EvaluationResult::from))
    }

    async fn delete_result(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM evaluation_results WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_questions(&self) -> Result<Vec<Question>, AppError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, chapter_name, prompt_text, options, created_at
            FROM questions
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch question catalog: {:?}", e);
            AppError::Storage(e.to_string())
        })?;

        Ok(questions)
    }

    async fn insert_question(&self, new: CreateQuestionRequest) -> Result<Question, AppError> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (chapter_name, prompt_text, options)
            VALUES ($1, $2, $3)
            RETURNING id, chapter_name, prompt_text, options, created_at
            "#,
        )
        .bind(new.chapter_name.trim())
        .bind(&new.prompt_text)
        .bind(Json(&new.options))
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    async fn delete_question(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_employees(&self, chef_id: Option<i64>) -> Result<Vec<Employee>, AppError> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, first_name, last_name, email, position, chef_id, created_at
            FROM employees
            WHERE ($1::BIGINT IS NULL OR chef_id = $1)
            ORDER BY last_name, first_name, id
            "#,
        )
        .bind(chef_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    async fn get_employee(&self, id: i64) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, first_name, last_name, email, position, chef_id, created_at
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn insert_employee(&self, new: CreateEmployeeRequest) -> Result<Employee, AppError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (first_name, last_name, email, position, chef_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, first_name, last_name, email, position, chef_id, created_at
            "#,
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.position)
        .bind(new.chef_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("foreign key") || e.to_string().contains("23503") {
                AppError::Validation(format!("Unknown chef {}", new.chef_id.unwrap_or_default()))
            } else {
                tracing::error!("Failed to create employee: {:?}", e);
                AppError::Storage(e.to_string())
            }
        })?;

        Ok(employee)
    }
}
