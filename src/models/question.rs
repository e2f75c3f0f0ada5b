// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// One answer choice. `note` is the number of points earned by picking it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub text: String,
    pub note: f64,
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,

    /// Every question belongs to exactly one chapter.
    pub chapter_name: String,

    pub prompt_text: String,

    /// Stored as a JSON array in the database.
    pub options: Json<Vec<QuestionOption>>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Question {
    /// Highest note any option of this question awards.
    pub fn max_note(&self) -> f64 {
        self.options
            .iter()
            .map(|option| option.note)
            .fold(0.0, f64::max)
    }
}

/// DTO for adding a question to the catalog.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 200))]
    pub chapter_name: String,
    #[validate(length(min = 1, max = 2000))]
    pub prompt_text: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<QuestionOption>,
}

fn validate_options(options: &[QuestionOption]) -> Result<(), validator::ValidationError> {
    if options.is_empty() {
        return Err(validator::ValidationError::new("options_cannot_be_empty"));
    }
    for opt in options {
        if opt.text.trim().is_empty() || opt.text.len() > 500 {
            return Err(validator::ValidationError::new("option_text_length"));
        }
        if !opt.note.is_finite() || opt.note < 0.0 {
            return Err(validator::ValidationError::new("option_note_must_be_non_negative"));
        }
    }
    Ok(())
}
