// src/handlers/questions.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;

use crate::{
    error::AppError,
    scoring::{Chapter, QuestionCatalog},
    store::DynStore,
};

/// Loads the full question set and groups it into chapters.
pub(crate) async fn load_catalog(store: &DynStore) -> Result<QuestionCatalog, AppError> {
    let questions = store.list_questions().await?;
    Ok(QuestionCatalog::from_questions(questions))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub points_per_chapter: f64,
    pub question_count: usize,
    pub chapters: Vec<Chapter>,
}

/// Returns the questionnaire grouped by chapter, with the weight of each chapter.
pub async fn get_catalog(State(store): State<DynStore>) -> Result<impl IntoResponse, AppError> {
    let catalog = load_catalog(&store).await?;

    Ok(Json(CatalogResponse {
        points_per_chapter: catalog.points_per_chapter(),
        question_count: catalog.question_count(),
        chapters: catalog.chapters().to_vec(),
    }))
}
