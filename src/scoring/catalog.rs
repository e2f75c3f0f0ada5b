// src/scoring/catalog.rs

use serde::Serialize;

use crate::{config::GLOBAL_SCALE, models::question::Question};

/// Questions sharing a chapter name, in catalog order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub name: String,
    pub questions: Vec<Question>,
}

impl Chapter {
    /// Points reachable in this chapter, summing each question's best option.
    pub fn possible_notes(&self) -> f64 {
        self.questions.iter().map(Question::max_note).sum()
    }
}

/// The question set an evaluation is scored against.
///
/// Chapters appear in the order their first question appears, and every
/// chapter carries the same weight regardless of how many questions it has.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCatalog {
    chapters: Vec<Chapter>,
}

impl QuestionCatalog {
    pub fn from_questions(questions: impl IntoIterator<Item = Question>) -> Self {
        let mut chapters: Vec<Chapter> = Vec::new();

        for question in questions {
            match chapters.iter_mut().find(|c| c.name == question.chapter_name) {
                Some(chapter) => chapter.questions.push(question),
                None => chapters.push(Chapter {
                    name: question.chapter_name.clone(),
                    questions: vec![question],
                }),
            }
        }

        Self { chapters }
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter(&self, name: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn question_count(&self) -> usize {
        self.chapters.iter().map(|c| c.questions.len()).sum()
    }

    /// `20 / number of chapters`, or 0 for an empty catalog.
    pub fn points_per_chapter(&self) -> f64 {
        if self.chapters.is_empty() {
            0.0
        } else {
            GLOBAL_SCALE / self.chapters.len() as f64
        }
    }

    /// Looks a question up by id, returning it with its chapter.
    pub fn find_question(&self, id: i64) -> Option<(&Chapter, &Question)> {
        self.chapters.iter().find_map(|chapter| {
            chapter
                .questions
                .iter()
                .find(|q| q.id == id)
                .map(|q| (chapter, q))
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use sqlx::types::Json;

    use crate::models::question::{Question, QuestionOption};

    /// A question with options noted 0 through `max_note`.
    pub fn question(id: i64, chapter: &str, max_note: u32) -> Question {
        Question {
            id,
            chapter_name: chapter.to_string(),
            prompt_text: format!("Question {}", id),
            options: Json(
                (0..=max_note)
                    .map(|note| QuestionOption {
                        text: format!("Option {}", note),
                        note: note as f64,
                    })
                    .collect(),
            ),
            created_at: None,
        }
    }
}
