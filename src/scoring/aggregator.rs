// src/scoring/aggregator.rs

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
    config::{GLOBAL_SCALE, SCORE_TOLERANCE},
    error::ValidationError,
    scoring::{catalog::QuestionCatalog, round2},
};

/// The note a learner picked for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub chapter_name: String,
    pub question_id: i64,
    pub selected_note: f64,
}

/// Per-chapter and global scores of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSheet {
    pub chapter_scores: BTreeMap<String, f64>,
    pub global_score: f64,
    pub points_per_chapter: f64,
}

/// Scores a fully answered questionnaire onto the 20-point scale.
///
/// Each chapter scores `obtained / possible * pointsPerChapter`, where
/// `possible` sums the best option note of every question in the chapter.
/// Any unanswered question rejects the whole submission.
pub fn compute_scores(
    catalog: &QuestionCatalog,
    answers: &[Answer],
) -> Result<ScoreSheet, ValidationError> {
    if catalog.is_empty() {
        return Err(ValidationError::new("No questions to evaluate"));
    }

    let mut by_question: HashMap<i64, &Answer> = HashMap::with_capacity(answers.len());
    for answer in answers {
        let (chapter, question) = catalog.find_question(answer.question_id).ok_or_else(|| {
            ValidationError::new(format!("Unknown question {}", answer.question_id))
        })?;

        if chapter.name != answer.chapter_name {
            return Err(ValidationError::new(format!(
                "Question {} belongs to chapter '{}', not '{}'",
                question.id, chapter.name, answer.chapter_name
            )));
        }

        let max = question.max_note();
        if !answer.selected_note.is_finite()
            || answer.selected_note < 0.0
            || answer.selected_note > max
        {
            return Err(ValidationError::new(format!(
                "Note {} is out of range for question {} (0 to {})",
                answer.selected_note, question.id, max
            )));
        }

        if by_question.insert(answer.question_id, answer).is_some() {
            return Err(ValidationError::new(format!(
                "Question {} answered more than once",
                answer.question_id
            )));
        }
    }

    let unanswered = catalog.question_count() - by_question.len();
    if unanswered > 0 {
        return Err(ValidationError::new(format!(
            "Incomplete submission: {} unanswered question(s)",
            unanswered
        )));
    }

    let points_per_chapter = catalog.points_per_chapter();
    let mut chapter_scores = BTreeMap::new();

    for chapter in catalog.chapters() {
        let obtained: f64 = chapter
            .questions
            .iter()
            .filter_map(|q| by_question.get(&q.id))
            .map(|a| a.selected_note)
            .sum();
        let possible = chapter.possible_notes();

        let score = if possible > 0.0 {
            round2(obtained / possible * points_per_chapter)
        } else {
            0.0
        };
        chapter_scores.insert(chapter.name.clone(), score);
    }

    let global_score = global_from_chapters(&chapter_scores);

    Ok(ScoreSheet {
        chapter_scores,
        global_score,
        points_per_chapter,
    })
}

/// Rounded sum of the chapter scores, kept on the 20-point scale.
///
/// Rounding each chapter first can overshoot the scale by a hundredth
/// (3 × 6.67 = 20.01), so the sum is clamped.
pub fn global_from_chapters(chapter_scores: &BTreeMap<String, f64>) -> f64 {
    round2(chapter_scores.values().sum()).clamp(0.0, GLOBAL_SCALE)
}

/// Re-checks scores computed elsewhere before they are persisted.
///
/// Every catalog chapter must be present, each chapter score must fit its
/// weight, and the global score must be the rounded sum within [0, 20].
pub fn validate_submitted_scores(
    catalog: &QuestionCatalog,
    chapter_scores: &BTreeMap<String, f64>,
    global_score: f64,
) -> Result<(), ValidationError> {
    if catalog.is_empty() {
        return Err(ValidationError::new("No questions to evaluate"));
    }

    let missing: Vec<&str> = catalog
        .chapters()
        .iter()
        .map(|c| c.name.as_str())
        .filter(|name| !chapter_scores.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::new(format!(
            "Incomplete submission: missing chapter(s) {}",
            missing.join(", ")
        )));
    }

    let points_per_chapter = catalog.points_per_chapter();
    for (name, score) in chapter_scores {
        if catalog.chapter(name).is_none() {
            return Err(ValidationError::new(format!("Unknown chapter '{}'", name)));
        }
        if !score.is_finite() || *score < 0.0 || *score > points_per_chapter + SCORE_TOLERANCE {
            return Err(ValidationError::new(format!(
                "Chapter '{}' score {} exceeds its weight of {:.2}",
                name, score, points_per_chapter
            )));
        }
    }

    if !global_score.is_finite() || !(0.0..=GLOBAL_SCALE).contains(&global_score) {
        return Err(ValidationError::new(format!(
            "Global score {} must be between 0 and {}",
            global_score, GLOBAL_SCALE
        )));
    }

    let expected = global_from_chapters(chapter_scores);
    if round2((expected - global_score).abs()) > SCORE_TOLERANCE {
        return Err(ValidationError::new(format!(
            "Global score {} does not match the chapter total {}",
            global_score, expected
        )));
    }

    Ok(())
}
