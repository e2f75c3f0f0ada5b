// src/report/evaluation.rs

use crate::{
    config::GLOBAL_SCALE,
    error::ValidationError,
    models::{employee::Employee, evaluation::EvaluationResult},
    report::layout::{Document, DocumentBuilder, Font, MARGIN, column_chars, wrap_text},
    scoring::{Periode, classify_chapter_score, classify_global_score},
    utils::html::html_to_text,
};

const COLUMNS: [f32; 4] = [0.0, 230.0, 310.0, 390.0];
const COLUMN_GAP: f32 = 10.0;

/// Lays out a single evaluation: header, chapter table and comments.
pub fn render_evaluation_report(result: &EvaluationResult) -> Result<Document, ValidationError> {
    if result.employee_name.trim().is_empty() {
        return Err(ValidationError::new("Evaluation has no employee name"));
    }
    let periode: Periode = result.periode.parse()?;
    if result.chapter_scores.is_empty() {
        return Err(ValidationError::new("Evaluation has no chapter scores"));
    }

    let points_per_chapter = GLOBAL_SCALE / result.chapter_scores.len() as f64;
    let mut doc = DocumentBuilder::new(format!("Évaluation {} {}", result.employee_name, periode));

    doc.heading("Rapport d'évaluation", 18.0);
    doc.paragraph(&format!("Employé : {}", result.employee_name));
    doc.paragraph(&format!("Période : {}", periode));
    doc.paragraph_styled(
        &format!(
            "Score global : {:.2} / {} ({})",
            result.global_score,
            GLOBAL_SCALE,
            classify_global_score(result.global_score).label()
        ),
        Font::Bold,
        MARGIN,
    );
    doc.spacer(12.0);

    doc.heading("Résultats par chapitre", 14.0);
    doc.row(
        &cells(["Chapitre", "Obtenu", "Maximum", "Appréciation"]),
        Font::Bold,
    );
    let name_chars = column_chars(COLUMNS[1] - COLUMNS[0] - COLUMN_GAP);
    for (chapter, score) in &result.chapter_scores {
        // Long names continue on extra rows inside the first column.
        let mut name_lines = wrap_text(chapter, name_chars).into_iter();
        let first_line = name_lines.next().unwrap_or_default();
        doc.row(
            &cells([
                first_line.as_str(),
                format!("{:.2}", score).as_str(),
                format!("{:.2}", points_per_chapter).as_str(),
                classify_chapter_score(*score).label(),
            ]),
            Font::Regular,
        );
        for line in name_lines {
            doc.row(&[(COLUMNS[0], line)], Font::Regular);
        }
    }

    let comments: Vec<(&String, &String)> = result
        .chapter_comments
        .iter()
        .filter(|(_, comment)| !comment.trim().is_empty())
        .collect();
    if !comments.is_empty() {
        doc.spacer(12.0);
        doc.heading("Commentaires", 14.0);
        for (chapter, comment) in comments {
            doc.paragraph_styled(chapter, Font::Bold, MARGIN);
            doc.paragraph_styled(&html_to_text(comment), Font::Regular, MARGIN + 12.0);
        }
    }

    Ok(doc.finish())
}

fn cells(texts: [&str; 4]) -> Vec<(f32, String)> {
    COLUMNS
        .iter()
        .zip(texts)
        .map(|(x, text)| (*x, text.to_string()))
        .collect()
}

/// `evaluation_<lastName>_<periode>.pdf`, restricted to filename-safe ASCII.
///
/// The last name comes from the employee record when known, otherwise from
/// the last word of the stored employee name.
pub fn report_filename(result: &EvaluationResult, employee: Option<&Employee>) -> String {
    let last_name = employee
        .map(|e| e.last_name.clone())
        .or_else(|| {
            result
                .employee_id
                .summary()
                .map(|s| s.last_name.clone())
                .filter(|name| !name.is_empty())
        })
        .or_else(|| result.employee_name.split_whitespace().last().map(str::to_string))
        .unwrap_or_default();

    format!(
        "evaluation_{}_{}.pdf",
        sanitize_component(&last_name),
        sanitize_component(&result.periode)
    )
}

fn sanitize_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "inconnu".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::evaluation::EmployeeRef;

    fn sample() -> EvaluationResult {
        let mut chapter_scores = BTreeMap::new();
        chapter_scores.insert("Communication".to_string(), 7.0);
        chapter_scores.insert("Technique".to_string(), 9.5);
        let mut chapter_comments = BTreeMap::new();
        chapter_comments.insert("Technique".to_string(), "Très bonne maîtrise".to_string());
        chapter_comments.insert("Communication".to_string(), "   ".to_string());

        EvaluationResult {
            id: 1,
            employee_id: EmployeeRef::Id(4),
            employee_name: "Leila Ben Salah".to_string(),
            periode: "2024-06".to_string(),
            chapter_scores,
            global_score: 16.5,
            chapter_comments,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn report_contains_header_table_and_comments() {
        let doc = render_evaluation_report(&sample()).unwrap();

        assert!(doc.contains_text("Leila Ben Salah"));
        assert!(doc.contains_text("2024-06"));
        assert!(doc.contains_text("16.50 / 20 (Excellent)"));
        assert!(doc.contains_text("Communication"));
        assert!(doc.contains_text("10.00"));
        assert!(doc.contains_text("Bon"));
        assert!(doc.contains_text("Très bonne maîtrise"));
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn comments_render_as_plain_text() {
        let mut result = sample();
        result
            .chapter_comments
            .insert("Technique".to_string(), "<b>R&amp;D</b> solide".to_string());
        let doc = render_evaluation_report(&result).unwrap();

        assert!(doc.contains_text("R&D solide"));
        assert!(!doc.contains_text("&amp;"));
        assert!(!doc.contains_text("<b>"));
    }

    #[test]
    fn blank_comments_are_left_out() {
        let mut result = sample();
        result.chapter_comments.clear();
        let doc = render_evaluation_report(&result).unwrap();
        assert!(!doc.contains_text("Commentaires"));
    }

    #[test]
    fn long_comments_paginate() {
        let mut result = sample();
        result
            .chapter_comments
            .insert("Technique".to_string(), "mot ".repeat(2500));
        let doc = render_evaluation_report(&result).unwrap();
        assert!(doc.page_count() > 1);
    }

    #[test]
    fn incomplete_result_is_rejected() {
        let mut result = sample();
        result.chapter_scores.clear();
        assert!(render_evaluation_report(&result).is_err());

        let mut result = sample();
        result.periode = "juin".to_string();
        assert!(render_evaluation_report(&result).is_err());

        let mut result = sample();
        result.employee_name = String::new();
        assert!(render_evaluation_report(&result).is_err());
    }

    #[test]
    fn long_chapter_names_wrap_inside_their_column() {
        let long_name = "Gestion des priorités et organisation du travail en équipe";
        let mut result = sample();
        result.chapter_scores.insert(long_name.to_string(), 5.0);
        let doc = render_evaluation_report(&result).unwrap();

        let limit = column_chars(COLUMNS[1] - COLUMNS[0] - COLUMN_GAP);
        assert!(long_name.chars().count() > limit);
        assert!(!doc.contains_text(long_name));

        let name_runs: Vec<&str> = doc.pages[0]
            .runs
            .iter()
            .filter(|run| run.x == MARGIN + COLUMNS[0] && long_name.contains(run.text.as_str()))
            .map(|run| run.text.as_str())
            .collect();
        assert!(name_runs.len() >= 2);
        assert!(name_runs.iter().all(|text| text.chars().count() <= limit));
        assert_eq!(name_runs.join(" "), long_name);
    }

    #[test]
    fn filename_uses_last_name_and_periode() {
        let result = sample();
        assert_eq!(report_filename(&result, None), "evaluation_Salah_2024-06.pdf");

        let employee = Employee {
            id: 4,
            first_name: "Leila".to_string(),
            last_name: "Ben Salah".to_string(),
            email: "leila@example.com".to_string(),
            position: None,
            chef_id: None,
            created_at: None,
        };
        assert_eq!(
            report_filename(&result, Some(&employee)),
            "evaluation_Ben_Salah_2024-06.pdf"
        );
    }
}
