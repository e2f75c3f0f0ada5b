// src/scoring/rating.rs

use serde::Serialize;

/// Qualitative label shown next to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rating {
    Excellent,
    Bon,
    Moyen,
    #[serde(rename = "À améliorer")]
    NeedsImprovement,
}

impl Rating {
    pub fn label(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Bon => "Bon",
            Rating::Moyen => "Moyen",
            Rating::NeedsImprovement => "À améliorer",
        }
    }
}

/// Thresholds for the global score, on the 0-20 scale.
const GLOBAL_THRESHOLDS: [(f64, Rating); 3] = [
    (16.0, Rating::Excellent),
    (12.0, Rating::Bon),
    (8.0, Rating::Moyen),
];

/// Thresholds for a chapter score, assuming a 0-10 scale.
///
/// Chapter scores are actually expressed on the `20 / chapters` scale, which
/// is only 10 with exactly two chapters. The table is kept as is; responses
/// carry `pointsPerChapter` so the mismatch stays visible.
const CHAPTER_THRESHOLDS: [(f64, Rating); 3] = [
    (8.0, Rating::Excellent),
    (6.0, Rating::Bon),
    (4.0, Rating::Moyen),
];

fn classify(score: f64, thresholds: &[(f64, Rating)]) -> Rating {
    thresholds
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|(_, rating)| *rating)
        .unwrap_or(Rating::NeedsImprovement)
}

pub fn classify_global_score(score: f64) -> Rating {
    classify(score, &GLOBAL_THRESHOLDS)
}

pub fn classify_chapter_score(score: f64) -> Rating {
    classify(score, &CHAPTER_THRESHOLDS)
}
