// src/scoring/mod.rs

//! Evaluation scoring and ranking.
//!
//! Everything in here is pure: the handlers load questions and results from
//! the store, hand them to these functions and persist or render what comes
//! back.

pub mod aggregator;
pub mod catalog;
pub mod leaderboard;
pub mod period;
pub mod rating;

pub use aggregator::{
    Answer, ScoreSheet, compute_scores, global_from_chapters, validate_submitted_scores,
};
pub use catalog::{Chapter, QuestionCatalog};
pub use leaderboard::{
    LeaderboardEntry, LeaderboardScope, RankHistory, SelfRank, build_leaderboard,
    find_self_rank, progress_to_next_rank,
};
pub use period::Periode;
pub use rating::{Rating, classify_chapter_score, classify_global_score};

/// Rounds to 2 decimal places, the precision every stored score uses.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
