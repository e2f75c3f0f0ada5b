// src/handlers/leaderboard.rs

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Serialize;

use crate::{
    error::AppError,
    models::{employee::Employee, evaluation::EvaluationListParams},
    scoring::{
        LeaderboardEntry, LeaderboardScope, RankHistory, SelfRank, build_leaderboard,
        find_self_rank, progress_to_next_rank,
    },
    store::DynStore,
};

/// Builds the leaderboard visible to the caller.
///
/// A chef only ranks their own team; everyone else ranks all employees.
/// Entries are enriched with the employee directory when the stored result
/// only carried a raw id.
async fn scoped_leaderboard(
    store: &DynStore,
    params: EvaluationListParams,
) -> Result<Vec<LeaderboardEntry>, AppError> {
    let filter = params.into_filter()?;
    let results = store.list_results(&filter).await?;
    let employees = store.list_employees(filter.chef_id).await?;

    let scope = match filter.chef_id {
        Some(_) => LeaderboardScope::Team(employees.iter().map(|e| e.id).collect()),
        None => LeaderboardScope::Global,
    };

    let directory: HashMap<i64, &Employee> = employees.iter().map(|e| (e.id, e)).collect();
    let mut leaderboard = build_leaderboard(&results, &scope);
    for entry in &mut leaderboard {
        if entry.employee.is_none() {
            entry.employee = directory.get(&entry.employee_id).map(|e| e.summary());
        }
    }

    Ok(leaderboard)
}

/// Ranks employees by their average global score.
pub async fn get_leaderboard(
    State(store): State<DynStore>,
    Query(params): Query<EvaluationListParams>,
) -> Result<impl IntoResponse, AppError> {
    let leaderboard = scoped_leaderboard(&store, params).await?;

    Ok(Json(leaderboard))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfRankResponse {
    pub employee_id: i64,
    pub ranked: bool,
    pub entry: Option<LeaderboardEntry>,
    pub progress_to_next_rank: Option<f64>,
    pub ranked_employees: usize,
    pub rank_history: RankHistory,
}

/// Where one employee stands. An employee without evaluations is reported
/// as not ranked rather than as an error.
pub async fn get_self_rank(
    State(store): State<DynStore>,
    Path(employee_id): Path<i64>,
    Query(params): Query<EvaluationListParams>,
) -> Result<impl IntoResponse, AppError> {
    let leaderboard = scoped_leaderboard(&store, params).await?;

    let (entry, progress) = match find_self_rank(&leaderboard, employee_id) {
        SelfRank::Ranked(entry) => (
            Some(entry.clone()),
            Some(progress_to_next_rank(&leaderboard, entry)),
        ),
        SelfRank::NotRanked => (None, None),
    };

    Ok(Json(SelfRankResponse {
        employee_id,
        ranked: entry.is_some(),
        entry,
        progress_to_next_rank: progress,
        ranked_employees: leaderboard.len(),
        rank_history: RankHistory::NotImplemented,
    }))
}
