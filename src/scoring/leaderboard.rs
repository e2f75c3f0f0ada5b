// src/scoring/leaderboard.rs

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::{
    models::{employee::EmployeeSummary, evaluation::EvaluationResult},
    scoring::round2,
};

/// Which employees a leaderboard is computed over.
#[derive(Debug, Clone, Default)]
pub enum LeaderboardScope {
    #[default]
    Global,
    /// A chef's team, by employee id.
    Team(HashSet<i64>),
}

impl LeaderboardScope {
    pub fn includes(&self, employee_id: i64) -> bool {
        match self {
            LeaderboardScope::Global => true,
            LeaderboardScope::Team(members) => members.contains(&employee_id),
        }
    }
}

/// One ranked employee. Computed on every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub employee_id: i64,
    pub employee: Option<EmployeeSummary>,
    pub employee_name: String,
    pub average_score: f64,
    pub evaluation_count: usize,
    pub rank: usize,
}

/// Rank movement over time. Only the capability gap exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankHistory {
    NotImplemented,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelfRank<'a> {
    Ranked(&'a LeaderboardEntry),
    /// The employee has no evaluation in scope.
    NotRanked,
}

struct Group {
    employee_id: i64,
    employee: Option<EmployeeSummary>,
    employee_name: String,
    total: f64,
    count: usize,
}

/// Groups results per employee, averages their global scores and ranks them.
///
/// Ties on the average are broken by ascending employee id. Results whose
/// employee reference cannot be resolved to an id are skipped.
pub fn build_leaderboard(
    results: &[EvaluationResult],
    scope: &LeaderboardScope,
) -> Vec<LeaderboardEntry> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for result in results {
        let Some(employee_id) = result.employee_id.id() else {
            tracing::warn!(
                "Skipping evaluation {} with unresolvable employee reference",
                result.id
            );
            continue;
        };
        if !scope.includes(employee_id) {
            continue;
        }

        let slot = *index.entry(employee_id).or_insert_with(|| {
            groups.push(Group {
                employee_id,
                employee: None,
                employee_name: String::new(),
                total: 0.0,
                count: 0,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.total += result.global_score;
        group.count += 1;
        group.employee_name = result.employee_name.clone();
        if group.employee.is_none() {
            group.employee = result.employee_id.summary().cloned();
        }
    }

    let mut ranked: Vec<(f64, Group)> = groups
        .into_iter()
        .filter(|g| g.count > 0)
        .map(|g| (g.total / g.count as f64, g))
        .collect();

    ranked.sort_by(|(avg_a, a), (avg_b, b)| {
        avg_b
            .total_cmp(avg_a)
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, (average, group))| LeaderboardEntry {
            employee_id: group.employee_id,
            employee: group.employee,
            employee_name: group.employee_name,
            average_score: round2(average),
            evaluation_count: group.count,
            rank: i + 1,
        })
        .collect()
}

pub fn find_self_rank(leaderboard: &[LeaderboardEntry], employee_id: i64) -> SelfRank<'_> {
    leaderboard
        .iter()
        .find(|entry| entry.employee_id == employee_id)
        .map_or(SelfRank::NotRanked, SelfRank::Ranked)
}

/// How far, in percent, `entry` sits between the rank below and the rank above.
///
/// Rank 1 is always 100. The last rank measures from 0.
pub fn progress_to_next_rank(leaderboard: &[LeaderboardEntry], entry: &LeaderboardEntry) -> f64 {
    if entry.rank <= 1 {
        return 100.0;
    }
    let Some(above) = leaderboard.get(entry.rank - 2) else {
        return 100.0;
    };
    let below = leaderboard
        .get(entry.rank)
        .map(|e| e.average_score)
        .unwrap_or(0.0);

    let span = above.average_score - below;
    if span <= 0.0 {
        return 100.0;
    }

    round2(((entry.average_score - below) / span * 100.0).clamp(0.0, 100.0))
}
