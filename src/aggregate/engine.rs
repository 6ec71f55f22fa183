use serde::Serialize;
use std::cmp::Ordering;

use crate::rubric::{Rubric, ScoreSheet};
use crate::store::JudgingState;

/// Absolute point spread at or above which a set of scores counts as
/// judge disagreement. Applied identically to per-team totals (25-point
/// scale) and raw per-category values regardless of the category max,
/// so low-max categories trip it more easily. That asymmetry matches
/// how the organizers review splits; do not scale it per category.
pub const DISAGREEMENT_SPREAD: u32 = 4;

/// Per-category view of one team's scores across judges.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStats {
    pub category: String,
    /// Raw values from every judge whose sheet defines this category,
    /// in judge-roster order
    pub values: Vec<u32>,
    pub average: Option<f64>,
    pub outlier: bool,
}

/// Everything the dashboard shows for one team, computed from a
/// point-in-time snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct TeamStatistics {
    pub team: String,
    /// Totals from judges with a complete sheet for this team, in
    /// judge-roster order. Partial sheets contribute nothing here:
    /// they are not counted and not zero-filled, so a team is never
    /// penalized for a judge who hasn't finished.
    pub totals: Vec<u32>,
    /// Mean of `totals`; `None` when no judge has completely scored
    /// the team (rendered as unscored, sorts as 0)
    pub average: Option<f64>,
    pub outlier: bool,
    pub categories: Vec<CategoryStats>,
    /// Mean 1-based position across judges whose ranking includes the
    /// team; `None` when no judge has ranked it
    pub average_rank: Option<f64>,
}

impl TeamStatistics {
    pub fn judge_count(&self) -> usize {
        self.totals.len()
    }

    /// Sort key for the combined leaderboard: unscored teams sort as 0.
    pub fn sort_score(&self) -> f64 {
        self.average.unwrap_or(0.0)
    }
}

/// How far along one judge is, for callers rendering a completion gate.
/// The write path itself never enforces finality.
#[derive(Debug, Clone, Serialize)]
pub struct JudgeProgress {
    pub judge: String,
    pub teams_scored: usize,
    pub team_count: usize,
    pub has_ranking: bool,
    pub done: bool,
}

/// True iff the list has at least two entries and spans
/// `DISAGREEMENT_SPREAD` or more points. Fewer than two scores can
/// never disagree.
pub fn is_outlier(values: &[u32]) -> bool {
    match (values.iter().min(), values.iter().max()) {
        (Some(min), Some(max)) if values.len() >= 2 => max - min >= DISAGREEMENT_SPREAD,
        _ => false,
    }
}

/// A (judge, team) pair is scored iff the sheet defines every rubric
/// category.
pub fn is_scored(rubric: &Rubric, sheet: Option<&ScoreSheet>) -> bool {
    sheet.is_some_and(|s| rubric.is_complete(s))
}

/// A stored ranking restricted to current team membership. Orphaned
/// names (teams since removed) are dropped; order is otherwise
/// preserved.
pub fn filtered_ranking(ranking: &[String], state: &JudgingState) -> Vec<String> {
    ranking
        .iter()
        .filter(|t| state.has_team(t))
        .cloned()
        .collect()
}

/// A judge's ranking normalized against the current team set: orphans
/// filtered out, missing teams appended in canonical team-list order.
/// This is the deterministic prefill a scoring UI starts from; average
/// rank positions use `filtered_ranking` only, so the appended tail
/// never counts as a real ranking.
pub fn normalized_ranking(state: &JudgingState, judge: &str) -> Vec<String> {
    let mut ranking = match state.rankings.get(judge) {
        Some(r) => filtered_ranking(r, state),
        None => Vec::new(),
    };
    for team in &state.teams {
        if !ranking.contains(team) {
            ranking.push(team.clone());
        }
    }
    ranking
}

/// Progress of one judge against the current rosters.
///
/// "Done" means every current team is completely scored and the
/// judge's filtered ranking covers exactly the current team set.
pub fn judge_progress(state: &JudgingState, rubric: &Rubric, judge: &str) -> JudgeProgress {
    let sheets = state.scores.get(judge);
    let teams_scored = state
        .teams
        .iter()
        .filter(|team| is_scored(rubric, sheets.and_then(|s| s.get(*team))))
        .count();

    let has_ranking = state.rankings.contains_key(judge);
    let ranking_complete = match state.rankings.get(judge) {
        Some(r) => {
            let filtered = filtered_ranking(r, state);
            state.teams.iter().all(|t| filtered.contains(t))
        }
        None => false,
    };

    JudgeProgress {
        judge: judge.to_string(),
        teams_scored,
        team_count: state.teams.len(),
        has_ranking,
        done: !state.teams.is_empty() && teams_scored == state.teams.len() && ranking_complete,
    }
}

/// Compute statistics for every current team, in canonical team-list
/// order. Orphaned score and rank entries (keyed by removed teams or
/// judges) are invisible here: iteration goes by the current rosters,
/// never by stored keys.
pub fn team_statistics(state: &JudgingState, rubric: &Rubric) -> Vec<TeamStatistics> {
    state
        .teams
        .iter()
        .map(|team| single_team_statistics(state, rubric, team))
        .collect()
}

fn single_team_statistics(state: &JudgingState, rubric: &Rubric, team: &str) -> TeamStatistics {
    let mut totals = Vec::new();
    for judge in &state.judges {
        let sheet = state.scores.get(judge).and_then(|s| s.get(team));
        if let Some(sheet) = sheet {
            if rubric.is_complete(sheet) {
                totals.push(rubric.total_for(sheet));
            }
        }
    }

    let categories = rubric
        .categories
        .iter()
        .map(|category| {
            let values: Vec<u32> = state
                .judges
                .iter()
                .filter_map(|judge| {
                    state
                        .scores
                        .get(judge)?
                        .get(team)?
                        .get(&category.id)
                        .copied()
                })
                .collect();
            CategoryStats {
                category: category.id.clone(),
                average: mean(&values),
                outlier: is_outlier(&values),
                values,
            }
        })
        .collect();

    let positions: Vec<u32> = state
        .judges
        .iter()
        .filter_map(|judge| {
            let ranking = filtered_ranking(state.rankings.get(judge)?, state);
            ranking.iter().position(|t| t == team).map(|p| p as u32 + 1)
        })
        .collect();

    TeamStatistics {
        team: team.to_string(),
        average: mean(&totals),
        outlier: is_outlier(&totals),
        categories,
        average_rank: mean(&positions),
        totals,
    }
}

/// Order team statistics into the combined leaderboard.
///
/// Stable sort over the canonical team order: average score
/// descending, then average rank ascending when both sides have one.
/// When either side lacks an average rank the tie stands, so
/// re-running on an unchanged snapshot always yields the same order.
pub fn combined_leaderboard(mut stats: Vec<TeamStatistics>) -> Vec<TeamStatistics> {
    stats.sort_by(|a, b| {
        let by_score = b
            .sort_score()
            .partial_cmp(&a.sort_score())
            .unwrap_or(Ordering::Equal);
        if by_score != Ordering::Equal {
            return by_score;
        }
        match (a.average_rank, b.average_rank) {
            (Some(ar), Some(br)) => ar.partial_cmp(&br).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        }
    });
    stats
}

/// The team with the highest average in one category, among teams with
/// at least one value for it. Ties go to the earliest team in the
/// order given, so pass canonical-order statistics.
pub fn category_leader<'a>(
    stats: &'a [TeamStatistics],
    category: &str,
) -> Option<&'a TeamStatistics> {
    let mut best: Option<(&TeamStatistics, f64)> = None;
    for ts in stats {
        let average = ts
            .categories
            .iter()
            .find(|c| c.category == category)
            .and_then(|c| c.average);
        if let Some(average) = average {
            match best {
                Some((_, best_avg)) if average <= best_avg => {}
                _ => best = Some((ts, average)),
            }
        }
    }
    best.map(|(ts, _)| ts)
}

fn mean(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64)
    }
}
