use serde::Serialize;

use super::engine::{category_leader, judge_progress, TeamStatistics};
use crate::rubric::{Rubric, CREATIVITY, TECHNICAL};
use crate::store::JudgingState;

/// Award winners derived from the aggregated results. These are fixed
/// business rules from the event organizers, reproduced exactly.
#[derive(Debug, Clone, Serialize)]
pub struct Awards {
    /// Highest average in the technical-execution category
    pub top_technical: Option<String>,
    /// Highest average in the creativity category
    pub top_creative: Option<String>,
    /// The team at combined-leaderboard position 3, or the last-place
    /// team when fewer than three teams exist
    pub most_inspirational: Option<String>,
}

/// Head-line numbers for the results dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Judges who have completely scored every team and ranked the
    /// full current team set
    pub judges_done: usize,
    pub judge_count: usize,
    pub team_count: usize,
    /// Teams whose totals currently span the disagreement threshold
    pub outlier_teams: usize,
    /// Leaderboard front-runner, if any team exists
    pub leader: Option<String>,
}

/// Derive award winners.
///
/// `stats` must be in canonical team order (category-leader ties go to
/// the earliest team); `leaderboard` is the combined ordering.
///
/// The "Most Inspirational" rule is a placeholder the organizers chose
/// (overall #3, falling back to last place); preserve it literally
/// until they define a real criterion.
pub fn derive_awards(stats: &[TeamStatistics], leaderboard: &[TeamStatistics]) -> Awards {
    Awards {
        top_technical: category_leader(stats, TECHNICAL).map(|ts| ts.team.clone()),
        top_creative: category_leader(stats, CREATIVITY).map(|ts| ts.team.clone()),
        most_inspirational: leaderboard
            .get(2)
            .or_else(|| leaderboard.last())
            .map(|ts| ts.team.clone()),
    }
}

pub fn summarize(
    state: &JudgingState,
    rubric: &Rubric,
    leaderboard: &[TeamStatistics],
) -> Summary {
    Summary {
        judges_done: state
            .judges
            .iter()
            .filter(|judge| judge_progress(state, rubric, judge).done)
            .count(),
        judge_count: state.judges.len(),
        team_count: state.teams.len(),
        outlier_teams: leaderboard.iter().filter(|ts| ts.outlier).count(),
        leader: leaderboard.first().map(|ts| ts.team.clone()),
    }
}
