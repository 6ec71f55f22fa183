pub mod awards;
pub mod engine;

pub use awards::{derive_awards, summarize, Awards, Summary};
pub use engine::{
    category_leader, combined_leaderboard, filtered_ranking, is_outlier, is_scored,
    judge_progress, normalized_ranking, team_statistics, CategoryStats, JudgeProgress,
    TeamStatistics, DISAGREEMENT_SPREAD,
};

use crate::rubric::Rubric;
use crate::store::JudgingState;
use serde::Serialize;

/// Everything a results view needs, computed once from a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregate {
    /// Per-team statistics in canonical team order
    pub stats: Vec<TeamStatistics>,
    /// The same statistics in combined-leaderboard order
    pub leaderboard: Vec<TeamStatistics>,
    pub awards: Awards,
    pub summary: Summary,
}

/// Pure function of a state snapshot; recomputed on demand, never
/// cached, so results always reflect the latest raw input.
pub fn aggregate(state: &JudgingState, rubric: &Rubric) -> Aggregate {
    let stats = team_statistics(state, rubric);
    let leaderboard = combined_leaderboard(stats.clone());
    let awards = derive_awards(&stats, &leaderboard);
    let summary = summarize(state, rubric, &leaderboard);
    Aggregate {
        stats,
        leaderboard,
        awards,
        summary,
    }
}
