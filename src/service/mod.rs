use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::aggregate::{self, Aggregate, JudgeProgress};
use crate::error::JudgingError;
use crate::rubric::Rubric;
use crate::store::{JudgingState, SubmitPayload};

/// Liveness probe response. Carries no domain semantics; external
/// keep-alive pingers only look at the flag and timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct Ping {
    pub ok: bool,
    pub time: DateTime<Utc>,
}

/// Serialized-access owner of the shared judging state.
///
/// Many judge clients and one admin client mutate concurrently; input
/// is human-paced, so a single mutex around the whole state is the
/// right trade. Every write takes the lock once and either fully
/// applies or is rejected before mutating, so a reader never observes
/// a judge's scores without their ranking or vice versa. Reads clone a
/// point-in-time snapshot and aggregate outside any caller-visible
/// locking. Per judge-key the semantics are last-writer-wins, since
/// each judge only ever overwrites their own entry.
pub struct JudgingService {
    rubric: Rubric,
    state: Mutex<JudgingState>,
}

impl JudgingService {
    pub fn new(rubric: Rubric, state: JudgingState) -> Self {
        Self {
            rubric,
            state: Mutex::new(state),
        }
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    // A panic while holding the lock cannot leave a half-applied write
    // (mutations validate first, then assign), so poisoning is safe to
    // recover from.
    fn lock(&self) -> MutexGuard<'_, JudgingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Point-in-time snapshot of the full raw state.
    pub fn snapshot(&self) -> JudgingState {
        self.lock().clone()
    }

    /// Recompute all derived statistics from the current snapshot.
    pub fn results(&self) -> Aggregate {
        let snapshot = self.snapshot();
        aggregate::aggregate(&snapshot, &self.rubric)
    }

    /// Completion progress for one judge. Advisory only: the UI owns
    /// the "all teams scored" gate, the service never enforces it.
    pub fn judge_progress(&self, judge: &str) -> JudgeProgress {
        let snapshot = self.snapshot();
        aggregate::judge_progress(&snapshot, &self.rubric, judge)
    }

    pub fn set_teams(&self, teams: Vec<String>) -> Result<(), JudgingError> {
        self.lock().set_teams(teams)
    }

    pub fn set_judges(&self, judges: Vec<String>) -> Result<(), JudgingError> {
        self.lock().set_judges(judges)
    }

    /// Overwrite one judge's scores and ranking as one atomic unit.
    pub fn submit_scores(&self, judge: &str, payload: SubmitPayload) -> Result<(), JudgingError> {
        self.lock().submit_scores(judge, payload, &self.rubric)
    }

    pub fn clear_judge(&self, judge: &str) {
        self.lock().clear_judge(judge);
    }

    pub fn clear_team(&self, team: &str) {
        self.lock().clear_team_across_judges(team);
    }

    pub fn clear_scores(&self) {
        self.lock().clear_all();
    }

    pub fn reset(&self) {
        self.lock().reset_everything();
    }

    pub fn ping(&self) -> Ping {
        Ping {
            ok: true,
            time: Utc::now(),
        }
    }

    /// Consume the service and hand the state back to the caller
    /// (e.g. for saving to disk).
    pub fn into_state(self) -> JudgingState {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
