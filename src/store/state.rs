use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::JudgingError;
use crate::rubric::{Rubric, ScoreSheet};

/// One judge's full submission: scores for any number of teams plus a
/// total ranking, replaced together as a single atomic unit.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmitPayload {
    /// team -> category -> value
    pub scores: BTreeMap<String, ScoreSheet>,

    /// Team names ordered best-first
    pub ranking: Vec<String>,
}

/// The aggregate root: everything the event has recorded so far.
///
/// All derived statistics are recomputed on demand from a snapshot of
/// this struct; no derived state is cached or persisted, so the
/// leaderboard is always consistent with the latest raw input.
///
/// Replacing the team or judge lists does not purge score/rank entries
/// keyed by removed names. Those entries become orphans, and every read
/// path must filter by current membership rather than trusting stored
/// keys.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct JudgingState {
    pub version: u32,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub judges: Vec<String>,
    /// judge -> team -> sheet
    #[serde(default)]
    pub scores: BTreeMap<String, BTreeMap<String, ScoreSheet>>,
    /// judge -> team names best-first
    #[serde(default)]
    pub rankings: BTreeMap<String, Vec<String>>,
}

impl Default for JudgingState {
    fn default() -> Self {
        Self::new()
    }
}

impl JudgingState {
    /// Create a new empty state with version 1
    pub fn new() -> Self {
        Self {
            version: 1,
            teams: Vec::new(),
            judges: Vec::new(),
            scores: BTreeMap::new(),
            rankings: BTreeMap::new(),
        }
    }

    pub fn has_team(&self, name: &str) -> bool {
        self.teams.iter().any(|t| t == name)
    }

    pub fn has_judge(&self, name: &str) -> bool {
        self.judges.iter().any(|j| j == name)
    }

    /// Replace the entire team list (not additive).
    ///
    /// The caller is responsible for having merged with the prior list
    /// if addition was intended. Scores and rankings for removed teams
    /// are left in place as orphans.
    pub fn set_teams(&mut self, teams: Vec<String>) -> Result<(), JudgingError> {
        validate_names(&teams, "team")?;
        self.teams = teams;
        Ok(())
    }

    /// Replace the entire judge list. Same semantics as `set_teams`.
    pub fn set_judges(&mut self, judges: Vec<String>) -> Result<(), JudgingError> {
        validate_names(&judges, "judge")?;
        self.judges = judges;
        Ok(())
    }

    /// Overwrite one judge's scores and ranking together.
    ///
    /// Partial sheets are accepted and stored as-is; completeness is a
    /// read-time concern. Values are bounds-checked against the rubric
    /// before anything is written, so a rejected submission leaves the
    /// state untouched. Team names not in the current team list are
    /// accepted (they may be stale or ahead of an admin update) and
    /// filtered out by read paths.
    pub fn submit_scores(
        &mut self,
        judge: &str,
        payload: SubmitPayload,
        rubric: &Rubric,
    ) -> Result<(), JudgingError> {
        if !self.has_judge(judge) {
            return Err(JudgingError::UnknownJudge(judge.to_string()));
        }

        for (team, sheet) in &payload.scores {
            for (category_id, value) in sheet {
                let category = rubric.category(category_id).ok_or_else(|| {
                    JudgingError::Validation(format!(
                        "unknown category '{}' in scores for team '{}'",
                        category_id, team
                    ))
                })?;
                if *value > category.max {
                    return Err(JudgingError::Validation(format!(
                        "score {} for team '{}' exceeds '{}' max of {}",
                        value, team, category_id, category.max
                    )));
                }
            }
        }

        self.scores.insert(judge.to_string(), payload.scores);
        self.rankings.insert(judge.to_string(), payload.ranking);
        Ok(())
    }

    /// Remove one judge's scores and ranking. Idempotent; the judge
    /// stays in the roster.
    pub fn clear_judge(&mut self, judge: &str) {
        self.scores.remove(judge);
        self.rankings.remove(judge);
    }

    /// Remove one team's sheet from every judge's scores. Idempotent.
    /// Rankings are untouched; read paths filter the name out once the
    /// team is also removed from the team list.
    pub fn clear_team_across_judges(&mut self, team: &str) {
        for sheets in self.scores.values_mut() {
            sheets.remove(team);
        }
    }

    /// Remove all scores and rankings, keeping teams and judges.
    pub fn clear_all(&mut self) {
        self.scores.clear();
        self.rankings.clear();
    }

    /// Wipe everything: teams, judges, scores, rankings.
    pub fn reset_everything(&mut self) {
        *self = Self::new();
    }
}

fn validate_names(names: &[String], kind: &str) -> Result<(), JudgingError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(JudgingError::Validation(format!(
                "{} names must be non-empty",
                kind
            )));
        }
        if !seen.insert(name.as_str()) {
            return Err(JudgingError::Validation(format!(
                "duplicate {} name '{}'",
                kind, name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sheet(values: &[(&str, u32)]) -> ScoreSheet {
        values
            .iter()
            .map(|(id, v)| (id.to_string(), *v))
            .collect()
    }

    fn payload(scores: &[(&str, ScoreSheet)], ranking: &[&str]) -> SubmitPayload {
        SubmitPayload {
            scores: scores
                .iter()
                .map(|(team, s)| (team.to_string(), s.clone()))
                .collect(),
            ranking: names(ranking),
        }
    }

    fn seeded_state() -> JudgingState {
        let mut state = JudgingState::new();
        state.set_teams(names(&["Nova", "Quasar"])).unwrap();
        state.set_judges(names(&["Ada", "Grace"])).unwrap();
        state
    }

    #[test]
    fn test_new_state_empty() {
        let state = JudgingState::new();
        assert_eq!(state.version, 1);
        assert!(state.teams.is_empty());
        assert!(state.judges.is_empty());
        assert!(state.scores.is_empty());
        assert!(state.rankings.is_empty());
    }

    #[test]
    fn test_set_teams_rejects_duplicates() {
        let mut state = JudgingState::new();
        let err = state.set_teams(names(&["Nova", "Nova"])).unwrap_err();
        assert!(matches!(err, JudgingError::Validation(_)));
        assert!(state.teams.is_empty());
    }

    #[test]
    fn test_set_judges_rejects_empty_name() {
        let mut state = JudgingState::new();
        let err = state.set_judges(names(&["Ada", "  "])).unwrap_err();
        assert!(matches!(err, JudgingError::Validation(_)));
    }

    #[test]
    fn test_set_teams_is_replacement_and_keeps_orphans() {
        let rubric = Rubric::standard();
        let mut state = seeded_state();
        state
            .submit_scores(
                "Ada",
                payload(&[("Nova", sheet(&[("technical", 6)]))], &["Nova", "Quasar"]),
                &rubric,
            )
            .unwrap();

        state.set_teams(names(&["Quasar"])).unwrap();

        // Stale entries stay keyed by the old name; read paths filter them
        assert_eq!(state.teams, names(&["Quasar"]));
        assert!(state.scores["Ada"].contains_key("Nova"));
        assert!(state.rankings["Ada"].contains(&"Nova".to_string()));
    }

    #[test]
    fn test_submit_unknown_judge_does_not_mutate() {
        let rubric = Rubric::standard();
        let mut state = seeded_state();
        let before = state.clone();

        let err = state
            .submit_scores(
                "Mallory",
                payload(&[("Nova", sheet(&[("technical", 6)]))], &["Nova", "Quasar"]),
                &rubric,
            )
            .unwrap_err();

        assert!(matches!(err, JudgingError::UnknownJudge(_)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_submit_unknown_category_does_not_mutate() {
        let rubric = Rubric::standard();
        let mut state = seeded_state();
        let before = state.clone();

        let err = state
            .submit_scores(
                "Ada",
                payload(&[("Nova", sheet(&[("vibes", 3)]))], &["Nova", "Quasar"]),
                &rubric,
            )
            .unwrap_err();

        assert!(matches!(err, JudgingError::Validation(_)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_submit_value_above_max_does_not_mutate() {
        let rubric = Rubric::standard();
        let mut state = seeded_state();
        let before = state.clone();

        let err = state
            .submit_scores(
                "Ada",
                payload(&[("Nova", sheet(&[("presentation", 5)]))], &["Nova", "Quasar"]),
                &rubric,
            )
            .unwrap_err();

        assert!(matches!(err, JudgingError::Validation(_)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_submit_replaces_scores_and_ranking_together() {
        let rubric = Rubric::standard();
        let mut state = seeded_state();

        state
            .submit_scores(
                "Ada",
                payload(
                    &[
                        ("Nova", sheet(&[("technical", 6)])),
                        ("Quasar", sheet(&[("technical", 4)])),
                    ],
                    &["Nova", "Quasar"],
                ),
                &rubric,
            )
            .unwrap();

        // Resubmission fully overwrites, it does not merge
        state
            .submit_scores(
                "Ada",
                payload(&[("Quasar", sheet(&[("theme", 5)]))], &["Quasar", "Nova"]),
                &rubric,
            )
            .unwrap();

        assert!(!state.scores["Ada"].contains_key("Nova"));
        assert_eq!(state.scores["Ada"]["Quasar"], sheet(&[("theme", 5)]));
        assert_eq!(state.rankings["Ada"], names(&["Quasar", "Nova"]));
    }

    #[test]
    fn test_submit_accepts_partial_sheets() {
        let rubric = Rubric::standard();
        let mut state = seeded_state();
        state
            .submit_scores(
                "Ada",
                payload(&[("Nova", sheet(&[("creativity", 5)]))], &[]),
                &rubric,
            )
            .unwrap();
        assert_eq!(state.scores["Ada"]["Nova"]["creativity"], 5);
    }

    #[test]
    fn test_clear_judge_removes_both_and_is_idempotent() {
        let rubric = Rubric::standard();
        let mut state = seeded_state();
        state
            .submit_scores(
                "Ada",
                payload(&[("Nova", sheet(&[("technical", 6)]))], &["Nova", "Quasar"]),
                &rubric,
            )
            .unwrap();

        state.clear_judge("Ada");
        assert!(!state.scores.contains_key("Ada"));
        assert!(!state.rankings.contains_key("Ada"));
        assert!(state.has_judge("Ada"));

        state.clear_judge("Ada"); // no-op
        state.clear_judge("Nobody"); // no-op
    }

    #[test]
    fn test_clear_team_leaves_other_entries_and_rankings() {
        let rubric = Rubric::standard();
        let mut state = seeded_state();
        for judge in ["Ada", "Grace"] {
            state
                .submit_scores(
                    judge,
                    payload(
                        &[
                            ("Nova", sheet(&[("technical", 6)])),
                            ("Quasar", sheet(&[("technical", 4)])),
                        ],
                        &["Nova", "Quasar"],
                    ),
                    &rubric,
                )
                .unwrap();
        }

        state.clear_team_across_judges("Nova");

        for judge in ["Ada", "Grace"] {
            assert!(!state.scores[judge].contains_key("Nova"));
            assert!(state.scores[judge].contains_key("Quasar"));
            // Rankings still list the name until the team itself is removed
            assert_eq!(state.rankings[judge], names(&["Nova", "Quasar"]));
        }
    }

    #[test]
    fn test_clear_all_keeps_rosters() {
        let rubric = Rubric::standard();
        let mut state = seeded_state();
        state
            .submit_scores(
                "Ada",
                payload(&[("Nova", sheet(&[("technical", 6)]))], &["Nova", "Quasar"]),
                &rubric,
            )
            .unwrap();

        state.clear_all();

        assert!(state.scores.is_empty());
        assert!(state.rankings.is_empty());
        assert_eq!(state.teams.len(), 2);
        assert_eq!(state.judges.len(), 2);
    }

    #[test]
    fn test_reset_everything() {
        let mut state = seeded_state();
        state.reset_everything();
        assert_eq!(state, JudgingState::new());
    }
}
