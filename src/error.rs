use thiserror::Error;

/// Domain errors surfaced by the store and service layers.
///
/// Every write either fully applies or is rejected with one of these
/// before any state is mutated.
#[derive(Debug, Error)]
pub enum JudgingError {
    /// Malformed input shape: empty or duplicate names, unknown category
    /// id, or a score above the category maximum.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Submission from a judge not in the current roster.
    #[error("unknown judge: {0}")]
    UnknownJudge(String),

    /// Rubric band lookup failure. Indicates a corrupt rubric
    /// definition, not a bad runtime input.
    #[error("rubric config error: {0}")]
    Config(String),
}
