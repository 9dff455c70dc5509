use thiserror::Error;

/// Failures surfaced by the analytics core.
///
/// Degenerate-but-valid inputs (empty population, zero games, empty matchup
/// list) are never errors — they resolve to documented neutral values with
/// explanatory notes so "no data" is a reported state rather than a crash.
/// Errors are reserved for unresolvable references and malformed numeric
/// input, where a fabricated answer would be misleading.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("team not found: {0}")]
    TeamNotFound(String),

    #[error("conference not found: {0}")]
    ConferenceNotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
