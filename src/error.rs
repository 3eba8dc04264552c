//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate.

use chrono::NaiveDate;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("Unknown competitor: {competitor_id}")]
    UnknownCompetitor { competitor_id: String },

    #[error("No team mapping for competitor: {competitor_id}")]
    UnknownTeamMapping { competitor_id: String },

    #[error("Draw outcome on {date} #{ordinal} but draws are not enabled for this pool")]
    UnexpectedDraw { date: NaiveDate, ordinal: u32 },

    #[error("Match {date} #{ordinal} arrived out of chronological order")]
    OutOfOrderMatch { date: NaiveDate, ordinal: u32 },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}
