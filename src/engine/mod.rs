//! Incremental rating engine
//!
//! This module holds the pairwise update rule: the margin scale factor, the
//! logistic expectation and delta computation, and the stateful engine that
//! replays an ordered match sequence into an append-only ledger.

pub mod elo;
pub mod scale;
pub mod state;

// Re-export commonly used items
pub use elo::{draw_delta, expected_score, rating_delta, round_delta};
pub use scale::scale_factor;
pub use state::RatingEngine;
