//! Rating Ledger - incremental skill-rating engine for match histories
//!
//! This crate converts a chronologically ordered stream of head-to-head match
//! results into a running rating history per competitor, with date-bucketed
//! snapshots, ranked standings, and team-level aggregation over the same
//! engine.

pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod snapshot;
pub mod stats;
pub mod team;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use config::EngineConfig;
pub use engine::RatingEngine;
pub use feed::MatchFeed;
pub use pipeline::{RatingPipeline, RatingReport, TeamReport};
pub use team::{RosterProvider, SlotTables, StaticRoster, TeamAggregator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
