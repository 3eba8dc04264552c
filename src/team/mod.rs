//! Team-level aggregation
//!
//! Individual matches are attributed to teams through a roster, reduced to
//! one team-vs-team record per date and pairing, and replayed through the
//! same engine and snapshot path as individual competitors.

pub mod aggregator;
pub mod roster;

// Re-export commonly used types and traits
pub use aggregator::{TeamAggregator, TeamMatchRecord, TeamSummary};
pub use roster::{RosterProvider, SlotTables, StaticRoster};
