//! Date-bucketed snapshots derived from the ledger
//!
//! The ledger holds one row per competitor per match; presentation wants one
//! row per competitor per date, ranked. This module collapses the ledger with
//! last-update-of-the-day-wins semantics and assigns competition ranks and
//! rank movement.

pub mod daily;
pub mod ranking;

// Re-export commonly used items
pub use daily::{collapse_daily, DailyRating};
pub use ranking::rank_daily;

use crate::types::{DailySnapshot, LedgerRecord};

/// Collapse a sequence-ordered ledger into ranked daily snapshots
pub fn build_snapshots(ledger: &[LedgerRecord]) -> Vec<DailySnapshot> {
    rank_daily(collapse_daily(ledger))
}
