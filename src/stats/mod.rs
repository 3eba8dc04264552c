//! Aggregate per-competitor statistics
//!
//! Pure derivation over the ledger and the daily snapshots; nothing here
//! mutates engine state.

pub mod summary;

// Re-export commonly used items
pub use summary::summarize;
