//! Daily collapsing of the ledger
//!
//! One record per (date, competitor): the chronologically last ledger record
//! of the day supplies the rating, and the day's deltas are summed. The
//! reduce is explicit rather than a table operation so the last-update-wins
//! rule stays auditable.

use crate::types::{CompetitorId, LedgerRecord, Rating};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// One competitor's collapsed activity on one date, before ranking
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRating {
    pub date: NaiveDate,
    pub competitor_id: CompetitorId,
    pub rating: Rating,
    pub delta_sum: f64,
}

/// Group a sequence-ordered ledger by (date, competitor)
///
/// The ledger's append order is the sequence order, so keeping the last write
/// per group implements "last update of the day wins". Output is sorted by
/// date, then competitor id.
pub fn collapse_daily(ledger: &[LedgerRecord]) -> Vec<DailyRating> {
    let mut days: BTreeMap<(NaiveDate, CompetitorId), DailyRating> = BTreeMap::new();

    for record in ledger {
        let key = (record.seq.date, record.competitor_id.clone());
        let entry = days.entry(key).or_insert_with(|| DailyRating {
            date: record.seq.date,
            competitor_id: record.competitor_id.clone(),
            rating: record.rating_after,
            delta_sum: 0.0,
        });
        entry.rating = record.rating_after;
        entry.delta_sum += record.delta;
    }

    days.into_values().collect()
}
