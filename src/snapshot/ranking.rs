//! Per-date competition ranking and rank movement
//!
//! Within a date, competitors are ranked by rating descending with competition
//! ("min") ranking: tied ratings share the rank of the first tied entry, and
//! the next distinct rating continues at the tied count plus one. Rank
//! movement compares against the competitor's previous *active* date, so a
//! competitor who skips a date keeps their old rank for comparison.

use crate::snapshot::daily::DailyRating;
use crate::types::{CompetitorId, DailySnapshot};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Assign ranks and rank deltas to collapsed daily ratings
///
/// Output is ordered by date ascending, then rank ascending.
pub fn rank_daily(daily: Vec<DailyRating>) -> Vec<DailySnapshot> {
    let mut by_date: BTreeMap<NaiveDate, Vec<DailyRating>> = BTreeMap::new();
    for row in daily {
        by_date.entry(row.date).or_default().push(row);
    }

    let mut last_rank: HashMap<CompetitorId, u32> = HashMap::new();
    let mut snapshots = Vec::new();

    for (date, mut rows) in by_date {
        rows.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.competitor_id.cmp(&b.competitor_id))
        });

        let mut current_rank = 0;
        let mut previous_rating = f64::NAN;
        for (position, row) in rows.into_iter().enumerate() {
            // Competition ranking: ties share the first tied position
            if row.rating != previous_rating {
                current_rank = position as u32 + 1;
                previous_rating = row.rating;
            }

            let rank_delta = last_rank
                .get(&row.competitor_id)
                .map(|&prev| i64::from(prev) - i64::from(current_rank))
                .unwrap_or(0);
            last_rank.insert(row.competitor_id.clone(), current_rank);

            snapshots.push(DailySnapshot {
                date,
                competitor_id: row.competitor_id,
                rating: row.rating,
                delta_sum: row.delta_sum,
                rank: current_rank,
                rank_delta,
            });
        }
    }

    snapshots
}
