//! Competitor summaries
//!
//! Latest/best/worst rating from the snapshots, win/loss tallies from the
//! ledger, plus the "what changed today" delta that is only meaningful for
//! competitors active on the globally latest date. Summary ranks come from
//! one leaderboard over everyone's latest rating, not from the per-date
//! snapshot ranks: a competitor idle since an early date is ranked where
//! their rating stands today, below everyone who has since overtaken them.

use crate::types::{
    Competitor, CompetitorId, CompetitorSummary, DailySnapshot, LedgerRecord, SideOutcome,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    win_n: u64,
    lose_n: u64,
}

/// Competition ranks over a rating table, keyed by competitor
///
/// Rating descending with id as the tiebreaker; tied ratings share the rank
/// of the first tied entry and the next distinct rating skips past the tie
/// block.
pub(crate) fn leaderboard_ranks(ratings: &HashMap<String, f64>) -> HashMap<&str, u32> {
    let mut board: Vec<(&str, f64)> = ratings
        .iter()
        .map(|(id, rating)| (id.as_str(), *rating))
        .collect();
    board.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });

    let mut ranks = HashMap::with_capacity(board.len());
    let mut current_rank = 0;
    let mut previous_rating = f64::NAN;
    for (position, (id, rating)) in board.into_iter().enumerate() {
        if rating != previous_rating {
            current_rank = position as u32 + 1;
            previous_rating = rating;
        }
        ranks.insert(id, current_rank);
    }
    ranks
}

/// Build one summary row per competitor with ledger activity
///
/// Output is sorted by latest rating descending. Registered competitors who
/// never played have no snapshot rows and therefore no summary.
pub fn summarize(
    ledger: &[LedgerRecord],
    snapshots: &[DailySnapshot],
    competitors: &[Competitor],
) -> Vec<CompetitorSummary> {
    let tags: HashMap<&str, &str> = competitors
        .iter()
        .map(|c| (c.id.as_str(), c.tag.as_str()))
        .collect();

    let mut tallies: HashMap<&str, Tally> = HashMap::new();
    for record in ledger {
        let tally = tallies.entry(record.competitor_id.as_str()).or_default();
        match record.outcome {
            SideOutcome::Win => tally.win_n += 1,
            SideOutcome::Loss => tally.lose_n += 1,
            // Draws count toward neither tally
            SideOutcome::Draw => {}
        }
    }

    let global_latest = snapshots.iter().map(|s| s.date).max();

    // Snapshots arrive date-ascending, so the last row seen per competitor is
    // their latest and the row it displaces is their second-latest.
    let mut latest: BTreeMap<CompetitorId, &DailySnapshot> = BTreeMap::new();
    let mut previous: HashMap<CompetitorId, f64> = HashMap::new();
    let mut best: HashMap<CompetitorId, f64> = HashMap::new();
    let mut worst: HashMap<CompetitorId, f64> = HashMap::new();
    for snapshot in snapshots {
        if let Some(displaced) = latest.insert(snapshot.competitor_id.clone(), snapshot) {
            previous.insert(snapshot.competitor_id.clone(), displaced.rating);
        }
        best.entry(snapshot.competitor_id.clone())
            .and_modify(|r| *r = r.max(snapshot.rating))
            .or_insert(snapshot.rating);
        worst
            .entry(snapshot.competitor_id.clone())
            .and_modify(|r| *r = r.min(snapshot.rating))
            .or_insert(snapshot.rating);
    }

    let mut summaries: Vec<CompetitorSummary> = latest
        .into_iter()
        .map(|(competitor_id, snapshot)| {
            let tally = tallies
                .get(competitor_id.as_str())
                .copied()
                .unwrap_or_default();
            let game_n = tally.win_n + tally.lose_n;
            let win_rate = if game_n > 0 {
                tally.win_n as f64 / game_n as f64
            } else {
                0.0
            };

            let updated = Some(snapshot.date) == global_latest;
            let diff_rating = if updated { snapshot.delta_sum } else { 0.0 };

            CompetitorSummary {
                tag: tags
                    .get(competitor_id.as_str())
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| competitor_id.clone()),
                latest_rating: snapshot.rating,
                latest_date: snapshot.date,
                best_rating: best[&competitor_id],
                worst_rating: worst[&competitor_id],
                // Filled in from the leaderboards below
                rank: 0,
                rank_delta: 0,
                win_n: tally.win_n,
                lose_n: tally.lose_n,
                game_n,
                win_rate,
                diff_rating,
                updated,
                competitor_id,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.latest_rating
            .partial_cmp(&a.latest_rating)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.competitor_id.cmp(&b.competitor_id))
    });

    // Ranks come from the sorted leaderboard over latest ratings, and rank
    // movement from the leaderboard over second-latest ratings. Competitors
    // with a single active date have no previous rank and report no movement.
    let mut current_rank = 0;
    let mut previous_rating = f64::NAN;
    for (position, summary) in summaries.iter_mut().enumerate() {
        if summary.latest_rating != previous_rating {
            current_rank = position as u32 + 1;
            previous_rating = summary.latest_rating;
        }
        summary.rank = current_rank;
    }

    let previous_ranks = leaderboard_ranks(&previous);
    for summary in &mut summaries {
        summary.rank_delta = previous_ranks
            .get(summary.competitor_id.as_str())
            .map_or(0, |prev| i64::from(*prev) - i64::from(summary.rank));
    }

    summaries
}
