//! Common types used throughout the rating engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for competitors (players)
pub type CompetitorId = String;

/// Unique identifier for teams
pub type TeamId = String;

/// Rating value on the standard 400-point logistic scale
pub type Rating = f64;

/// Global total-order key for matches: date first, intra-day ordinal second.
///
/// The ordinal also serves as the match-slot key for the team point tables
/// (slot 3 of a team fixture may be worth more than slot 1).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MatchSeq {
    pub date: NaiveDate,
    pub ordinal: u32,
}

impl std::fmt::Display for MatchSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.date, self.ordinal)
    }
}

/// A registered competitor
///
/// The id is immutable; the display tag follows a latest-wins policy when the
/// same competitor is registered more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub tag: String,
}

impl Competitor {
    pub fn new(id: impl Into<CompetitorId>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
        }
    }
}

/// Outcome of a match as reported by the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    SideAWins,
    SideBWins,
    /// Legal only in pools that allow draws (e.g. round-robin stages)
    Draw,
}

/// One head-to-head match result, immutable once ingested
///
/// Scores are `None` when the source score was unparseable; negative values are
/// sentinel scores for forfeits and disqualifications. Both cases fall back to
/// a margin of 1 rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: NaiveDate,
    /// Intra-day ordering, also the slot key for team point tables
    pub ordinal: u32,
    pub side_a: CompetitorId,
    pub side_b: CompetitorId,
    pub outcome: MatchOutcome,
    pub score_a: Option<i64>,
    pub score_b: Option<i64>,
}

impl MatchRecord {
    /// Get the global total-order key for this match
    pub fn seq(&self) -> MatchSeq {
        MatchSeq {
            date: self.date,
            ordinal: self.ordinal,
        }
    }

    /// Get the winning side, if the match was decided
    pub fn winner(&self) -> Option<&CompetitorId> {
        match self.outcome {
            MatchOutcome::SideAWins => Some(&self.side_a),
            MatchOutcome::SideBWins => Some(&self.side_b),
            MatchOutcome::Draw => None,
        }
    }

    /// Get the losing side, if the match was decided
    pub fn loser(&self) -> Option<&CompetitorId> {
        match self.outcome {
            MatchOutcome::SideAWins => Some(&self.side_b),
            MatchOutcome::SideBWins => Some(&self.side_a),
            MatchOutcome::Draw => None,
        }
    }

    /// Score margin driving the scale factor
    ///
    /// Absolute score difference when both scores are valid non-negative
    /// integers; otherwise 1. Forfeit sentinels like `(-1, -1)` land on the
    /// fallback, they never error.
    pub fn margin(&self) -> u64 {
        match (self.score_a, self.score_b) {
            (Some(a), Some(b)) if a >= 0 && b >= 0 => a.abs_diff(b),
            _ => 1,
        }
    }
}

/// Per-side outcome recorded in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideOutcome {
    Win,
    Loss,
    Draw,
}

/// One rating change for one competitor on one match
///
/// Two records are appended per processed match, one per side, sharing the
/// match sequence. The ledger is append-only and ordered by sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub seq: MatchSeq,
    pub competitor_id: CompetitorId,
    pub rating_after: Rating,
    pub delta: f64,
    pub outcome: SideOutcome,
}

/// Collapsed view of one competitor's activity on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub competitor_id: CompetitorId,
    /// Rating after the last match applied that date
    pub rating: Rating,
    /// Sum of all rating deltas accrued that date
    pub delta_sum: f64,
    /// Competition rank among all competitors active that date (1-based)
    pub rank: u32,
    /// Rank on the previous active date minus rank today; positive = improved
    pub rank_delta: i64,
}

/// Aggregate view of one competitor across the whole ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorSummary {
    pub competitor_id: CompetitorId,
    pub tag: String,
    pub latest_rating: Rating,
    pub latest_date: NaiveDate,
    pub best_rating: Rating,
    pub worst_rating: Rating,
    pub rank: u32,
    pub rank_delta: i64,
    pub win_n: u64,
    pub lose_n: u64,
    pub game_n: u64,
    pub win_rate: f64,
    /// Today's rating movement; zero unless the competitor played on the
    /// globally latest date
    pub diff_rating: f64,
    /// Whether the competitor played on the globally latest date
    pub updated: bool,
}
