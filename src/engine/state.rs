//! Stateful rating engine
//!
//! The engine owns the competitor -> rating mapping for one rating space. It
//! is an explicit value, never a process-wide singleton, so independent pools
//! and seasons can run side by side. Ratings change only through
//! `apply_match`, and matches must arrive in the global total order.

use crate::config::{EngineConfig, UnknownCompetitorPolicy};
use crate::engine::elo::{draw_delta, rating_delta};
use crate::error::{RatingError, Result};
use crate::types::{CompetitorId, LedgerRecord, MatchOutcome, MatchRecord, Rating, SideOutcome};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Per-pool rating state and the update rule applied to it
#[derive(Debug, Clone)]
pub struct RatingEngine {
    config: EngineConfig,
    ratings: HashMap<CompetitorId, Rating>,
}

impl RatingEngine {
    /// Create an engine with no registered competitors
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            ratings: HashMap::new(),
        })
    }

    /// Get the active policy parameters
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Seed a competitor at the initial rating
    ///
    /// Idempotent: registering an already-known competitor never resets their
    /// rating. Every competitor referenced by a match must be registered
    /// before that match is applied; the engine does not auto-register, which
    /// keeps typoed ids from silently polluting the rating space.
    pub fn register(&mut self, competitor_id: impl Into<CompetitorId>) {
        self.ratings
            .entry(competitor_id.into())
            .or_insert(self.config.initial_rating);
    }

    /// Current rating of a competitor, if registered
    pub fn rating(&self, competitor_id: &str) -> Option<Rating> {
        self.ratings.get(competitor_id).copied()
    }

    /// Number of registered competitors
    pub fn competitor_count(&self) -> usize {
        self.ratings.len()
    }

    /// Apply one match and append its pair of ledger records
    ///
    /// The two deltas always sum to zero: one value is computed and applied
    /// with opposite signs to the two sides.
    pub fn apply_match(
        &mut self,
        record: &MatchRecord,
    ) -> Result<(LedgerRecord, LedgerRecord)> {
        let rating_a = self.lookup(&record.side_a)?;
        let rating_b = self.lookup(&record.side_b)?;
        let margin = record.margin();

        match record.outcome {
            MatchOutcome::SideAWins | MatchOutcome::SideBWins => {
                let (winner, loser) = match record.outcome {
                    MatchOutcome::SideAWins => (&record.side_a, &record.side_b),
                    _ => (&record.side_b, &record.side_a),
                };
                let (winner_rating, loser_rating) = match record.outcome {
                    MatchOutcome::SideAWins => (rating_a, rating_b),
                    _ => (rating_b, rating_a),
                };

                let delta = rating_delta(winner_rating, loser_rating, margin, &self.config);
                let winner_after = winner_rating + delta;
                let loser_after = loser_rating - delta;
                self.ratings.insert(winner.clone(), winner_after);
                self.ratings.insert(loser.clone(), loser_after);

                Ok((
                    LedgerRecord {
                        seq: record.seq(),
                        competitor_id: winner.clone(),
                        rating_after: winner_after,
                        delta,
                        outcome: SideOutcome::Win,
                    },
                    LedgerRecord {
                        seq: record.seq(),
                        competitor_id: loser.clone(),
                        rating_after: loser_after,
                        delta: -delta,
                        outcome: SideOutcome::Loss,
                    },
                ))
            }
            MatchOutcome::Draw => {
                if !self.config.allow_draws {
                    return Err(RatingError::UnexpectedDraw {
                        date: record.date,
                        ordinal: record.ordinal,
                    }
                    .into());
                }

                // Correction toward 0.5 expectation from side A's perspective
                let delta = draw_delta(rating_a, rating_b, margin, &self.config);
                let a_after = rating_a + delta;
                let b_after = rating_b - delta;
                self.ratings.insert(record.side_a.clone(), a_after);
                self.ratings.insert(record.side_b.clone(), b_after);

                Ok((
                    LedgerRecord {
                        seq: record.seq(),
                        competitor_id: record.side_a.clone(),
                        rating_after: a_after,
                        delta,
                        outcome: SideOutcome::Draw,
                    },
                    LedgerRecord {
                        seq: record.seq(),
                        competitor_id: record.side_b.clone(),
                        rating_after: b_after,
                        delta: -delta,
                        outcome: SideOutcome::Draw,
                    },
                ))
            }
        }
    }

    /// Replay an ordered match sequence into a ledger
    ///
    /// Enforces the chronological order contract (non-decreasing sequence
    /// keys; two team fixtures may legally share a key) and applies the
    /// configured unknown-competitor policy.
    pub fn replay(&mut self, matches: &[MatchRecord]) -> Result<Vec<LedgerRecord>> {
        let mut ledger = Vec::with_capacity(matches.len() * 2);
        let mut previous = None;

        for record in matches {
            let seq = record.seq();
            if let Some(prev) = previous {
                if seq < prev {
                    return Err(RatingError::OutOfOrderMatch {
                        date: record.date,
                        ordinal: record.ordinal,
                    }
                    .into());
                }
            }
            previous = Some(seq);

            match self.apply_match(record) {
                Ok((first, second)) => {
                    ledger.push(first);
                    ledger.push(second);
                }
                Err(err) if self.is_skippable(&err) => {
                    warn!(seq = %seq, error = %err, "Skipping match per unknown-competitor policy");
                }
                Err(err) => return Err(err),
            }
        }

        debug!(
            matches = matches.len(),
            records = ledger.len(),
            "Replay complete"
        );
        Ok(ledger)
    }

    fn lookup(&self, competitor_id: &str) -> Result<Rating> {
        self.rating(competitor_id)
            .ok_or_else(|| {
                RatingError::UnknownCompetitor {
                    competitor_id: competitor_id.to_string(),
                }
                .into()
            })
    }

    fn is_skippable(&self, err: &anyhow::Error) -> bool {
        self.config.on_unknown == UnknownCompetitorPolicy::SkipAndLog
            && matches!(
                err.downcast_ref::<RatingError>(),
                Some(RatingError::UnknownCompetitor { .. })
            )
    }
}
