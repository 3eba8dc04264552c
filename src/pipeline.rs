//! End-to-end rating passes
//!
//! Ties the stages together: normalized feed -> engine replay -> daily
//! snapshots -> summaries, with the team pass running the same path over
//! reduced fixtures. Each pass recomputes the full history from the feed;
//! no rating state persists between runs.

use crate::config::EngineConfig;
use crate::engine::RatingEngine;
use crate::error::Result;
use crate::feed::MatchFeed;
use crate::snapshot::build_snapshots;
use crate::stats::summarize;
use crate::team::{RosterProvider, TeamAggregator, TeamMatchRecord, TeamSummary};
use crate::types::{CompetitorSummary, DailySnapshot, LedgerRecord};
use std::sync::Arc;
use tracing::info;

/// Everything one individual rating pass produces
#[derive(Debug, Clone, PartialEq)]
pub struct RatingReport {
    pub ledger: Vec<LedgerRecord>,
    pub snapshots: Vec<DailySnapshot>,
    pub summaries: Vec<CompetitorSummary>,
}

/// Everything one team rating pass produces
#[derive(Debug, Clone, PartialEq)]
pub struct TeamReport {
    pub fixtures: Vec<TeamMatchRecord>,
    pub ledger: Vec<LedgerRecord>,
    pub snapshots: Vec<DailySnapshot>,
    pub summaries: Vec<TeamSummary>,
}

/// Batch pipeline for one pool's policy parameters
#[derive(Debug, Clone)]
pub struct RatingPipeline {
    config: EngineConfig,
}

impl RatingPipeline {
    /// Create a pipeline after validating the policy parameters
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the active policy parameters
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the individual rating pass over a feed
    pub fn run(&self, mut feed: MatchFeed) -> Result<RatingReport> {
        let dropped = feed.normalize();
        info!(
            competitors = feed.competitors.len(),
            matches = feed.matches.len(),
            duplicates_dropped = dropped,
            "Running individual rating pass"
        );

        let mut engine = RatingEngine::new(self.config.clone())?;
        for competitor in &feed.competitors {
            engine.register(competitor.id.clone());
        }

        let ledger = engine.replay(&feed.matches)?;
        let snapshots = build_snapshots(&ledger);
        let summaries = summarize(&ledger, &snapshots, &feed.competitors);

        info!(
            records = ledger.len(),
            snapshots = snapshots.len(),
            "Individual rating pass complete"
        );
        Ok(RatingReport {
            ledger,
            snapshots,
            summaries,
        })
    }

    /// Run the team rating pass over the same feed
    ///
    /// Every roster team is seeded before replay, mirroring the competitor
    /// registration contract of the individual pass.
    pub fn run_teams(
        &self,
        mut feed: MatchFeed,
        roster: Arc<dyn RosterProvider>,
    ) -> Result<TeamReport> {
        feed.normalize();
        info!(matches = feed.matches.len(), "Running team rating pass");

        let aggregator = TeamAggregator::new(roster.clone());
        let fixtures = aggregator.reduce(&feed.matches)?;
        let team_matches = TeamAggregator::pair_matches(&fixtures);

        let mut engine = RatingEngine::new(self.config.clone())?;
        for team in roster.teams() {
            engine.register(team);
        }

        let ledger = engine.replay(&team_matches)?;
        let snapshots = build_snapshots(&ledger);
        let summaries = TeamAggregator::summarize(&fixtures, &snapshots);

        info!(
            fixtures = team_matches.len(),
            records = ledger.len(),
            "Team rating pass complete"
        );
        Ok(TeamReport {
            fixtures,
            ledger,
            snapshots,
            summaries,
        })
    }
}
