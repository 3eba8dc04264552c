//! Team match reduction and summaries
//!
//! Concurrent individual matches on one date between two rosters collapse
//! into a single team fixture. The fixture's weighted win tally becomes the
//! "score" of a synthetic match record, which the rating engine processes
//! exactly as it processes individual matches.

use crate::error::{RatingError, Result};
use crate::stats::summary::leaderboard_ranks;
use crate::team::roster::RosterProvider;
use crate::types::{DailySnapshot, MatchOutcome, MatchRecord, Rating, TeamId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// One team's side of a reduced fixture on one date
///
/// Fixtures come in mirrored pairs: the record for (team, opponent) and the
/// record for (opponent, team) describe the same fixture, and one side's
/// weighted win tally equals the other side's loss tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMatchRecord {
    pub date: NaiveDate,
    /// Slot of the fixture's first individual match; sequence tiebreaker
    pub ordinal: u32,
    pub team: TeamId,
    pub opponent: TeamId,
    /// Individual matches making up the fixture
    pub game_n: u32,
    /// Slot-weighted wins
    pub win_n: u32,
    /// Slot-weighted losses
    pub lose_n: u32,
    /// League points collected from won slots
    pub points: u32,
}

/// Aggregate view of one team across the whole season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team_id: TeamId,
    pub latest_rating: Rating,
    pub latest_date: NaiveDate,
    pub best_rating: Rating,
    pub worst_rating: Rating,
    pub rank: u32,
    pub rank_delta: i64,
    pub game_n: u64,
    pub win_n: u64,
    pub lose_n: u64,
    pub points: u64,
    pub win_rate: f64,
    pub diff_rating: f64,
    pub updated: bool,
}

/// Reduces individual matches into team fixtures via a roster
pub struct TeamAggregator {
    roster: Arc<dyn RosterProvider>,
}

impl TeamAggregator {
    /// Create an aggregator over the given roster
    pub fn new(roster: Arc<dyn RosterProvider>) -> Self {
        Self { roster }
    }

    /// The roster backing this aggregator
    pub fn roster(&self) -> &dyn RosterProvider {
        self.roster.as_ref()
    }

    /// Reduce ordered individual matches into mirrored team fixture records
    ///
    /// A competitor without a roster entry is fatal for team aggregation
    /// (`UnknownTeamMapping`); it never affects the individual rating run.
    /// Matches between two competitors of the same team carry no fixture
    /// information and are skipped with a warning.
    pub fn reduce(&self, matches: &[MatchRecord]) -> Result<Vec<TeamMatchRecord>> {
        let tables = self.roster.slot_tables();
        let mut fixtures: BTreeMap<(NaiveDate, TeamId, TeamId), TeamMatchRecord> =
            BTreeMap::new();

        for record in matches {
            let team_a = self.team_of(&record.side_a)?;
            let team_b = self.team_of(&record.side_b)?;
            if team_a == team_b {
                warn!(seq = %record.seq(), team = %team_a, "Intra-team match skipped in team aggregation");
                continue;
            }

            for (team, opponent) in [
                (team_a.clone(), team_b.clone()),
                (team_b.clone(), team_a.clone()),
            ] {
                let entry = fixtures
                    .entry((record.date, team.clone(), opponent.clone()))
                    .or_insert_with(|| TeamMatchRecord {
                        date: record.date,
                        ordinal: record.ordinal,
                        team,
                        opponent,
                        game_n: 0,
                        win_n: 0,
                        lose_n: 0,
                        points: 0,
                    });
                entry.game_n += 1;
            }

            if let Some(winner) = record.winner() {
                let (winner_team, loser_team) = if winner == &record.side_a {
                    (&team_a, &team_b)
                } else {
                    (&team_b, &team_a)
                };
                let weight = tables.win_weight(record.ordinal);
                let slot_points = tables.points(record.ordinal);

                if let Some(entry) =
                    fixtures.get_mut(&(record.date, winner_team.clone(), loser_team.clone()))
                {
                    entry.win_n += weight;
                    entry.points += slot_points;
                }
                if let Some(entry) =
                    fixtures.get_mut(&(record.date, loser_team.clone(), winner_team.clone()))
                {
                    entry.lose_n += weight;
                }
            }
            // Drawn individual matches contribute to game_n only
        }

        let mut reduced: Vec<TeamMatchRecord> = fixtures.into_values().collect();
        reduced.sort_by(|a, b| {
            (a.date, a.ordinal)
                .cmp(&(b.date, b.ordinal))
                .then_with(|| a.team.cmp(&b.team))
        });

        debug!(
            matches = matches.len(),
            fixtures = reduced.len() / 2,
            "Team reduction complete"
        );
        Ok(reduced)
    }

    /// Collapse mirrored fixture records into engine-ready match records
    ///
    /// One match per (date, team pair): the weighted win tallies become the
    /// scores (so the fixture margin drives the scale factor), and an equal
    /// tally reduces to a draw.
    pub fn pair_matches(team_matches: &[TeamMatchRecord]) -> Vec<MatchRecord> {
        let mut seen: HashSet<(NaiveDate, TeamId, TeamId)> = HashSet::new();
        let mut paired = Vec::new();

        for record in team_matches {
            let mut sides = [record.team.clone(), record.opponent.clone()];
            sides.sort();
            let [low, high] = sides;
            if !seen.insert((record.date, low, high)) {
                continue;
            }

            let outcome = match record.win_n.cmp(&record.lose_n) {
                Ordering::Greater => MatchOutcome::SideAWins,
                Ordering::Less => MatchOutcome::SideBWins,
                Ordering::Equal => MatchOutcome::Draw,
            };

            paired.push(MatchRecord {
                date: record.date,
                ordinal: record.ordinal,
                side_a: record.team.clone(),
                side_b: record.opponent.clone(),
                outcome,
                score_a: Some(i64::from(record.win_n)),
                score_b: Some(i64::from(record.lose_n)),
            });
        }

        paired.sort_by_key(|m| m.seq());
        paired
    }

    /// Build one summary row per team from the fixtures and the team snapshots
    ///
    /// Output is sorted by latest rating descending.
    pub fn summarize(
        team_matches: &[TeamMatchRecord],
        snapshots: &[DailySnapshot],
    ) -> Vec<TeamSummary> {
        #[derive(Default, Clone, Copy)]
        struct Totals {
            game_n: u64,
            win_n: u64,
            lose_n: u64,
            points: u64,
        }

        let mut totals: HashMap<&str, Totals> = HashMap::new();
        for record in team_matches {
            let entry = totals.entry(record.team.as_str()).or_default();
            entry.game_n += u64::from(record.game_n);
            entry.win_n += u64::from(record.win_n);
            entry.lose_n += u64::from(record.lose_n);
            entry.points += u64::from(record.points);
        }

        let global_latest = snapshots.iter().map(|s| s.date).max();

        let mut latest: BTreeMap<TeamId, &DailySnapshot> = BTreeMap::new();
        let mut previous: HashMap<TeamId, f64> = HashMap::new();
        let mut best: HashMap<TeamId, f64> = HashMap::new();
        let mut worst: HashMap<TeamId, f64> = HashMap::new();
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

        let mut summaries: Vec<TeamSummary> = latest
            .into_iter()
            .map(|(team_id, snapshot)| {
                let team_totals = totals.get(team_id.as_str()).copied().unwrap_or_default();
                let decided = team_totals.win_n + team_totals.lose_n;
                let win_rate = if decided > 0 {
                    team_totals.win_n as f64 / decided as f64
                } else {
                    0.0
                };

                let updated = Some(snapshot.date) == global_latest;
                let diff_rating = if updated { snapshot.delta_sum } else { 0.0 };

                TeamSummary {
                    latest_rating: snapshot.rating,
                    latest_date: snapshot.date,
                    best_rating: best[&team_id],
                    worst_rating: worst[&team_id],
                    // Filled in from the leaderboards below
                    rank: 0,
                    rank_delta: 0,
                    game_n: team_totals.game_n,
                    win_n: team_totals.win_n,
                    lose_n: team_totals.lose_n,
                    points: team_totals.points,
                    win_rate,
                    diff_rating,
                    updated,
                    team_id,
                }
            })
            .collect();

        summaries.sort_by(|a, b| {
            b.latest_rating
                .partial_cmp(&a.latest_rating)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.team_id.cmp(&b.team_id))
        });

        // One leaderboard over latest ratings, exactly as for individual
        // summaries; a team idle since an early date is ranked where its
        // rating stands today.
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
                .get(summary.team_id.as_str())
                .map_or(0, |prev| i64::from(*prev) - i64::from(summary.rank));
        }

        summaries
    }

    fn team_of(&self, competitor_id: &str) -> Result<TeamId> {
        self.roster.team_of(competitor_id).ok_or_else(|| {
            RatingError::UnknownTeamMapping {
                competitor_id: competitor_id.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::roster::{SlotTables, StaticRoster};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn fixture_match(day: &str, slot: u32, winner: &str, loser: &str) -> MatchRecord {
        MatchRecord {
            date: date(day),
            ordinal: slot,
            side_a: winner.to_string(),
            side_b: loser.to_string(),
            outcome: MatchOutcome::SideAWins,
            score_a: Some(2),
            score_b: Some(0),
        }
    }

    fn league_roster() -> Arc<StaticRoster> {
        // Slot 3 worth double, per the league's anchor-slot rule
        let tables = SlotTables::new(
            HashMap::from([(1, 1), (2, 1), (3, 2), (4, 1)]),
            HashMap::from([(1, 10), (2, 10), (3, 20), (4, 5)]),
        );
        Arc::new(StaticRoster::from_assignments(
            [
                ("r1", "red"),
                ("r2", "red"),
                ("b1", "blue"),
                ("b2", "blue"),
            ],
            tables,
        ))
    }

    fn find<'a>(records: &'a [TeamMatchRecord], team: &str) -> &'a TeamMatchRecord {
        records.iter().find(|r| r.team == team).unwrap()
    }

    #[test]
    fn test_reduce_weights_slots_and_awards_points() {
        let aggregator = TeamAggregator::new(league_roster());
        // Red takes slots 1 and 3, blue takes slots 2 and 4
        let matches = vec![
            fixture_match("2025-07-01", 1, "r1", "b1"),
            fixture_match("2025-07-01", 2, "b2", "r2"),
            fixture_match("2025-07-01", 3, "r1", "b2"),
            fixture_match("2025-07-01", 4, "b1", "r2"),
        ];

        let reduced = aggregator.reduce(&matches).unwrap();
        assert_eq!(reduced.len(), 2);

        let red = find(&reduced, "red");
        assert_eq!(red.game_n, 4);
        assert_eq!(red.win_n, 1 + 2); // slot 1 plus double-weight slot 3
        assert_eq!(red.lose_n, 1 + 1);
        assert_eq!(red.points, 10 + 20);
        assert_eq!(red.opponent, "blue");

        let blue = find(&reduced, "blue");
        assert_eq!(blue.win_n, red.lose_n);
        assert_eq!(blue.lose_n, red.win_n);
        assert_eq!(blue.points, 10 + 5);
    }

    #[test]
    fn test_reduce_rejects_unmapped_competitor() {
        let aggregator = TeamAggregator::new(league_roster());
        let matches = vec![fixture_match("2025-07-01", 1, "r1", "ghost")];

        let err = aggregator.reduce(&matches).unwrap_err();
        match err.downcast_ref::<RatingError>() {
            Some(RatingError::UnknownTeamMapping { competitor_id }) => {
                assert_eq!(competitor_id, "ghost");
            }
            other => panic!("expected UnknownTeamMapping, got {:?}", other),
        }
    }

    #[test]
    fn test_reduce_skips_intra_team_matches() {
        let aggregator = TeamAggregator::new(league_roster());
        let matches = vec![
            fixture_match("2025-07-01", 1, "r1", "r2"),
            fixture_match("2025-07-01", 2, "r1", "b1"),
        ];

        let reduced = aggregator.reduce(&matches).unwrap();

        let red = find(&reduced, "red");
        assert_eq!(red.game_n, 1);
        assert_eq!(red.win_n, 1);
    }

    #[test]
    fn test_fixtures_on_different_dates_stay_separate() {
        let aggregator = TeamAggregator::new(league_roster());
        let matches = vec![
            fixture_match("2025-07-01", 1, "r1", "b1"),
            fixture_match("2025-07-08", 1, "b1", "r1"),
        ];

        let reduced = aggregator.reduce(&matches).unwrap();
        assert_eq!(reduced.len(), 4);
        assert_eq!(find(&reduced, "red").date, date("2025-07-01"));
    }

    #[test]
    fn test_pair_matches_produces_one_match_per_fixture() {
        let aggregator = TeamAggregator::new(league_roster());
        let matches = vec![
            fixture_match("2025-07-01", 1, "r1", "b1"),
            fixture_match("2025-07-01", 2, "b2", "r2"),
            fixture_match("2025-07-01", 3, "r1", "b2"),
        ];

        let reduced = aggregator.reduce(&matches).unwrap();
        let paired = TeamAggregator::pair_matches(&reduced);

        assert_eq!(paired.len(), 1);
        let fixture = &paired[0];
        // Red won slots 1 and 3 (weight 3), blue won slot 2 (weight 1)
        let red_side_score = if fixture.side_a == "red" {
            fixture.score_a
        } else {
            fixture.score_b
        };
        assert_eq!(red_side_score, Some(3));
        assert_eq!(fixture.winner().unwrap(), "red");
        assert_eq!(fixture.margin(), 2);
    }

    #[test]
    fn test_equal_weighted_tallies_pair_to_a_draw() {
        let aggregator = TeamAggregator::new(league_roster());
        // Slots 1 and 2 split evenly, both weight 1
        let matches = vec![
            fixture_match("2025-07-01", 1, "r1", "b1"),
            fixture_match("2025-07-01", 2, "b2", "r2"),
        ];

        let reduced = aggregator.reduce(&matches).unwrap();
        let paired = TeamAggregator::pair_matches(&reduced);

        assert_eq!(paired.len(), 1);
        assert_eq!(paired[0].outcome, MatchOutcome::Draw);
    }

    #[test]
    fn test_summarize_totals_and_activity_flag() {
        let aggregator = TeamAggregator::new(league_roster());
        let matches = vec![
            fixture_match("2025-07-01", 1, "r1", "b1"),
            fixture_match("2025-07-01", 3, "r1", "b2"),
            fixture_match("2025-07-08", 1, "b1", "r1"),
        ];
        let reduced = aggregator.reduce(&matches).unwrap();

        let snapshots = vec![
            DailySnapshot {
                date: date("2025-07-01"),
                competitor_id: "red".to_string(),
                rating: 1515.0,
                delta_sum: 15.0,
                rank: 1,
                rank_delta: 0,
            },
            DailySnapshot {
                date: date("2025-07-08"),
                competitor_id: "blue".to_string(),
                rating: 1495.0,
                delta_sum: 10.0,
                rank: 2,
                rank_delta: 0,
            },
        ];

        let summaries = TeamAggregator::summarize(&reduced, &snapshots);
        assert_eq!(summaries.len(), 2);

        let red = summaries.iter().find(|s| s.team_id == "red").unwrap();
        assert_eq!(red.game_n, 3);
        assert_eq!(red.win_n, 3); // slots 1 and 3 on July 1
        assert_eq!(red.lose_n, 1); // slot 1 on July 8
        assert_eq!(red.points, 30);
        assert_eq!(red.win_rate, 0.75);
        assert!(!red.updated); // blue played the latest date, red did not
        assert_eq!(red.diff_rating, 0.0);

        let blue = summaries.iter().find(|s| s.team_id == "blue").unwrap();
        assert!(blue.updated);
        assert_eq!(blue.diff_rating, 10.0);
    }

    #[test]
    fn test_team_ranks_follow_latest_ratings_across_dates() {
        // red is idle after July 1 and has slipped below blue by the latest
        // date; the summary ranks red by where its rating stands now.
        let snapshots = vec![
            DailySnapshot {
                date: date("2025-07-01"),
                competitor_id: "red".to_string(),
                rating: 1480.0,
                delta_sum: -20.0,
                rank: 1,
                rank_delta: 0,
            },
            DailySnapshot {
                date: date("2025-07-08"),
                competitor_id: "blue".to_string(),
                rating: 1520.0,
                delta_sum: 20.0,
                rank: 1,
                rank_delta: 0,
            },
        ];

        let summaries = TeamAggregator::summarize(&[], &snapshots);

        let blue = summaries.iter().find(|s| s.team_id == "blue").unwrap();
        let red = summaries.iter().find(|s| s.team_id == "red").unwrap();
        assert_eq!(blue.rank, 1);
        assert_eq!(red.rank, 2);
    }
}
