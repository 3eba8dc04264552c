//! Roster traits and implementations
//!
//! The roster maps competitors to teams and carries the per-slot point
//! tables: later slots of a team fixture can be worth more than earlier ones,
//! both for the weighted win tally and for the league points awarded to the
//! winning side.

use crate::types::{CompetitorId, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-slot weighting for team fixtures
///
/// `win_weights` feeds the weighted win/loss tally (and through it the score
/// margin of the aggregated team match); `points` is awarded to the winning
/// side only. Slots absent from a table default to weight 1 and 0 points.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotTables {
    win_weights: HashMap<u32, u32>,
    points: HashMap<u32, u32>,
}

impl SlotTables {
    /// Create tables from explicit slot mappings
    pub fn new(win_weights: HashMap<u32, u32>, points: HashMap<u32, u32>) -> Self {
        Self {
            win_weights,
            points,
        }
    }

    /// Uniform tables: every slot worth one win and zero points
    pub fn uniform() -> Self {
        Self::default()
    }

    /// Win weight for a slot
    pub fn win_weight(&self, slot: u32) -> u32 {
        self.win_weights.get(&slot).copied().unwrap_or(1)
    }

    /// League points for winning a slot
    pub fn points(&self, slot: u32) -> u32 {
        self.points.get(&slot).copied().unwrap_or(0)
    }
}

/// Trait for supplying team membership and fixture weighting
pub trait RosterProvider: Send + Sync {
    /// Team of a competitor, if mapped
    fn team_of(&self, competitor_id: &str) -> Option<TeamId>;

    /// All known teams, deterministically ordered
    fn teams(&self) -> Vec<TeamId>;

    /// The per-slot point tables in effect
    fn slot_tables(&self) -> &SlotTables;
}

/// Static roster built from explicit assignments
///
/// Re-assigning a competitor overwrites the earlier mapping (latest wins).
#[derive(Debug, Clone, Default)]
pub struct StaticRoster {
    assignments: HashMap<CompetitorId, TeamId>,
    tables: SlotTables,
}

impl StaticRoster {
    /// Create an empty roster with the given point tables
    pub fn new(tables: SlotTables) -> Self {
        Self {
            assignments: HashMap::new(),
            tables,
        }
    }

    /// Create a roster from (competitor, team) pairs
    pub fn from_assignments<I, C, T>(pairs: I, tables: SlotTables) -> Self
    where
        I: IntoIterator<Item = (C, T)>,
        C: Into<CompetitorId>,
        T: Into<TeamId>,
    {
        let mut roster = Self::new(tables);
        for (competitor, team) in pairs {
            roster.assign(competitor, team);
        }
        roster
    }

    /// Map a competitor to a team, replacing any earlier mapping
    pub fn assign(&mut self, competitor_id: impl Into<CompetitorId>, team_id: impl Into<TeamId>) {
        self.assignments.insert(competitor_id.into(), team_id.into());
    }
}

impl RosterProvider for StaticRoster {
    fn team_of(&self, competitor_id: &str) -> Option<TeamId> {
        self.assignments.get(competitor_id).cloned()
    }

    fn teams(&self) -> Vec<TeamId> {
        let mut teams: Vec<TeamId> = self.assignments.values().cloned().collect();
        teams.sort();
        teams.dedup();
        teams
    }

    fn slot_tables(&self) -> &SlotTables {
        &self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_tables_default_to_uniform() {
        let tables = SlotTables::uniform();
        assert_eq!(tables.win_weight(1), 1);
        assert_eq!(tables.win_weight(7), 1);
        assert_eq!(tables.points(1), 0);
    }

    #[test]
    fn test_slot_tables_lookup() {
        // Slot 3 is the double-weight anchor slot
        let tables = SlotTables::new(
            HashMap::from([(1, 1), (2, 1), (3, 2), (4, 1)]),
            HashMap::from([(1, 10), (2, 10), (3, 20), (4, 5)]),
        );

        assert_eq!(tables.win_weight(3), 2);
        assert_eq!(tables.points(3), 20);
        assert_eq!(tables.points(4), 5);
        // Unlisted slot falls back to the defaults
        assert_eq!(tables.win_weight(9), 1);
        assert_eq!(tables.points(9), 0);
    }

    #[test]
    fn test_latest_assignment_wins() {
        let mut roster = StaticRoster::new(SlotTables::uniform());
        roster.assign("p1", "red");
        roster.assign("p1", "blue");

        assert_eq!(roster.team_of("p1").unwrap(), "blue");
    }

    #[test]
    fn test_unmapped_competitor_has_no_team() {
        let roster = StaticRoster::new(SlotTables::uniform());
        assert!(roster.team_of("ghost").is_none());
    }

    #[test]
    fn test_teams_are_unique_and_ordered() {
        let roster = StaticRoster::from_assignments(
            [("p1", "red"), ("p2", "blue"), ("p3", "red")],
            SlotTables::uniform(),
        );

        assert_eq!(roster.teams(), vec!["blue".to_string(), "red".to_string()]);
    }
}
