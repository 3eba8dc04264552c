//! Match feed normalization
//!
//! The feed is the boundary between external data acquisition and the engine.
//! Everything the engine relies on is established here: one canonical
//! competitor id namespace, one global chronological order, and no duplicate
//! match identities.

use crate::types::{Competitor, CompetitorId, MatchRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Ordered batch of matches plus the competitor registry they reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchFeed {
    pub competitors: Vec<Competitor>,
    pub matches: Vec<MatchRecord>,
}

impl MatchFeed {
    /// Create a feed from a competitor registry and raw match results
    pub fn new(competitors: Vec<Competitor>, matches: Vec<MatchRecord>) -> Self {
        Self {
            competitors,
            matches,
        }
    }

    /// Rewrite side ids through an alias table (e.g. entrant id -> player id)
    ///
    /// Sources that key matches by tournament entrant rather than by the
    /// underlying competitor are resolved here, once, so the engine never
    /// reasons about multiple id namespaces. Ids without an alias entry are
    /// left unchanged.
    pub fn resolve_aliases(&mut self, aliases: &HashMap<String, CompetitorId>) {
        for record in &mut self.matches {
            if let Some(canonical) = aliases.get(&record.side_a) {
                record.side_a = canonical.clone();
            }
            if let Some(canonical) = aliases.get(&record.side_b) {
                record.side_b = canonical.clone();
            }
        }
    }

    /// Establish the feed invariants the engine depends on
    ///
    /// Sorts matches into the global total order (date, then intra-day
    /// ordinal; input order is not guaranteed chronological), drops duplicate
    /// match identities keeping the first occurrence, and merges duplicate
    /// competitor registrations with a latest-wins display tag. Returns the
    /// number of duplicate matches dropped.
    pub fn normalize(&mut self) -> usize {
        self.matches.sort_by_key(|m| m.seq());

        let before = self.matches.len();
        let mut seen = std::collections::HashSet::new();
        self.matches.retain(|m| {
            let fresh = seen.insert(m.seq());
            if !fresh {
                warn!(seq = %m.seq(), "Duplicate match identity dropped, keeping first occurrence");
            }
            fresh
        });
        let dropped = before - self.matches.len();

        self.dedup_competitors();

        dropped
    }

    fn dedup_competitors(&mut self) {
        let mut order: Vec<CompetitorId> = Vec::new();
        let mut latest: HashMap<CompetitorId, String> = HashMap::new();

        for competitor in self.competitors.drain(..) {
            if !latest.contains_key(&competitor.id) {
                order.push(competitor.id.clone());
            }
            // Later registrations win the display tag
            latest.insert(competitor.id, competitor.tag);
        }

        self.competitors = order
            .into_iter()
            .map(|id| {
                let tag = latest.remove(&id).unwrap_or_default();
                Competitor { id, tag }
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchOutcome;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn raw_match(day: &str, ordinal: u32) -> MatchRecord {
        MatchRecord {
            date: date(day),
            ordinal,
            side_a: "a".to_string(),
            side_b: "b".to_string(),
            outcome: MatchOutcome::SideAWins,
            score_a: Some(2),
            score_b: Some(0),
        }
    }

    #[test]
    fn test_normalize_sorts_into_total_order() {
        let mut feed = MatchFeed::new(
            vec![],
            vec![
                raw_match("2025-07-02", 1),
                raw_match("2025-07-01", 2),
                raw_match("2025-07-01", 1),
            ],
        );

        feed.normalize();

        let seqs: Vec<_> = feed.matches.iter().map(|m| m.seq()).collect();
        let mut sorted = seqs.clone();
        sorted.sort();
        assert_eq!(seqs, sorted);
        assert_eq!(feed.matches[0].ordinal, 1);
        assert_eq!(feed.matches[0].date, date("2025-07-01"));
    }

    #[test]
    fn test_normalize_drops_duplicates_keeping_first() {
        let mut duplicate = raw_match("2025-07-01", 1);
        duplicate.score_a = Some(3); // different payload, same identity
        let mut feed = MatchFeed::new(
            vec![],
            vec![raw_match("2025-07-01", 1), duplicate, raw_match("2025-07-01", 2)],
        );

        let dropped = feed.normalize();

        assert_eq!(dropped, 1);
        assert_eq!(feed.matches.len(), 2);
        // First occurrence wins
        assert_eq!(feed.matches[0].score_a, Some(2));
    }

    #[test]
    fn test_duplicate_competitor_registration_is_latest_tag_wins() {
        let mut feed = MatchFeed::new(
            vec![
                Competitor::new("p1", "OldTag"),
                Competitor::new("p2", "Stable"),
                Competitor::new("p1", "NewTag"),
            ],
            vec![],
        );

        feed.normalize();

        assert_eq!(feed.competitors.len(), 2);
        assert_eq!(feed.competitors[0].id, "p1");
        assert_eq!(feed.competitors[0].tag, "NewTag");
        assert_eq!(feed.competitors[1].tag, "Stable");
    }

    #[test]
    fn test_resolve_aliases_rewrites_both_sides() {
        let mut feed = MatchFeed::new(vec![], vec![raw_match("2025-07-01", 1)]);
        let aliases = HashMap::from([
            ("a".to_string(), "player-1".to_string()),
            ("b".to_string(), "player-2".to_string()),
        ]);

        feed.resolve_aliases(&aliases);

        assert_eq!(feed.matches[0].side_a, "player-1");
        assert_eq!(feed.matches[0].side_b, "player-2");
    }

    #[test]
    fn test_resolve_aliases_leaves_unmapped_ids_alone() {
        let mut feed = MatchFeed::new(vec![], vec![raw_match("2025-07-01", 1)]);
        let aliases = HashMap::from([("a".to_string(), "player-1".to_string())]);

        feed.resolve_aliases(&aliases);

        assert_eq!(feed.matches[0].side_a, "player-1");
        assert_eq!(feed.matches[0].side_b, "b");
    }
}
