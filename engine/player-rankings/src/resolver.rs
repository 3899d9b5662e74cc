use serde::Serialize;
use std::collections::HashMap;

use crate::keys::name_position_key;
use crate::types::NormalizedRecord;

/// Which index produced a baseline match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Exact id
    Id,
    /// Canonical name + position
    NamePosition,
    /// Canonical name alone, lowest baseline rank wins
    NameOnly,
}

/// A resolved baseline match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineMatch {
    pub rank: f64,
    pub tier: MatchTier,
}

/// Lookup indices over a normalized baseline snapshot.
///
/// Only records with a finite rank are indexed; the rest can never be a
/// match target. On key collisions the later record wins.
pub struct BaselineIndex<'a> {
    /// id -> baseline rank
    by_id: HashMap<&'a str, f64>,

    /// "name_canon|POSITION" -> baseline rank
    by_name_position: HashMap<String, f64>,

    /// name_canon -> every baseline rank with that name
    by_name: HashMap<&'a str, Vec<f64>>,

    /// Baseline rank (as bits) -> record, for borrowing team/bye/annotations
    by_rank: HashMap<u64, &'a NormalizedRecord>,

    /// Largest finite baseline rank, 0 when none
    max_rank: f64,
}

impl<'a> BaselineIndex<'a> {
    pub fn build(baseline: &'a [NormalizedRecord]) -> Self {
        let mut index = Self {
            by_id: HashMap::with_capacity(baseline.len()),
            by_name_position: HashMap::with_capacity(baseline.len()),
            by_name: HashMap::with_capacity(baseline.len()),
            by_rank: HashMap::with_capacity(baseline.len()),
            max_rank: 0.0,
        };

        for record in baseline.iter().filter(|r| r.rank.is_finite()) {
            let rank = record.rank;
            index.max_rank = index.max_rank.max(rank);
            index.by_id.insert(record.id.as_str(), rank);
            index
                .by_name_position
                .insert(name_position_key(&record.name_canon, record.position.as_str()), rank);
            index.by_name.entry(record.name_canon.as_str()).or_default().push(rank);
            index.by_rank.insert(rank.to_bits(), record);
        }

        index
    }

    /// Resolve a current-snapshot record to its baseline rank, if any
    pub fn resolve(&self, record: &NormalizedRecord) -> Option<f64> {
        self.resolve_detailed(record).map(|m| m.rank)
    }

    /// Match cascade: id, then name+position, then name alone. When several
    /// baseline players share the name, the lowest (best) rank is taken.
    pub fn resolve_detailed(&self, record: &NormalizedRecord) -> Option<BaselineMatch> {
        if let Some(&rank) = self.by_id.get(record.id.as_str()) {
            return Some(BaselineMatch { rank, tier: MatchTier::Id });
        }

        let key = name_position_key(&record.name_canon, record.position.as_str());
        if let Some(&rank) = self.by_name_position.get(&key) {
            return Some(BaselineMatch { rank, tier: MatchTier::NamePosition });
        }

        self.by_name
            .get(record.name_canon.as_str())
            .and_then(|ranks| ranks.iter().copied().reduce(f64::min))
            .map(|rank| BaselineMatch { rank, tier: MatchTier::NameOnly })
    }

    /// Baseline record holding the given rank
    pub fn record_at(&self, rank: f64) -> Option<&'a NormalizedRecord> {
        self.by_rank.get(&rank.to_bits()).copied()
    }

    pub fn max_rank(&self) -> f64 {
        self.max_rank
    }

    /// Rank assigned to players missing from the baseline: one slot worse
    /// than the worst-ranked baseline player
    pub fn virtual_nr_rank(&self) -> f64 {
        self.max_rank + 1.0
    }

    pub fn len(&self) -> usize {
        self.by_rank.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_rank.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::types::RawRecord;
    use serde_json::{json, Value};

    fn records(rows: Value) -> Vec<NormalizedRecord> {
        rows.as_array().unwrap().iter().map(|v| normalize(&RawRecord::from_value(v).unwrap())).collect()
    }

    #[test]
    fn test_id_match_wins() {
        let baseline = records(json!([
            { "id": "a", "rank": 5, "name": "Someone Else", "position": "QB" },
            { "rank": 1, "name": "Bob Smith", "position": "RB" },
        ]));
        let index = BaselineIndex::build(&baseline);
        let current = records(json!([{ "id": "a", "rank": 3, "name": "Bob Smith", "position": "RB" }]));

        let found = index.resolve_detailed(&current[0]).unwrap();
        assert_eq!(found, BaselineMatch { rank: 5.0, tier: MatchTier::Id });
    }

    #[test]
    fn test_name_position_beats_name_only() {
        let baseline = records(json!([
            { "rank": 10, "name": "Josh Allen", "position": "QB" },
            { "rank": 3, "name": "Josh Allen", "position": "DEF" },
        ]));
        let index = BaselineIndex::build(&baseline);
        // explicit id so the id index misses and the name tiers decide
        let current = records(json!([{ "id": "feed-17", "rank": 12, "name": "Josh Allen", "position": "qb" }]));

        let found = index.resolve_detailed(&current[0]).unwrap();
        assert_eq!(found, BaselineMatch { rank: 10.0, tier: MatchTier::NamePosition });
    }

    #[test]
    fn test_name_only_takes_lowest_rank() {
        let baseline = records(json!([
            { "rank": 40, "name": "Mike Williams", "position": "WR" },
            { "rank": 25, "name": "Mike Williams", "position": "QB" },
        ]));
        let index = BaselineIndex::build(&baseline);
        let current = records(json!([{ "rank": 30, "name": "Mike Williams Jr.", "position": "TE" }]));

        let found = index.resolve_detailed(&current[0]).unwrap();
        assert_eq!(found, BaselineMatch { rank: 25.0, tier: MatchTier::NameOnly });
    }

    #[test]
    fn test_no_match() {
        let baseline = records(json!([{ "rank": 1, "name": "X", "position": "WR" }]));
        let index = BaselineIndex::build(&baseline);
        let current = records(json!([{ "rank": 1, "name": "Y", "position": "WR" }]));

        assert_eq!(index.resolve(&current[0]), None);
    }

    #[test]
    fn test_unranked_baseline_rows_not_indexed() {
        let baseline = records(json!([
            { "id": "a", "rank": "N/A", "name": "Bob Smith", "position": "RB" },
            { "rank": 7, "name": "Other Guy", "position": "WR" },
        ]));
        let index = BaselineIndex::build(&baseline);
        let current = records(json!([{ "id": "a", "rank": 2, "name": "Bob Smith", "position": "RB" }]));

        assert_eq!(index.resolve(&current[0]), None);
        assert_eq!(index.len(), 1);
        assert_eq!(index.max_rank(), 7.0);
        assert_eq!(index.virtual_nr_rank(), 8.0);
    }

    #[test]
    fn test_record_at_rank() {
        let baseline = records(json!([{ "rank": 4, "name": "Bob Smith", "position": "RB", "team": "NE", "bye": 14 }]));
        let index = BaselineIndex::build(&baseline);

        let record = index.record_at(4.0).unwrap();
        assert_eq!(record.team.as_deref(), Some("NE"));
        assert_eq!(record.bye, Some(14));
        assert!(index.record_at(5.0).is_none());
    }

    #[test]
    fn test_empty_baseline() {
        let index = BaselineIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.max_rank(), 0.0);
        assert_eq!(index.virtual_nr_rank(), 1.0);
    }
}
