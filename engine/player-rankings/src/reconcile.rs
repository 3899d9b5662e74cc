use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::annotations::merge_annotations;
use crate::normalize::normalize;
use crate::resolver::{BaselineIndex, BaselineMatch, MatchTier};
use crate::types::{NormalizedRecord, Player, Position, RawRecord};

/// Output of one reconciliation run
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// One player per current-snapshot row, in feed order
    pub players: Vec<Arc<Player>>,

    /// Player id -> player. A duplicated id resolves to the last row carrying it.
    pub by_id: HashMap<String, Arc<Player>>,

    pub stats: ReconcileStats,
}

impl Reconciliation {
    pub fn get(&self, id: &str) -> Option<&Arc<Player>> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Match counts for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileStats {
    pub baseline_max_rank: f64,
    pub total: usize,
    pub matched_by_id: usize,
    pub matched_by_name_position: usize,
    pub matched_by_name_only: usize,
    pub unranked: usize,
}

impl ReconcileStats {
    fn record(&mut self, tier: Option<MatchTier>) {
        match tier {
            Some(MatchTier::Id) => self.matched_by_id += 1,
            Some(MatchTier::NamePosition) => self.matched_by_name_position += 1,
            Some(MatchTier::NameOnly) => self.matched_by_name_only += 1,
            None => self.unranked += 1,
        }
    }

    pub fn matched(&self) -> usize {
        self.matched_by_id + self.matched_by_name_position + self.matched_by_name_only
    }
}

/// Reconcile a current snapshot against a baseline snapshot.
///
/// Produces exactly one player per current row, in current-feed order.
/// Baseline-only players are not carried over.
pub fn reconcile(baseline_raw: &[RawRecord], current_raw: &[RawRecord]) -> Reconciliation {
    let baseline: Vec<NormalizedRecord> = baseline_raw.iter().map(normalize).collect();
    let index = BaselineIndex::build(&baseline);
    let virtual_nr = index.virtual_nr_rank();

    let mut stats =
        ReconcileStats { baseline_max_rank: index.max_rank(), total: current_raw.len(), ..Default::default() };

    let mut players: Vec<Player> = current_raw
        .iter()
        .map(|raw| {
            let record = normalize(raw);
            let found = index.resolve_detailed(&record);
            stats.record(found.map(|m| m.tier));
            enrich(record, found, &index, virtual_nr)
        })
        .collect();

    assign_pos_ranks(&mut players);

    let players: Vec<Arc<Player>> = players.into_iter().map(Arc::new).collect();
    let by_id = players.iter().map(|p| (p.id.clone(), Arc::clone(p))).collect();

    debug!(
        "[players] baseline max={}, NR count={}/{} (id={}, name+pos={}, name={})",
        stats.baseline_max_rank,
        stats.unranked,
        stats.total,
        stats.matched_by_id,
        stats.matched_by_name_position,
        stats.matched_by_name_only
    );

    Reconciliation { players, by_id, stats }
}

fn enrich(
    record: NormalizedRecord,
    found: Option<BaselineMatch>,
    index: &BaselineIndex<'_>,
    virtual_nr: f64,
) -> Player {
    let original_rank = found.map(|m| m.rank);
    let base = original_rank.and_then(|rank| index.record_at(rank));

    let effective_original = original_rank.unwrap_or(virtual_nr);
    let rank_change = record.rank.is_finite().then(|| record.rank - effective_original);

    // current snapshot wins, baseline fills gaps
    let team = record.team.or_else(|| base.and_then(|b| b.team.clone()));
    let bye = record.bye.or_else(|| base.and_then(|b| b.bye));

    let base_annotations = base.map(|b| b.annotations.as_slice()).unwrap_or(&[]);
    let annotations = merge_annotations(base_annotations, &record.annotations);

    Player {
        id: record.id,
        rank: record.rank,
        name: record.name,
        position: record.position,
        original_rank,
        rank_change,
        bye,
        team,
        pos_rank: None,
        annotations,
        was_unranked: original_rank.is_none(),
    }
}

/// Label ranked players with their rank inside their position ("WR7").
/// Ties keep feed order; unranked players get no label.
fn assign_pos_ranks(players: &mut [Player]) {
    let mut order: Vec<usize> = (0..players.len()).filter(|&i| players[i].is_ranked()).collect();
    order.sort_by(|&a, &b| players[a].rank.total_cmp(&players[b].rank));

    let mut counts: HashMap<Position, usize> = HashMap::new();
    for i in order {
        let count = counts.entry(players[i].position).or_insert(0);
        *count += 1;
        players[i].pos_rank = Some(format!("{}{}", players[i].position, count));
    }
}
