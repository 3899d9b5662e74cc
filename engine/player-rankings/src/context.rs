use serde_json::Value;
use std::cell::OnceCell;
use std::sync::Arc;
use tracing::info;

use crate::annotations::{Annotation, AnnotationIndex};
use crate::board::DraftBoard;
use crate::error::Result;
use crate::feed::{snapshot_from_value, updates_from_value};
use crate::reconcile::{reconcile, ReconcileStats, Reconciliation};
use crate::types::{Player, RawRecord, UpdateRow};

/// Which derived results are currently cached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatus {
    pub reconciliation: bool,
    pub annotations: bool,
}

/// Rankings state for one application load.
///
/// Built once at startup and handed to whoever needs players or
/// annotations. Derived results are computed on first use and cached until
/// one of the input documents is replaced by a different document. Replacing
/// a document with the very same `Arc` keeps the cache.
pub struct RankingsContext {
    baseline: Arc<[RawRecord]>,
    current: Arc<[RawRecord]>,
    updates: Arc<[Vec<UpdateRow>]>,

    reconciliation: OnceCell<Reconciliation>,
    annotations: OnceCell<AnnotationIndex>,

    /// Bumped whenever a cached result is dropped
    generation: u64,
}

impl RankingsContext {
    pub fn new(baseline: impl Into<Arc<[RawRecord]>>, current: impl Into<Arc<[RawRecord]>>) -> Self {
        Self {
            baseline: baseline.into(),
            current: current.into(),
            updates: Arc::from(Vec::<Vec<UpdateRow>>::new()),
            reconciliation: OnceCell::new(),
            annotations: OnceCell::new(),
            generation: 0,
        }
    }

    pub fn with_updates(mut self, updates: impl Into<Arc<[Vec<UpdateRow>]>>) -> Self {
        self.set_updates(updates);
        self
    }

    /// Build from already-parsed JSON documents
    pub fn from_documents(baseline: &Value, current: &Value, updates: &[Value]) -> Result<Self> {
        let baseline = snapshot_from_value("baseline", baseline)?;
        let current = snapshot_from_value("current", current)?;
        let updates = updates
            .iter()
            .enumerate()
            .map(|(i, doc)| updates_from_value(&format!("updates[{i}]"), doc))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Rankings context: {} baseline rows, {} current rows, {} update feeds",
            baseline.len(),
            current.len(),
            updates.len()
        );

        Ok(Self::new(baseline, current).with_updates(updates))
    }

    /// Reconciled players, computed on first call
    pub fn reconciliation(&self) -> &Reconciliation {
        self.reconciliation.get_or_init(|| reconcile(&self.baseline, &self.current))
    }

    /// Update-feed cross reference, computed on first call
    pub fn annotation_index(&self) -> &AnnotationIndex {
        self.annotations.get_or_init(|| {
            AnnotationIndex::build(self.reconciliation().players.iter().map(|p| &**p), &self.updates)
        })
    }

    pub fn players(&self) -> &[Arc<Player>] {
        &self.reconciliation().players
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Arc<Player>> {
        self.reconciliation().get(id)
    }

    pub fn stats(&self) -> &ReconcileStats {
        &self.reconciliation().stats
    }

    /// A player's reconciled annotations plus everything the update feeds
    /// attached to it. Unknown ids only see update-feed annotations.
    pub fn get_annotations(&self, id: &str) -> Vec<Annotation> {
        let own = self.get_by_id(id).map(|p| p.annotations.as_slice()).unwrap_or(&[]);
        self.annotation_index().annotations_for(id, own)
    }

    /// Fresh visibility projection over the current players
    pub fn board(&self) -> DraftBoard {
        DraftBoard::new(self.players())
    }

    pub fn set_baseline(&mut self, baseline: impl Into<Arc<[RawRecord]>>) {
        let baseline = baseline.into();
        if Arc::ptr_eq(&self.baseline, &baseline) {
            return;
        }
        self.baseline = baseline;
        self.invalidate();
    }

    pub fn set_current(&mut self, current: impl Into<Arc<[RawRecord]>>) {
        let current = current.into();
        if Arc::ptr_eq(&self.current, &current) {
            return;
        }
        self.current = current;
        self.invalidate();
    }

    /// Replace the update feeds. Reconciled players stay cached.
    pub fn set_updates(&mut self, updates: impl Into<Arc<[Vec<UpdateRow>]>>) {
        let updates = updates.into();
        if Arc::ptr_eq(&self.updates, &updates) {
            return;
        }
        self.updates = updates;
        if self.annotations.take().is_some() {
            self.generation += 1;
        }
    }

    /// Drop every cached result
    pub fn invalidate(&mut self) {
        let had_reconciliation = self.reconciliation.take().is_some();
        let had_annotations = self.annotations.take().is_some();
        if had_reconciliation || had_annotations {
            self.generation += 1;
        }
    }

    pub fn cache_status(&self) -> CacheStatus {
        CacheStatus { reconciliation: self.reconciliation.get().is_some(), annotations: self.annotations.get().is_some() }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn baseline(&self) -> &Arc<[RawRecord]> {
        &self.baseline
    }

    pub fn current(&self) -> &Arc<[RawRecord]> {
        &self.current
    }

    pub fn updates(&self) -> &Arc<[Vec<UpdateRow>]> {
        &self.updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> RankingsContext {
        RankingsContext::from_documents(
            &json!([{ "id": "a", "rank": 1, "name": "Bob Smith", "position": "RB", "team": "NE" }]),
            &json!([{ "id": "a", "rank": 3, "name": "Bob Smith", "position": "RB" }]),
            &[json!([{ "name": "Bob Smith", "position": "RB", "annotations": [{ "kind": "injury", "part": "ankle" }] }])],
        )
        .unwrap()
    }

    #[test]
    fn test_lazy_computation() {
        let ctx = context();
        assert_eq!(ctx.cache_status(), CacheStatus { reconciliation: false, annotations: false });

        assert_eq!(ctx.players().len(), 1);
        assert_eq!(ctx.cache_status(), CacheStatus { reconciliation: true, annotations: false });

        assert_eq!(ctx.get_annotations("a").len(), 1);
        assert_eq!(ctx.cache_status(), CacheStatus { reconciliation: true, annotations: true });
    }

    #[test]
    fn test_repeated_lookups_reuse_cache() {
        let ctx = context();
        let first = ctx.reconciliation() as *const Reconciliation;
        for _ in 0..3 {
            ctx.get_annotations("a");
        }
        assert!(std::ptr::eq(first, ctx.reconciliation()));
        assert_eq!(ctx.generation(), 0);
    }

    #[test]
    fn test_same_document_keeps_cache() {
        let mut ctx = context();
        ctx.get_annotations("a");

        let baseline = Arc::clone(ctx.baseline());
        let updates = Arc::clone(ctx.updates());
        ctx.set_baseline(baseline);
        ctx.set_updates(updates);

        assert_eq!(ctx.cache_status(), CacheStatus { reconciliation: true, annotations: true });
        assert_eq!(ctx.generation(), 0);
    }

    #[test]
    fn test_new_current_document_invalidates() {
        let mut ctx = context();
        assert_eq!(ctx.players()[0].rank, 3.0);

        let reloaded =
            vec![RawRecord::from_value(&json!({ "id": "a", "rank": 5, "name": "Bob Smith", "position": "RB" })).unwrap()];
        ctx.set_current(reloaded);

        assert_eq!(ctx.cache_status(), CacheStatus { reconciliation: false, annotations: false });
        assert_eq!(ctx.generation(), 1);
        assert_eq!(ctx.players()[0].rank_change, Some(4.0));
    }

    #[test]
    fn test_new_updates_only_drop_annotation_index() {
        let mut ctx = context();
        assert_eq!(ctx.get_annotations("a").len(), 1);

        ctx.set_updates(Vec::<Vec<UpdateRow>>::new());

        assert_eq!(ctx.cache_status(), CacheStatus { reconciliation: true, annotations: false });
        assert!(ctx.get_annotations("a").is_empty());
    }

    #[test]
    fn test_explicit_invalidate() {
        let mut ctx = context();
        ctx.players();
        ctx.invalidate();
        assert_eq!(ctx.cache_status(), CacheStatus { reconciliation: false, annotations: false });
        assert_eq!(ctx.generation(), 1);

        // nothing cached, nothing to drop
        ctx.invalidate();
        assert_eq!(ctx.generation(), 1);
    }

    #[test]
    fn test_board_shares_players() {
        let ctx = context();
        let board = ctx.board();
        assert!(Arc::ptr_eq(&board.visible()[0], &ctx.players()[0]));
    }
}
