//! Draft board visibility projection
//!
//! The board keeps its own ordered list of visible players on top of the
//! canonical reconciled list. Hiding, unhiding, shuffling and resetting only
//! touch that list; the shared `Arc<Player>` values are never modified.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

use crate::types::Player;

/// One line of the rendered board
#[derive(Debug, Clone)]
pub enum DisplayItem {
    /// Start of a draft round
    Header { round: i64 },
    Player(Arc<Player>),
}

#[derive(Debug, Clone)]
pub struct DraftBoard {
    original: Vec<Arc<Player>>,
    visible: Vec<Arc<Player>>,
    by_id: HashMap<String, Arc<Player>>,
}

impl DraftBoard {
    pub fn new(players: &[Arc<Player>]) -> Self {
        let original = players.to_vec();
        let by_id = original.iter().map(|p| (p.id.clone(), Arc::clone(p))).collect();
        Self { visible: original.clone(), original, by_id }
    }

    pub fn visible(&self) -> &[Arc<Player>] {
        &self.visible
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Arc<Player>> {
        self.by_id.get(id)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.iter().any(|p| p.id == id)
    }

    pub fn hide_by_id(&mut self, id: &str) {
        self.visible.retain(|p| p.id != id);
    }

    /// Put a hidden player back at the end of the visible list
    pub fn unhide_by_id(&mut self, id: &str) {
        if self.is_visible(id) {
            return;
        }
        if let Some(player) = self.by_id.get(id) {
            self.visible.push(Arc::clone(player));
        }
    }

    /// Restore every player in the original order
    pub fn reset(&mut self) {
        self.visible = self.original.clone();
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.visible.shuffle(rng);
    }

    /// Visible players by rank, with a round header whenever the round
    /// changes. Round `n` covers ranks `(n-1)*teams+1 ..= n*teams`.
    ///
    /// Unranked players are listed last, after the final round.
    pub fn display_list(&self, teams: usize) -> Vec<DisplayItem> {
        let size = teams.max(1) as f64;

        let (mut ranked, unranked): (Vec<&Arc<Player>>, Vec<&Arc<Player>>) =
            self.visible.iter().partition(|p| p.is_ranked());
        ranked.sort_by(|a, b| a.rank.total_cmp(&b.rank));

        let mut items = Vec::with_capacity(self.visible.len() + self.visible.len() / teams.max(1) + 1);
        let mut current_round = None;

        for player in ranked {
            let round = (((player.rank - 1.0) / size).floor() as i64).saturating_add(1);
            if current_round != Some(round) {
                current_round = Some(round);
                items.push(DisplayItem::Header { round });
            }
            items.push(DisplayItem::Player(Arc::clone(player)));
        }

        items.extend(unranked.into_iter().map(|p| DisplayItem::Player(Arc::clone(p))));
        items
    }
}
