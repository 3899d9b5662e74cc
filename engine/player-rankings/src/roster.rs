use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::board::DraftBoard;
use crate::types::{Player, Position};

/// Starting lineup slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SlotId {
    QB,
    WR1,
    WR2,
    WR3,
    RB1,
    RB2,
    TE,
    DST,
}

impl SlotId {
    pub const ALL: [SlotId; 8] =
        [SlotId::QB, SlotId::WR1, SlotId::WR2, SlotId::WR3, SlotId::RB1, SlotId::RB2, SlotId::TE, SlotId::DST];

    /// Slots a player at this position may fill, in fill order
    pub fn targets_for(position: Position) -> &'static [SlotId] {
        match position {
            Position::WR => &[SlotId::WR1, SlotId::WR2, SlotId::WR3],
            Position::RB => &[SlotId::RB1, SlotId::RB2],
            Position::TE => &[SlotId::TE],
            Position::QB => &[SlotId::QB],
            Position::DST => &[SlotId::DST],
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Where a drafted player ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterSpot {
    Slot(SlotId),
    Bench,
}

/// One drafter's roster. Drafting hides the player on the board,
/// releasing shows them again.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    slots: BTreeMap<SlotId, Arc<Player>>,
    bench: Vec<Arc<Player>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft a player into the first free slot for their position, or the
    /// bench when those are full. Unknown ids are ignored.
    pub fn draft_by_id(&mut self, board: &mut DraftBoard, id: &str) -> Option<RosterSpot> {
        if let Some(spot) = self.spot_of(id) {
            return Some(spot);
        }

        let player = Arc::clone(board.get_by_id(id)?);

        let spot = match SlotId::targets_for(player.position).iter().find(|slot| !self.slots.contains_key(*slot)) {
            Some(&slot) => {
                self.slots.insert(slot, Arc::clone(&player));
                RosterSpot::Slot(slot)
            }
            None => {
                self.bench.push(Arc::clone(&player));
                RosterSpot::Bench
            }
        };

        board.hide_by_id(&player.id);
        debug!("Drafted {} ({}) to {:?}", player.name, player.position, spot);
        Some(spot)
    }

    /// Take a player off the roster and show them on the board again
    pub fn release_by_id(&mut self, board: &mut DraftBoard, id: &str) {
        self.bench.retain(|p| p.id != id);
        self.slots.retain(|_, p| p.id != id);
        board.unhide_by_id(id);
    }

    /// Empty the roster and restore the full board
    pub fn reset_all(&mut self, board: &mut DraftBoard) {
        self.slots.clear();
        self.bench.clear();
        board.reset();
    }

    pub fn drafted_count(&self) -> usize {
        self.slots.len() + self.bench.len()
    }

    pub fn slot(&self, slot: SlotId) -> Option<&Arc<Player>> {
        self.slots.get(&slot)
    }

    pub fn bench(&self) -> &[Arc<Player>] {
        &self.bench
    }

    pub fn spot_of(&self, id: &str) -> Option<RosterSpot> {
        if let Some((slot, _)) = self.slots.iter().find(|(_, p)| p.id == id) {
            return Some(RosterSpot::Slot(*slot));
        }
        self.bench.iter().any(|p| p.id == id).then_some(RosterSpot::Bench)
    }
}
