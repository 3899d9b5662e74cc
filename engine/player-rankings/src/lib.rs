//! Player Rankings - Reconciles draft-board ranking snapshots
//!
//! Takes a baseline and a current snapshot of a player-ranking feed, matches
//! players across the two despite unstable identifiers, and produces the
//! enriched player list the draft board displays (rank movement, "was
//! unranked" flag, merged annotations). Supplementary annotation-only feeds
//! are cross-referenced on demand.
//!
//! Everything in this crate is synchronous and free of I/O. Loading the
//! feed documents is the caller's job.

pub mod annotations;
pub mod board;
pub mod config;
pub mod context;
pub mod error;
pub mod feed;
pub mod keys;
pub mod normalize;
pub mod reconcile;
pub mod resolver;
pub mod roster;
pub mod types;


pub use annotations::{merge_annotations, Annotation, AnnotationDetail, AnnotationIndex, AnnotationKind};
pub use board::{DisplayItem, DraftBoard};
pub use config::RankingsConfig;
pub use context::RankingsContext;
pub use error::{RankingsError, Result};
pub use normalize::normalize;
pub use reconcile::{reconcile, ReconcileStats, Reconciliation};
pub use resolver::{BaselineIndex, BaselineMatch, MatchTier};
pub use roster::{Roster, RosterSpot, SlotId};
pub use types::{NormalizedRecord, Player, Position, RawRecord, UpdateRow};
