use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::annotations::Annotation;

/// Draft-board position of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    DST,
}

impl Position {
    pub const ALL: [Position; 5] = [Position::QB, Position::RB, Position::WR, Position::TE, Position::DST];

    /// Normalize a feed position string.
    ///
    /// Whitespace is removed and the value upper-cased. Every defense spelling
    /// (DEF, D/ST, D) becomes DST. Anything else unrecognized falls back to WR.
    pub fn normalize(raw: &str) -> Self {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.to_uppercase().as_str() {
            "QB" => Position::QB,
            "RB" => Position::RB,
            "WR" => Position::WR,
            "TE" => Position::TE,
            "DST" | "DEF" | "D/ST" | "D" => Position::DST,
            _ => Position::WR,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::DST => "DST",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a ranking-snapshot feed, exactly as it arrived.
///
/// Historical feeds disagree on field names, casing and types, so every field
/// is kept as an untyped JSON value and all coercion happens in
/// [`crate::normalize`]. A JSON `null` is indistinguishable from an absent field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Value>,

    /// Team aliases, checked in declaration order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Value>,
    #[serde(default, rename = "teamAbbrev", skip_serializing_if = "Option::is_none")]
    pub team_abbrev_camel: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_abbrev: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tm: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub franchise: Option<Value>,

    /// Bye-week aliases, checked in declaration order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bye: Option<Value>,
    #[serde(default, rename = "byeWeek", skip_serializing_if = "Option::is_none")]
    pub bye_week_camel: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bye_week: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byeweek: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Value>,
}

impl RawRecord {
    /// Convert one feed element. Returns `None` for anything that isn't a JSON object.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn team_candidates(&self) -> [Option<&Value>; 5] {
        [
            self.team.as_ref(),
            self.team_abbrev_camel.as_ref(),
            self.team_abbrev.as_ref(),
            self.tm.as_ref(),
            self.franchise.as_ref(),
        ]
    }

    pub fn bye_candidates(&self) -> [Option<&Value>; 4] {
        [
            self.bye.as_ref(),
            self.bye_week_camel.as_ref(),
            self.bye_week.as_ref(),
            self.byeweek.as_ref(),
        ]
    }
}

/// A feed row after coercion into canonical shape
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// Caller-supplied id, or one derived from name/position/team
    pub id: String,

    /// Rank in its snapshot; NaN when the feed value wasn't numeric
    pub rank: f64,

    /// Display name, untouched
    pub name: String,

    /// Lowercased, suffix-free, punctuation-free name used only for matching
    pub name_canon: String,

    pub position: Position,

    pub bye: Option<i64>,

    /// Upper-cased team abbreviation
    pub team: Option<String>,

    /// `team` or the empty string
    pub team_norm: String,

    pub annotations: Vec<Annotation>,
}

/// A reconciled player as shown on the draft board.
///
/// Players are shared as `Arc<Player>` between the canonical list, the
/// board projection and the roster, and are never mutated after
/// reconciliation.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub id: String,

    /// Current rank; NaN means unranked/unknown
    pub rank: f64,

    pub name: String,

    pub position: Position,

    /// Baseline rank this player matched, `None` if no match
    pub original_rank: Option<f64>,

    /// `rank - original_rank` (positive = fell, negative = rose), measured
    /// against the virtual NR rank for unmatched players
    pub rank_change: Option<f64>,

    pub bye: Option<i64>,

    pub team: Option<String>,

    /// Rank within position, e.g. "RB3"
    pub pos_rank: Option<String>,

    pub annotations: Vec<Annotation>,

    /// True when no baseline match was found
    pub was_unranked: bool,
}

impl Player {
    /// Whether the current snapshot gave this player a usable rank
    pub fn is_ranked(&self) -> bool {
        self.rank.is_finite()
    }

    /// Annotation kinds in display order
    pub fn annotation_kinds(&self) -> Vec<&str> {
        self.annotations.iter().map(|a| a.kind.as_str()).collect()
    }
}

/// One row of an annotation-update feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Value>,
}

impl UpdateRow {
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}
