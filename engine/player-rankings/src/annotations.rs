//! Player annotations: the tagged notes attached to ranked players, the
//! kind-keyed merge used during reconciliation, and the cross-reference
//! index over annotation-only update feeds.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::keys::composite_key;
use crate::normalize::value_text;
use crate::types::{Player, UpdateRow};

/// A free-form note on a player.
///
/// `kind` identifies the annotation (and is its merge key); every other field
/// from the feed is kept verbatim in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Annotation {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), fields: Map::new() }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Build from a feed object, keeping every field. Requires a string `kind`.
    pub fn from_object(object: &Map<String, Value>) -> Option<Self> {
        let kind = object.get("kind")?.as_str()?.to_string();
        let mut fields = object.clone();
        fields.remove("kind");
        Some(Self { kind, fields })
    }

    /// Merge key: the trimmed kind
    pub fn key(&self) -> &str {
        self.kind.trim()
    }

    /// An annotation with a blank kind carries nothing renderable
    pub fn is_renderable(&self) -> bool {
        !self.key().is_empty()
    }

    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn known_kind(&self) -> AnnotationKind {
        AnnotationKind::from(self.key())
    }

    /// Typed view over the kind-specific fields
    pub fn detail(&self) -> AnnotationDetail<'_> {
        match self.known_kind() {
            AnnotationKind::Injury => AnnotationDetail::Injury {
                part: self.field_str("part"),
                status: self.field_str("status"),
            },
            AnnotationKind::Oline => AnnotationDetail::Oline { quality: self.field_str("quality") },
            AnnotationKind::Contract => AnnotationDetail::Contract { state: self.field_str("state") },
            AnnotationKind::Suspension => AnnotationDetail::Suspension {
                games: self.fields.get("games").and_then(Value::as_u64),
            },
            AnnotationKind::DepthChart => {
                AnnotationDetail::DepthChart { who_left: self.field_str("whoLeft") }
            }
            AnnotationKind::Film => AnnotationDetail::Film {
                state: self.field_str("state"),
                tag: self.field_str("tag"),
                grade: self.field_str("grade"),
            },
            AnnotationKind::Other(_) => AnnotationDetail::Other(self.key()),
            tag => AnnotationDetail::Tag(tag),
        }
    }
}

/// Annotation kinds the draft board knows how to render
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    Injury,
    Oline,
    Contract,
    Suspension,
    DepthChart,
    Film,
    Flag,
    Frag,
    Swing,
    Safe,
    AcidReflux,
    PostHype,
    Other(String),
}

impl AnnotationKind {
    pub fn as_str(&self) -> &str {
        match self {
            AnnotationKind::Injury => "injury",
            AnnotationKind::Oline => "oline",
            AnnotationKind::Contract => "contract",
            AnnotationKind::Suspension => "suspension",
            AnnotationKind::DepthChart => "depthchart",
            AnnotationKind::Film => "film",
            AnnotationKind::Flag => "flag",
            AnnotationKind::Frag => "frag",
            AnnotationKind::Swing => "swing",
            AnnotationKind::Safe => "safe",
            AnnotationKind::AcidReflux => "acid_reflux",
            AnnotationKind::PostHype => "post_hype",
            AnnotationKind::Other(kind) => kind,
        }
    }
}

impl From<&str> for AnnotationKind {
    fn from(kind: &str) -> Self {
        match kind {
            "injury" => AnnotationKind::Injury,
            "oline" => AnnotationKind::Oline,
            "contract" => AnnotationKind::Contract,
            "suspension" => AnnotationKind::Suspension,
            "depthchart" => AnnotationKind::DepthChart,
            "film" => AnnotationKind::Film,
            "flag" => AnnotationKind::Flag,
            "frag" => AnnotationKind::Frag,
            "swing" => AnnotationKind::Swing,
            "safe" => AnnotationKind::Safe,
            "acid_reflux" => AnnotationKind::AcidReflux,
            "post_hype" => AnnotationKind::PostHype,
            other => AnnotationKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific fields of an annotation, borrowed from the annotation
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationDetail<'a> {
    Injury { part: Option<&'a str>, status: Option<&'a str> },
    Oline { quality: Option<&'a str> },
    Contract { state: Option<&'a str> },
    Suspension { games: Option<u64> },
    DepthChart { who_left: Option<&'a str> },
    Film { state: Option<&'a str>, tag: Option<&'a str>, grade: Option<&'a str> },
    /// Field-less marker kinds (flag, frag, swing, safe, acid_reflux, post_hype)
    Tag(AnnotationKind),
    Other(&'a str),
}

/// Merge baseline and current annotations, de-duplicated by kind.
///
/// When only one side has annotations it is returned as-is. Otherwise
/// baseline entries are inserted first and current entries overwrite them on
/// a kind collision; the result keeps the order in which each kind was first
/// seen. Blank kinds are skipped.
pub fn merge_annotations(base: &[Annotation], current: &[Annotation]) -> Vec<Annotation> {
    if !base.is_empty() && current.is_empty() {
        return base.to_vec();
    }
    if !current.is_empty() && base.is_empty() {
        return current.to_vec();
    }

    let mut order: Vec<&str> = Vec::new();
    let mut by_kind: HashMap<&str, &Annotation> = HashMap::new();

    for annotation in base.iter().chain(current) {
        let key = annotation.key();
        if key.is_empty() {
            continue;
        }
        if by_kind.insert(key, annotation).is_none() {
            order.push(key);
        }
    }

    order.into_iter().filter_map(|key| by_kind.get(key).map(|a| (*a).clone())).collect()
}

/// Cross-reference from annotation-update feeds to reconciled players.
///
/// Every player is reachable under two composite keys: with its team and
/// without. Update rows that resolve to a player contribute their
/// annotations to that player's external list; rows that don't resolve are
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct AnnotationIndex {
    /// Composite key -> player id
    player_keys: HashMap<String, String>,

    /// Player id -> annotations gathered from update feeds, in feed order
    external: HashMap<String, Vec<Annotation>>,

    /// Update rows that matched no player
    unmatched_rows: usize,
}

impl AnnotationIndex {
    pub fn build<'a, I>(players: I, update_feeds: &[Vec<UpdateRow>]) -> Self
    where
        I: IntoIterator<Item = &'a Player>,
    {
        let mut index = Self::default();

        for player in players {
            let position = player.position.as_str();
            index
                .player_keys
                .insert(composite_key(&player.name, position, player.team.as_deref()), player.id.clone());
            index.player_keys.insert(composite_key(&player.name, position, None), player.id.clone());
        }

        for row in update_feeds.iter().flatten() {
            index.apply_update(row);
        }

        debug!(
            "Annotation index: {} player keys, {} players with external annotations, {} unmatched update rows",
            index.player_keys.len(),
            index.external.len(),
            index.unmatched_rows
        );

        index
    }

    fn apply_update(&mut self, row: &UpdateRow) {
        let name = row.name.as_ref().and_then(value_text).unwrap_or_default();
        let position = row.position.as_ref().and_then(value_text).unwrap_or_default();
        let team = row.team.as_ref().and_then(value_text);

        let Some(player_id) = self.player_keys.get(&composite_key(&name, &position, team.as_deref())) else {
            self.unmatched_rows += 1;
            debug!("No player for annotation update row: {} ({})", name, position);
            return;
        };

        let Some(Value::Array(items)) = row.annotations.as_ref() else {
            return;
        };
        if items.is_empty() {
            return;
        }

        let annotations = items.iter().filter_map(|item| item.as_object().and_then(Annotation::from_object));
        self.external.entry(player_id.clone()).or_default().extend(annotations);
    }

    /// Player id an update row with this name/position/team would attach to
    pub fn resolve(&self, name: &str, position: &str, team: Option<&str>) -> Option<&str> {
        self.player_keys.get(&composite_key(name, position, team)).map(String::as_str)
    }

    /// Annotations gathered from update feeds for one player
    pub fn external_for(&self, player_id: &str) -> &[Annotation] {
        self.external.get(player_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// A player's own annotations followed by its external ones, keeping
    /// only entries with a non-blank kind. Duplicates are not collapsed.
    pub fn annotations_for(&self, player_id: &str, own: &[Annotation]) -> Vec<Annotation> {
        own.iter().chain(self.external_for(player_id)).filter(|a| a.is_renderable()).cloned().collect()
    }

    pub fn unmatched_rows(&self) -> usize {
        self.unmatched_rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;
    use serde_json::json;

    fn player(id: &str, name: &str, position: Position, team: Option<&str>) -> Player {
        Player {
            id: id.to_string(),
            rank: 1.0,
            name: name.to_string(),
            position,
            original_rank: Some(1.0),
            rank_change: Some(0.0),
            bye: None,
            team: team.map(str::to_string),
            pos_rank: None,
            annotations: Vec::new(),
            was_unranked: false,
        }
    }

    fn update(value: Value) -> UpdateRow {
        UpdateRow::from_value(&value).unwrap()
    }

    fn kinds(annotations: &[Annotation]) -> Vec<&str> {
        annotations.iter().map(|a| a.kind.as_str()).collect()
    }

    #[test]
    fn test_merge_one_side_returned_unchanged() {
        let base = vec![Annotation::new("injury"), Annotation::new("injury").with_field("part", "knee")];
        assert_eq!(merge_annotations(&base, &[]), base);
        assert_eq!(merge_annotations(&[], &base), base);
        assert!(merge_annotations(&[], &[]).is_empty());
    }

    #[test]
    fn test_merge_current_overwrites_baseline_kind() {
        let base = vec![Annotation::new("injury").with_field("part", "ankle"), Annotation::new("oline")];
        let current = vec![Annotation::new("film"), Annotation::new("injury").with_field("part", "knee")];

        let merged = merge_annotations(&base, &current);

        assert_eq!(kinds(&merged), vec!["injury", "oline", "film"]);
        assert_eq!(merged[0].field_str("part"), Some("knee"));
    }

    #[test]
    fn test_merge_trims_kind_keys_and_skips_blank() {
        let base = vec![Annotation::new(" safe "), Annotation::new("  ")];
        let current = vec![Annotation::new("safe").with_field("note", "latest")];

        let merged = merge_annotations(&base, &current);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].field_str("note"), Some("latest"));
    }

    #[test]
    fn test_detail_views() {
        let injury = Annotation::new("injury").with_field("part", "hamstring").with_field("status", "Q");
        assert_eq!(injury.detail(), AnnotationDetail::Injury { part: Some("hamstring"), status: Some("Q") });

        let suspension = Annotation::new("suspension").with_field("games", 6);
        assert_eq!(suspension.detail(), AnnotationDetail::Suspension { games: Some(6) });

        let depth = Annotation::new("depthchart").with_field("whoLeft", "Derrick Henry");
        assert_eq!(depth.detail(), AnnotationDetail::DepthChart { who_left: Some("Derrick Henry") });

        assert_eq!(Annotation::new("post_hype").detail(), AnnotationDetail::Tag(AnnotationKind::PostHype));
        assert_eq!(Annotation::new("vibes").detail(), AnnotationDetail::Other("vibes"));
    }

    #[test]
    fn test_kind_names_round_trip() {
        for name in ["injury", "depthchart", "acid_reflux", "post_hype", "flag", "vibes"] {
            assert_eq!(AnnotationKind::from(name).to_string(), name);
        }
        assert_eq!(Annotation::new(" film ").known_kind(), AnnotationKind::Film);
        assert_eq!(AnnotationKind::from("Injury"), AnnotationKind::Other("Injury".to_string()));
    }

    #[test]
    fn test_annotation_serializes_flat() {
        let annotation = Annotation::new("contract").with_field("state", "holding-out");
        let value = serde_json::to_value(&annotation).unwrap();
        assert_eq!(value, json!({ "kind": "contract", "state": "holding-out" }));

        let back: Annotation = serde_json::from_value(value).unwrap();
        assert_eq!(back, annotation);
    }

    #[test]
    fn test_update_matches_with_team() {
        let players = vec![player("bob", "Bob Smith", Position::RB, Some("NE"))];
        let feeds = vec![vec![update(json!({
            "name": "Bob Smith",
            "position": "RB",
            "team": "ne",
            "annotations": [{ "kind": "oline", "quality": "improved" }],
        }))]];

        let index = AnnotationIndex::build(&players, &feeds);

        assert_eq!(kinds(index.external_for("bob")), vec!["oline"]);
        assert_eq!(index.unmatched_rows(), 0);
    }

    #[test]
    fn test_update_falls_back_to_teamless_key() {
        let players = vec![player("bob", "Bob Smith", Position::RB, Some("NE"))];
        let feeds = vec![vec![update(json!({
            "name": "Bob Smith",
            "position": "RB",
            "team": null,
            "annotations": [{ "kind": "injury", "part": "ankle" }],
        }))]];

        let index = AnnotationIndex::build(&players, &feeds);

        let external = index.external_for("bob");
        assert_eq!(external.len(), 1);
        assert_eq!(external[0].field_str("part"), Some("ankle"));
    }

    #[test]
    fn test_update_with_wrong_team_is_dropped() {
        let players = vec![player("bob", "Bob Smith", Position::RB, Some("NE"))];
        let feeds = vec![vec![update(json!({
            "name": "Bob Smith",
            "position": "RB",
            "team": "DAL",
            "annotations": ["flag"],
        }))]];

        let index = AnnotationIndex::build(&players, &feeds);

        assert!(index.external_for("bob").is_empty());
        assert_eq!(index.unmatched_rows(), 1);
    }

    #[test]
    fn test_update_name_normalization_ignores_punctuation() {
        let players = vec![player("jmc", "Ja'Marr Chase", Position::WR, Some("CIN"))];
        let index = AnnotationIndex::build(&players, &[]);

        assert_eq!(index.resolve("JaMarr Chase", "wr", Some("Cin")), Some("jmc"));
        assert_eq!(index.resolve("Ja Marr Chase", "WR", None), Some("jmc"));
        assert_eq!(index.resolve("Ja'Marr Chase", "RB", None), None);
    }

    #[test]
    fn test_update_rows_accumulate_across_feeds() {
        let players = vec![player("bob", "Bob Smith", Position::RB, None)];
        let feeds = vec![
            vec![update(json!({ "name": "Bob Smith", "position": "RB", "annotations": [{ "kind": "injury" }] }))],
            vec![
                update(json!({ "name": "Bob Smith", "position": "RB", "annotations": [] })),
                update(json!({ "name": "Bob Smith", "position": "RB", "annotations": [{ "kind": "injury" }, { "kind": "swing" }] })),
            ],
        ];

        let index = AnnotationIndex::build(&players, &feeds);

        assert_eq!(kinds(index.external_for("bob")), vec!["injury", "injury", "swing"]);
    }

    #[test]
    fn test_annotations_for_concatenates_and_filters() {
        let players = vec![player("bob", "Bob Smith", Position::RB, None)];
        let feeds = vec![vec![update(json!({
            "name": "Bob Smith",
            "position": "RB",
            "annotations": [{ "kind": "injury" }, { "kind": "   " }, { "part": "knee" }, "frag"],
        }))]];
        let index = AnnotationIndex::build(&players, &feeds);
        let own = vec![Annotation::new("injury").with_field("part", "ankle")];

        let all = index.annotations_for("bob", &own);

        assert_eq!(kinds(&all), vec!["injury", "injury"]);
        assert_eq!(all[0].field_str("part"), Some("ankle"));
    }

    #[test]
    fn test_later_player_wins_shared_key() {
        let players = vec![
            player("first", "Mike Williams", Position::WR, Some("NYJ")),
            player("second", "Mike Williams", Position::WR, Some("PIT")),
        ];
        let index = AnnotationIndex::build(&players, &[]);

        assert_eq!(index.resolve("Mike Williams", "WR", Some("NYJ")), Some("first"));
        assert_eq!(index.resolve("Mike Williams", "WR", None), Some("second"));
    }
}
