//! Row normalizer: raw feed record -> canonical record
//!
//! Owns all field-aliasing and type-coercion policy. Nothing here fails;
//! malformed values degrade to defaults.

use serde_json::Value;

use crate::annotations::Annotation;
use crate::keys::{canon_name, make_id};
use crate::types::{NormalizedRecord, Position, RawRecord};

/// Normalize one raw feed record
pub fn normalize(raw: &RawRecord) -> NormalizedRecord {
    let name = raw.name.as_ref().and_then(value_text).unwrap_or_default();
    let raw_position = raw.position.as_ref().and_then(value_text).unwrap_or_default();
    let team = pick_team(raw);

    let id = raw
        .id
        .as_ref()
        .and_then(value_text)
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| make_id(&name, &raw_position, team.as_deref()));

    NormalizedRecord {
        id,
        rank: coerce_rank(raw.rank.as_ref()),
        name_canon: canon_name(&name),
        name,
        position: Position::normalize(&raw_position),
        bye: pick_bye(raw),
        team_norm: team.clone().unwrap_or_default(),
        team,
        annotations: coerce_annotations(raw.annotations.as_ref()),
    }
}

/// Text form of a scalar feed value. Strings as-is, numbers via their JSON
/// text; anything else counts as absent.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Only a JSON number is a rank. Anything else is NaN and stays NaN.
fn coerce_rank(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(f64::NAN)
}

/// First team alias holding a non-blank value, trimmed and upper-cased
fn pick_team(raw: &RawRecord) -> Option<String> {
    raw.team_candidates()
        .into_iter()
        .flatten()
        .filter_map(value_text)
        .map(|team| team.trim().to_uppercase())
        .find(|team| !team.is_empty())
}

/// First bye alias that parses to an integer
fn pick_bye(raw: &RawRecord) -> Option<i64> {
    raw.bye_candidates().into_iter().flatten().find_map(coerce_int)
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

/// Parse an optionally signed run of leading digits, ignoring anything after
/// it: `" 7"` -> 7, `"12th"` -> 12, `"wk"` -> None.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };

    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Coerce a feed `annotations` value.
///
/// Strings become bare `{kind}` annotations; objects with a string `kind`
/// are kept whole with the kind trimmed. Everything else, and anything whose
/// kind ends up blank, is dropped.
pub fn coerce_annotations(value: Option<&Value>) -> Vec<Annotation> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(kind) => Some(Annotation::new(kind.trim())),
            Value::Object(object) => Annotation::from_object(object).map(|mut annotation| {
                annotation.kind = annotation.kind.trim().to_string();
                annotation
            }),
            _ => None,
        })
        .filter(|annotation| !annotation.kind.is_empty())
        .collect()
}
