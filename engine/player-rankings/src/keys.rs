//! Name canonicalization and key derivation
//!
//! Two different name normalizations live here on purpose:
//! [`canon_name`] feeds the snapshot-to-snapshot resolver, while
//! [`lookup_name`] feeds the annotation-update cross reference. They produce
//! different keys for the same input (e.g. suffixes) and must not be unified
//! without re-checking both match paths.

/// Generational suffixes dropped from names before matching
const NAME_SUFFIXES: [&str; 6] = ["jr", "sr", "ii", "iii", "iv", "v"];

/// Lowercase, collapse every run of non-`[a-z0-9]` characters into one `-`,
/// and strip leading/trailing hyphens.
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_hyphen = false;

    for c in s.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Derive a deterministic player id from name, position and team.
///
/// The same `(name, position, team)` always yields the same id, e.g.
/// `("Bob Smith", "RB", Some("NE"))` becomes `bob-smith_rb_ne`. Empty parts are
/// left out rather than producing doubled separators.
pub fn make_id(name: &str, position: &str, team: Option<&str>) -> String {
    let parts = [
        slugify(name),
        position.trim().to_lowercase(),
        team.map(str::to_lowercase).unwrap_or_default(),
    ];

    parts.into_iter().filter(|part| !part.is_empty()).collect::<Vec<_>>().join("_")
}

/// Canonical name used by the baseline resolver.
///
/// Lowercases, removes suffix words (jr, sr, ii, iii, iv, v), turns every
/// other character outside `[a-z0-9 ]` into a space and collapses whitespace.
/// A "word" here is a maximal run of ASCII alphanumerics or `_`, so `"Jr."`
/// loses its suffix but `"Junior"` does not.
pub fn canon_name(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut without_suffixes = String::with_capacity(lower.len());
    let mut word = String::new();

    for c in lower.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            word.push(c);
        } else {
            flush_word(&mut without_suffixes, &mut word);
            without_suffixes.push(c);
        }
    }
    flush_word(&mut without_suffixes, &mut word);

    let spaced: String = without_suffixes
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' ' { c } else { ' ' })
        .collect();

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn flush_word(out: &mut String, word: &mut String) {
    if !NAME_SUFFIXES.contains(&word.as_str()) {
        out.push_str(word);
    }
    word.clear();
}

/// Resolver key combining canonical name and normalized position
pub fn name_position_key(name_canon: &str, position: &str) -> String {
    format!("{name_canon}|{position}")
}

/// Strict name normalization for annotation lookups: lowercase, keep only
/// ASCII letters and digits. No suffix handling.
pub fn lookup_name(name: &str) -> String {
    name.to_lowercase().chars().filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit()).collect()
}

/// Composite key `name|position|team` for annotation-update rows.
///
/// Position and team are only lowercased; a missing or empty team becomes
/// the empty segment, which is also how the team-less fallback key is formed.
pub fn composite_key(name: &str, position: &str, team: Option<&str>) -> String {
    let team = team.map(str::to_lowercase).unwrap_or_default();
    format!("{}|{}|{}", lookup_name(name), position.to_lowercase(), team)
}
