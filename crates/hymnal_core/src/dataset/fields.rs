//! Tolerant field access over raw dataset objects.
//!
//! # Responsibility
//! - Look up hymn fields under every spelling the bundled data uses.
//! - Resolve verse text with a fixed spelling precedence.
//!
//! # Invariants
//! - Verse precedence is `Verse{n}`, `Verse {n}`, `verse{n}`, `verse {n}`;
//!   the first non-empty string wins.
//! - Lookups never fail; absent or mistyped values read as `None`/`""`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};

static VERSE_LIKE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*verse[\s_-]*(\d+)\s*$").expect("valid verse key regex"));

pub(crate) const ID_KEYS: &[&str] = &["id", "Id", "ID", "_id"];
pub(crate) const NUMBER_KEYS: &[&str] = &["Number", "number"];
pub(crate) const TITLE_KEYS: &[&str] = &["Title", "title"];
pub(crate) const SECTION_KEYS: &[&str] = &["Section", "section"];
pub(crate) const REFRAIN_KEYS: &[&str] = &["Refrain", "refrain"];
pub(crate) const FAVORITED_KEYS: &[&str] = &["Favorited", "favorited"];
pub(crate) const DESCRIPTION_KEYS: &[&str] = &["description", "Description"];

/// Returns the spellings checked for verse `number`, in precedence order.
pub fn verse_key_variants(number: usize) -> [String; 4] {
    [
        format!("Verse{number}"),
        format!("Verse {number}"),
        format!("verse{number}"),
        format!("verse {number}"),
    ]
}

/// Resolves verse `number` (1-based) from a raw hymn object.
///
/// Returns `""` when no variant holds a non-empty string.
pub fn resolve_verse(fields: &Map<String, Value>, number: usize) -> String {
    verse_key_variants(number)
        .iter()
        .filter_map(|key| fields.get(key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Returns keys that look like verse fields but will never be read.
///
/// Covers unsupported spellings (`VERSE1`, `verse_2`) and numbers past the
/// last verse slot. Used only for load diagnostics.
pub fn ignored_verse_keys(fields: &Map<String, Value>, verse_count: usize) -> Vec<&str> {
    fields
        .keys()
        .filter(|key| {
            let Some(captures) = VERSE_LIKE_KEY_RE.captures(key) else {
                return false;
            };
            let number = captures[1].parse::<usize>().unwrap_or(0);
            let supported = (1..=verse_count).contains(&number)
                && verse_key_variants(number).iter().any(|variant| variant == *key);
            !supported
        })
        .map(String::as_str)
        .collect()
}

/// Returns the first present, non-null value under any of `keys`.
pub(crate) fn field<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| !value.is_null())
}

/// Reads a textual field; numbers are rendered in decimal form.
pub(crate) fn text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match field(fields, keys)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(number_text(value)),
        _ => None,
    }
}

/// Renders a JSON number; integral floats (`2.0`) print as integers (`2`).
pub(crate) fn number_text(value: &Number) -> String {
    if value.is_f64() {
        if let Some(float) = value.as_f64() {
            if float.fract() == 0.0 && float.abs() < 1e15 {
                return format!("{float:.0}");
            }
        }
    }
    value.to_string()
}

/// Reads a positive hymn number from an integer or numeric string.
pub(crate) fn positive_number(fields: &Map<String, Value>, keys: &[&str]) -> Option<u32> {
    let number = match field(fields, keys)? {
        Value::Number(value) => value.as_u64()?,
        Value::String(value) => value.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(number).ok().filter(|number| *number > 0)
}

/// Reads a 0/1-style flag; `true`, non-zero numbers and `"1"`/`"true"` are set.
pub(crate) fn flag(fields: &Map<String, Value>, keys: &[&str]) -> bool {
    match field(fields, keys) {
        Some(Value::Bool(value)) => *value,
        Some(Value::Number(value)) => value.as_f64().is_some_and(|number| number != 0.0),
        Some(Value::String(value)) => matches!(value.trim(), "1" | "true"),
        _ => false,
    }
}
