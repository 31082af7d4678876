//! Bundled hymnal dataset loading.
//!
//! # Responsibility
//! - Parse the static `{ hymns, sections }` dataset into canonical records.
//! - Absorb per-record anomalies; surface only structural failures.
//!
//! # Invariants
//! - Output order equals dataset order.
//! - A record without a positive number or non-empty title is skipped, never fatal.
//! - Missing `sections` reads as an empty list; a non-array `sections` is fatal.
//! - Hymn ids are stable across loads of the same dataset.

pub mod fields;

use crate::model::hymn::{HymnRecord, VERSE_COUNT};
use crate::model::section::{Section, SectionId};
use fields::{
    field, flag, ignored_verse_keys, number_text, positive_number, resolve_verse, text,
    DESCRIPTION_KEYS, FAVORITED_KEYS, ID_KEYS, NUMBER_KEYS, REFRAIN_KEYS, SECTION_KEYS, TITLE_KEYS,
};
use log::{debug, error, info, warn};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

/// Namespace for ids synthesized when a hymn record carries none.
const HYMN_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a7e_4b5d_5c3a_9e1f_0d2b_8a47_c615);

pub type LoadResult<T> = Result<T, LoadError>;

/// Fatal dataset failure. Retrying a bundled resource is pointless.
#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    /// Top-level value is not an object.
    NotAnObject,
    /// Top-level object has no `hymns` field.
    MissingHymns,
    /// A collection field is present but not an array.
    NotASequence { field: &'static str },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read dataset `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "dataset is not valid JSON: {err}"),
            Self::NotAnObject => write!(f, "dataset root must be an object"),
            Self::MissingHymns => write!(f, "dataset has no `hymns` collection"),
            Self::NotASequence { field } => write!(f, "dataset field `{field}` must be an array"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::NotAnObject | Self::MissingHymns | Self::NotASequence { .. } => None,
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Per-load counters, logged once and returned to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub hymns_loaded: usize,
    pub hymns_skipped: usize,
    pub sections_loaded: usize,
    pub sections_skipped: usize,
}

/// Normalized hymns and sections, in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HymnCollection {
    pub hymns: Vec<HymnRecord>,
    pub sections: Vec<Section>,
    pub report: LoadReport,
}

/// Reads and loads a dataset file.
pub fn load_dataset_file(path: impl AsRef<Path>) -> LoadResult<HymnCollection> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| {
        error!(
            "event=dataset_read module=dataset status=error error_code=io_failed error={}",
            source
        );
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    load_dataset_str(&raw)
}

/// Parses and loads a dataset from JSON text.
pub fn load_dataset_str(raw: &str) -> LoadResult<HymnCollection> {
    let value: Value = serde_json::from_str(raw)?;
    load_dataset(&value)
}

/// Loads a parsed `{ hymns, sections? }` dataset value.
pub fn load_dataset(dataset: &Value) -> LoadResult<HymnCollection> {
    let root = dataset.as_object().ok_or(LoadError::NotAnObject)?;
    let hymns = root.get("hymns").ok_or(LoadError::MissingHymns)?;
    load_collection(hymns, root.get("sections"))
}

/// Normalizes raw hymn and section sequences into canonical records.
///
/// `raw_sections` of `None` or JSON `null` reads as an empty section list.
///
/// # Errors
/// - `NotASequence` when `raw_hymns` (or a present `raw_sections`) is not an array.
pub fn load_collection(raw_hymns: &Value, raw_sections: Option<&Value>) -> LoadResult<HymnCollection> {
    let started_at = Instant::now();
    let hymn_values = raw_hymns
        .as_array()
        .ok_or(LoadError::NotASequence { field: "hymns" })?;
    let section_values = match raw_sections {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(values)) => values.as_slice(),
        Some(_) => return Err(LoadError::NotASequence { field: "sections" }),
    };

    let mut report = LoadReport::default();

    let mut sections = Vec::with_capacity(section_values.len());
    for (position, value) in section_values.iter().enumerate() {
        match parse_section(value) {
            Some(section) => sections.push(section),
            None => {
                warn!(
                    "event=section_skipped module=dataset status=skipped position={} reason=missing_id",
                    position
                );
                report.sections_skipped += 1;
            }
        }
    }

    let mut hymns = Vec::with_capacity(hymn_values.len());
    for (position, value) in hymn_values.iter().enumerate() {
        match parse_hymn(position, value) {
            Ok(hymn) => hymns.push(hymn),
            Err(reason) => {
                warn!(
                    "event=hymn_skipped module=dataset status=skipped position={} reason={}",
                    position, reason
                );
                report.hymns_skipped += 1;
            }
        }
    }

    report.hymns_loaded = hymns.len();
    report.sections_loaded = sections.len();
    info!(
        "event=dataset_load module=dataset status=ok duration_ms={} hymns={} hymns_skipped={} sections={} sections_skipped={}",
        started_at.elapsed().as_millis(),
        report.hymns_loaded,
        report.hymns_skipped,
        report.sections_loaded,
        report.sections_skipped
    );

    Ok(HymnCollection {
        hymns,
        sections,
        report,
    })
}

fn parse_section(value: &Value) -> Option<Section> {
    let fields = value.as_object()?;
    let id = section_id(fields, ID_KEYS)?;
    Some(Section {
        id,
        title: text(fields, TITLE_KEYS).unwrap_or_default(),
        description: text(fields, DESCRIPTION_KEYS).unwrap_or_default(),
    })
}

fn parse_hymn(position: usize, value: &Value) -> Result<HymnRecord, &'static str> {
    let fields = value.as_object().ok_or("not_an_object")?;
    let number = positive_number(fields, NUMBER_KEYS).ok_or("missing_number")?;
    let title = text(fields, TITLE_KEYS)
        .filter(|title| !title.trim().is_empty())
        .ok_or("missing_title")?;

    let ignored = ignored_verse_keys(fields, VERSE_COUNT);
    if !ignored.is_empty() {
        debug!(
            "event=verse_keys_ignored module=dataset status=ok position={} count={}",
            position,
            ignored.len()
        );
    }

    let id = text(fields, ID_KEYS)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| synthesize_hymn_id(position, number, &title));
    let section = section_id(fields, SECTION_KEYS).unwrap_or_default();
    let verses = std::array::from_fn(|slot| resolve_verse(fields, slot + 1));

    Ok(HymnRecord {
        id,
        number,
        title,
        section,
        refrain: text(fields, REFRAIN_KEYS).filter(|refrain| !refrain.is_empty()),
        verses,
        favorited: flag(fields, FAVORITED_KEYS),
    })
}

fn section_id(fields: &Map<String, Value>, keys: &[&str]) -> Option<SectionId> {
    match field(fields, keys)? {
        Value::String(value) if !value.is_empty() => Some(SectionId::new(value.clone())),
        Value::Number(value) => Some(SectionId::new(number_text(value))),
        _ => None,
    }
}

fn synthesize_hymn_id(position: usize, number: u32, title: &str) -> String {
    let name = format!("{position}:{number}:{title}");
    Uuid::new_v5(&HYMN_ID_NAMESPACE, name.as_bytes()).to_string()
}

#[cfg(test)]
mod tests {
    use super::synthesize_hymn_id;

    #[test]
    fn synthesized_ids_are_deterministic() {
        assert_eq!(
            synthesize_hymn_id(0, 23, "Amazing Grace"),
            synthesize_hymn_id(0, 23, "Amazing Grace")
        );
        assert_ne!(
            synthesize_hymn_id(0, 23, "Amazing Grace"),
            synthesize_hymn_id(1, 23, "Amazing Grace")
        );
    }
}
