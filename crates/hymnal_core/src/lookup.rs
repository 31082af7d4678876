//! Total lookup helpers over normalized hymns and sections.
//!
//! # Responsibility
//! - Answer verse and section questions without ever failing.
//!
//! # Invariants
//! - `get_all_verses` always yields `VERSE_COUNT` entries numbered from 1.
//! - `get_section_info` never returns "not found"; unknown ids get a placeholder.

use crate::model::hymn::{HymnRecord, VerseEntry, VERSE_COUNT};
use crate::model::section::{Section, SectionId};
use std::borrow::Cow;

/// Returns verse `number` (1-based) of `hymn`, or `""`.
pub fn get_verse(hymn: &HymnRecord, number: usize) -> &str {
    hymn.verse(number)
}

/// Returns all verse slots in order, empty ones included.
///
/// Callers skip empty entries when rendering.
pub fn get_all_verses(hymn: &HymnRecord) -> Vec<VerseEntry> {
    (1..=VERSE_COUNT)
        .map(|number| VerseEntry {
            number,
            text: get_verse(hymn, number).to_string(),
        })
        .collect()
}

/// Returns whether any verse carries non-whitespace text.
pub fn has_verses(hymn: &HymnRecord) -> bool {
    (1..=VERSE_COUNT).any(|number| !get_verse(hymn, number).trim().is_empty())
}

/// Resolves `section_id` against `sections`, falling back to a placeholder.
pub fn get_section_info<'a>(sections: &'a [Section], section_id: &SectionId) -> Cow<'a, Section> {
    sections
        .iter()
        .find(|section| &section.id == section_id)
        .map_or_else(|| Cow::Owned(Section::placeholder(section_id)), Cow::Borrowed)
}
