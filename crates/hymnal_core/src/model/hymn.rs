//! Hymn record model.
//!
//! # Responsibility
//! - Hold one normalized hymn: number, title, section, refrain and verses.
//! - Offer small read helpers shared by list and detail views.
//!
//! # Invariants
//! - `verses` always has `VERSE_COUNT` slots; absent verses are empty strings.
//! - `refrain` is `None` rather than `Some("")`.
//! - `favorited` is in-memory UI state; the record never persists it itself.

use crate::model::section::SectionId;
use serde::{Deserialize, Serialize};

/// Number of verse slots every hymn exposes.
pub const VERSE_COUNT: usize = 7;

/// Stable list key for a hymn.
pub type HymnId = String;

/// One numbered verse as handed to rendering code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseEntry {
    /// 1-based verse number.
    pub number: usize,
    /// Verse text; empty when the hymn has no such verse.
    pub text: String,
}

/// Canonical in-memory hymn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HymnRecord {
    pub id: HymnId,
    /// Printed hymn number. Conventionally unique, not enforced.
    pub number: u32,
    pub title: String,
    pub section: SectionId,
    pub refrain: Option<String>,
    pub verses: [String; VERSE_COUNT],
    pub favorited: bool,
}

impl HymnRecord {
    /// Creates a hymn without refrain or verses.
    pub fn new(
        id: impl Into<HymnId>,
        number: u32,
        title: impl Into<String>,
        section: impl Into<SectionId>,
    ) -> Self {
        Self {
            id: id.into(),
            number,
            title: title.into(),
            section: section.into(),
            refrain: None,
            verses: Default::default(),
            favorited: false,
        }
    }

    /// Sets verse `number` (1-based). Out-of-range numbers are ignored.
    pub fn with_verse(mut self, number: usize, text: impl Into<String>) -> Self {
        if let Some(slot) = verse_slot(number) {
            self.verses[slot] = text.into();
        }
        self
    }

    /// Sets the refrain; empty text clears it.
    pub fn with_refrain(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.refrain = if text.is_empty() { None } else { Some(text) };
        self
    }

    /// Returns verse `number` (1-based), or `""` when absent or out of range.
    pub fn verse(&self, number: usize) -> &str {
        verse_slot(number).map_or("", |slot| self.verses[slot].as_str())
    }

    /// First line of the refrain, else first line of verse 1, else empty.
    pub fn preview_line(&self) -> &str {
        let source = match self.refrain.as_deref() {
            Some(refrain) => refrain,
            None => self.verse(1),
        };
        source.lines().next().unwrap_or("")
    }

    /// Flips the in-memory favorite flag and returns the new value.
    pub fn toggle_favorite(&mut self) -> bool {
        self.favorited = !self.favorited;
        self.favorited
    }
}

fn verse_slot(number: usize) -> Option<usize> {
    (1..=VERSE_COUNT).contains(&number).then(|| number - 1)
}
