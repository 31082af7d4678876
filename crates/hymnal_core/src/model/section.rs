//! Section model.
//!
//! # Responsibility
//! - Group hymns under a display title and description.
//! - Synthesize placeholder sections for ids missing from the section list.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Identifier shared by `Section::id` and `HymnRecord::section`.
///
/// Datasets store section ids either as JSON numbers or strings; both
/// normalize to the same textual form, so `2` and `"2"` address one section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for SectionId {
    /// Section assigned to hymns whose record names none.
    fn default() -> Self {
        Self("0".to_string())
    }
}

impl Display for SectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SectionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u32> for SectionId {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for SectionId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

/// Named grouping of hymns, e.g. "Opening Hymns".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub description: String,
}

impl Section {
    pub fn new(id: impl Into<SectionId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
        }
    }

    /// Builds the stand-in returned when `id` has no entry in the section list.
    pub fn placeholder(id: &SectionId) -> Self {
        Self {
            id: id.clone(),
            title: format!("Section {id}"),
            description: format!("Hymns from section {id}"),
        }
    }
}
