//! Stateless hymn filtering.
//!
//! # Responsibility
//! - Implement section and case-insensitive substring filtering.
//! - Share one field list between on-the-fly and precomputed matching.
//!
//! # Invariants
//! - An empty query applies no text filter; a `None` section applies no
//!   section filter.
//! - Queries are lower-cased but not trimmed.

use crate::lookup::get_section_info;
use crate::model::hymn::HymnRecord;
use crate::model::section::{Section, SectionId};
use log::debug;
use std::borrow::Cow;
use std::iter;

/// Section and text criteria applied together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HymnFilter {
    pub section: Option<SectionId>,
    pub query: String,
}

impl HymnFilter {
    /// Filter that keeps every hymn.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_section(mut self, section: impl Into<SectionId>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Returns whether neither criterion is set.
    pub fn is_unfiltered(&self) -> bool {
        self.section.is_none() && self.query.is_empty()
    }
}

/// Filters `hymns` by section and free-text `query`.
///
/// Text matching checks, in order, the number, title, refrain, each verse and
/// the resolved section title, stopping at the first hit.
pub fn filter_hymns<'a>(
    hymns: &'a [HymnRecord],
    sections: &[Section],
    active_section: Option<&SectionId>,
    query: &str,
) -> Vec<&'a HymnRecord> {
    let needle = normalize_query(query);
    let results = hymns
        .iter()
        .filter(|hymn| in_section(hymn, active_section))
        .filter(|hymn| match needle.as_deref() {
            None => true,
            Some(needle) => searchable_fields(hymn, sections)
                .any(|field| field.to_lowercase().contains(needle)),
        })
        .collect::<Vec<_>>();

    debug!(
        "event=hymn_filter module=search status=ok mode=scan total={} hits={} section_filter={} query_chars={}",
        hymns.len(),
        results.len(),
        active_section.is_some(),
        query.chars().count()
    );
    results
}

/// Returns whether the hymn number text contains `query` verbatim.
///
/// Drives number highlighting in list rows.
pub fn number_matches(hymn: &HymnRecord, query: &str) -> bool {
    !query.is_empty() && hymn.number.to_string().contains(query)
}

/// Result count plus a display message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSummary {
    pub count: usize,
    pub message: String,
}

impl SearchSummary {
    pub fn new(count: usize, query: &str) -> Self {
        let noun = if count == 1 { "hymn" } else { "hymns" };
        let message = if query.is_empty() {
            format!("{count} {noun}")
        } else {
            format!("{count} {noun} found for \"{query}\"")
        };
        Self { count, message }
    }
}

/// Lower-cased needle, or `None` when no text filter applies.
pub(crate) fn normalize_query(query: &str) -> Option<String> {
    (!query.is_empty()).then(|| query.to_lowercase())
}

pub(crate) fn in_section(hymn: &HymnRecord, active_section: Option<&SectionId>) -> bool {
    active_section.map_or(true, |section| &hymn.section == section)
}

/// Lower-cased searchable text of one hymn, built once per load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchKey {
    fields: Vec<String>,
}

impl SearchKey {
    pub(crate) fn build(hymn: &HymnRecord, sections: &[Section]) -> Self {
        Self {
            fields: searchable_fields(hymn, sections)
                .map(|field| field.to_lowercase())
                .collect(),
        }
    }

    /// `needle` must already be lower-cased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.fields.iter().any(|field| field.contains(needle))
    }
}

fn searchable_fields<'a>(
    hymn: &'a HymnRecord,
    sections: &'a [Section],
) -> impl Iterator<Item = Cow<'a, str>> + 'a {
    iter::once(Cow::Owned(hymn.number.to_string()))
        .chain(iter::once(Cow::Borrowed(hymn.title.as_str())))
        .chain(hymn.refrain.as_deref().map(Cow::Borrowed))
        .chain(
            hymn.verses
                .iter()
                .filter(|verse| !verse.is_empty())
                .map(|verse| Cow::Borrowed(verse.as_str())),
        )
        .chain(iter::once_with(move || {
            match get_section_info(sections, &hymn.section) {
                Cow::Borrowed(section) => Cow::Borrowed(section.title.as_str()),
                Cow::Owned(section) => Cow::Owned(section.title),
            }
        }))
}
