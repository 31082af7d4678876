//! Precomputed in-memory hymn index.
//!
//! # Responsibility
//! - Own one loaded collection and its sections, injected by the caller.
//! - Answer list, section and text queries without re-lowering text per call.
//!
//! # Invariants
//! - `filter` returns exactly what `filter_hymns` returns for the same input.
//! - Search keys are built once at construction; only `favorited` is mutable
//!   afterwards and it is not searchable.

use crate::dataset::HymnCollection;
use crate::lookup::get_section_info;
use crate::model::hymn::HymnRecord;
use crate::model::section::{Section, SectionId};
use crate::search::filter::{in_section, normalize_query, HymnFilter, SearchKey};
use log::debug;
use std::borrow::Cow;
use std::collections::HashMap;

/// Loaded hymnal with per-hymn search keys.
#[derive(Debug, Clone)]
pub struct HymnIndex {
    hymns: Vec<HymnRecord>,
    sections: Vec<Section>,
    keys: Vec<SearchKey>,
    positions: HashMap<String, usize>,
}

impl HymnIndex {
    /// Builds an index over `hymns` in their given order.
    ///
    /// When ids repeat, id lookups resolve to the first occurrence.
    pub fn new(hymns: Vec<HymnRecord>, sections: Vec<Section>) -> Self {
        let keys = hymns
            .iter()
            .map(|hymn| SearchKey::build(hymn, &sections))
            .collect();
        let mut positions = HashMap::with_capacity(hymns.len());
        for (position, hymn) in hymns.iter().enumerate() {
            positions.entry(hymn.id.clone()).or_insert(position);
        }

        Self {
            hymns,
            sections,
            keys,
            positions,
        }
    }

    pub fn from_collection(collection: HymnCollection) -> Self {
        Self::new(collection.hymns, collection.sections)
    }

    /// All hymns in dataset order.
    pub fn all(&self) -> &[HymnRecord] {
        &self.hymns
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.hymns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hymns.is_empty()
    }

    /// Resolves a section id; unknown ids yield a placeholder.
    pub fn section_info(&self, section_id: &SectionId) -> Cow<'_, Section> {
        get_section_info(&self.sections, section_id)
    }

    /// Section header for the active filter.
    ///
    /// Unlike `section_info`, this returns `None` for ids missing from the
    /// section list, so no header is shown for placeholder sections.
    pub fn current_section(&self, filter: &HymnFilter) -> Option<&Section> {
        let active = filter.section.as_ref()?;
        self.sections.iter().find(|section| &section.id == active)
    }

    pub fn get(&self, id: &str) -> Option<&HymnRecord> {
        self.positions.get(id).map(|position| &self.hymns[*position])
    }

    /// All hymns printed under `number`, in dataset order.
    pub fn by_number(&self, number: u32) -> Vec<&HymnRecord> {
        self.hymns
            .iter()
            .filter(|hymn| hymn.number == number)
            .collect()
    }

    /// Applies section and text criteria; see `filter_hymns`.
    pub fn filter(&self, filter: &HymnFilter) -> Vec<&HymnRecord> {
        let needle = normalize_query(&filter.query);
        let active_section = filter.section.as_ref();
        let results = self
            .hymns
            .iter()
            .zip(&self.keys)
            .filter(|(hymn, _)| in_section(hymn, active_section))
            .filter(|(_, key)| needle.as_deref().map_or(true, |needle| key.matches(needle)))
            .map(|(hymn, _)| hymn)
            .collect::<Vec<_>>();

        debug!(
            "event=hymn_filter module=search status=ok mode=index total={} hits={} section_filter={} query_chars={}",
            self.hymns.len(),
            results.len(),
            active_section.is_some(),
            filter.query.chars().count()
        );
        results
    }

    /// Hymns currently flagged as favorites, in dataset order.
    pub fn favorites(&self) -> Vec<&HymnRecord> {
        self.hymns.iter().filter(|hymn| hymn.favorited).collect()
    }

    /// Flips the in-memory favorite flag of hymn `id`.
    ///
    /// Returns the new flag, or `None` when no hymn has that id.
    pub fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        let position = *self.positions.get(id)?;
        Some(self.hymns[position].toggle_favorite())
    }
}

impl From<HymnCollection> for HymnIndex {
    fn from(value: HymnCollection) -> Self {
        Self::from_collection(value)
    }
}
