//! Hymn store use-case service.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Indexes built from the store equal indexes built from the imported dataset.

use crate::dataset::HymnCollection;
use crate::repo::hymn_repo::{HymnRepository, RepoError, RepoResult};
use crate::search::index::HymnIndex;

/// Use-case wrapper for hymn store operations.
pub struct HymnalService<R: HymnRepository> {
    repo: R,
}

impl<R: HymnRepository> HymnalService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Replaces the stored hymnal with a freshly loaded dataset.
    pub fn import(&self, collection: &HymnCollection) -> RepoResult<()> {
        self.repo
            .import_collection(&collection.hymns, &collection.sections)
    }

    /// Builds a search index over the stored hymnal.
    pub fn load_index(&self) -> RepoResult<HymnIndex> {
        let sections = self.repo.list_sections()?;
        let hymns = self.repo.list_hymns()?;
        Ok(HymnIndex::new(hymns, sections))
    }

    pub fn set_favorited(&self, id: &str, favorited: bool) -> RepoResult<()> {
        self.repo.set_favorited(id, favorited)
    }

    /// Flips the stored favorite flag and returns the new value.
    pub fn toggle_favorite(&self, id: &str) -> RepoResult<bool> {
        let hymn = self
            .repo
            .get_hymn(id)?
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        let favorited = !hymn.favorited;
        self.repo.set_favorited(id, favorited)?;
        Ok(favorited)
    }
}
