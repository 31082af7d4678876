//! Core hymnal logic: dataset normalization, lookup and search.
//! This crate is the single source of truth for hymnal invariants.

pub mod dataset;
pub mod db;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use dataset::{
    load_collection, load_dataset, load_dataset_file, load_dataset_str, HymnCollection, LoadError,
    LoadReport, LoadResult,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use lookup::{get_all_verses, get_section_info, get_verse, has_verses};
pub use model::hymn::{HymnId, HymnRecord, VerseEntry, VERSE_COUNT};
pub use model::section::{Section, SectionId};
pub use repo::hymn_repo::{HymnRepository, RepoError, RepoResult, SqliteHymnRepository};
pub use search::filter::{filter_hymns, number_matches, HymnFilter, SearchSummary};
pub use search::index::HymnIndex;
pub use service::hymnal_service::HymnalService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
