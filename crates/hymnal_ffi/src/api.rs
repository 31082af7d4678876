//! FFI use-case API for the mobile hymnal screens.
//!
//! # Responsibility
//! - Expose hymn list, search and detail calls through FRB.
//! - Own the process-wide loaded index on behalf of the UI.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures come back as envelope messages, never as errors.
//! - Calls made before `hymnal_load` see an empty hymnal.

use hymnal_core::{
    core_version as core_version_inner, get_all_verses, init_logging as init_logging_inner,
    load_dataset_str, number_matches, HymnFilter, HymnIndex, HymnRecord, SearchSummary, SectionId,
};
use log::{info, warn};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

static LOADED_INDEX: RwLock<Option<HymnIndex>> = RwLock::new(None);

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Outcome of installing a bundled dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResponse {
    pub ok: bool,
    pub hymns: u32,
    pub sections: u32,
    /// Records dropped because they had no usable number or title.
    pub skipped: u32,
    pub message: String,
}

/// One row of the hymn list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HymnListItem {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub section_title: String,
    /// First line of refrain or verse 1.
    pub preview: String,
    /// Whether the number itself matched the query (for highlighting).
    pub number_match: bool,
}

/// Search response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub items: Vec<HymnListItem>,
    /// Header for the active section; absent for unknown sections or while searching.
    pub section_header: Option<SectionItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionItem {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseItem {
    pub number: u32,
    pub text: String,
}

/// Hymn detail screen payload. Only non-empty verses are included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HymnDetail {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub section: SectionItem,
    pub refrain: Option<String>,
    pub verses: Vec<VerseItem>,
    pub favorited: bool,
}

/// Parses a bundled dataset and installs it as the active hymnal.
///
/// # FFI contract
/// - Sync call; CPU-bound parse of the whole dataset.
/// - On failure the previously loaded hymnal stays active.
#[flutter_rust_bridge::frb(sync)]
pub fn hymnal_load(dataset_json: String) -> LoadResponse {
    match load_dataset_str(&dataset_json) {
        Ok(collection) => {
            let report = collection.report;
            *write_index() = Some(HymnIndex::from_collection(collection));
            info!(
                "event=ffi_load module=ffi status=ok hymns={} sections={}",
                report.hymns_loaded, report.sections_loaded
            );
            LoadResponse {
                ok: true,
                hymns: to_u32(report.hymns_loaded),
                sections: to_u32(report.sections_loaded),
                skipped: to_u32(report.hymns_skipped),
                message: format!("Loaded {} hymns.", report.hymns_loaded),
            }
        }
        Err(err) => {
            warn!("event=ffi_load module=ffi status=error error={}", err);
            LoadResponse {
                ok: false,
                hymns: 0,
                sections: 0,
                skipped: 0,
                message: format!("hymnal_load failed: {err}"),
            }
        }
    }
}

/// Filters the active hymnal by optional section and free-text query.
///
/// # FFI contract
/// - Sync call; safe to invoke on every keystroke.
/// - Never panics; empty hymnal yields an empty item list.
#[flutter_rust_bridge::frb(sync)]
pub fn hymnal_search(section_id: Option<String>, query: String) -> SearchResponse {
    let guard = read_index();
    let filter = HymnFilter {
        section: section_id.map(SectionId::from),
        query,
    };

    let Some(index) = guard.as_ref() else {
        return SearchResponse {
            items: Vec::new(),
            section_header: None,
            message: "No hymnal loaded.".to_string(),
        };
    };

    let items = index
        .filter(&filter)
        .into_iter()
        .map(|hymn| to_list_item(index, hymn, &filter.query))
        .collect::<Vec<_>>();
    let section_header = if filter.query.is_empty() {
        index.current_section(&filter).map(|section| SectionItem {
            id: section.id.to_string(),
            title: section.title.clone(),
            description: section.description.clone(),
        })
    } else {
        None
    };

    SearchResponse {
        message: SearchSummary::new(items.len(), &filter.query).message,
        items,
        section_header,
    }
}

/// Lists sections of the active hymnal in dataset order.
#[flutter_rust_bridge::frb(sync)]
pub fn hymnal_sections() -> Vec<SectionItem> {
    read_index()
        .as_ref()
        .map(|index| {
            index
                .sections()
                .iter()
                .map(|section| SectionItem {
                    id: section.id.to_string(),
                    title: section.title.clone(),
                    description: section.description.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Returns detail for hymn `id`, or `None` when unknown.
#[flutter_rust_bridge::frb(sync)]
pub fn hymnal_detail(id: String) -> Option<HymnDetail> {
    let guard = read_index();
    let index = guard.as_ref()?;
    let hymn = index.get(&id)?;
    let section = index.section_info(&hymn.section);

    Some(HymnDetail {
        id: hymn.id.clone(),
        number: hymn.number,
        title: hymn.title.clone(),
        section: SectionItem {
            id: section.id.to_string(),
            title: section.title.clone(),
            description: section.description.clone(),
        },
        refrain: hymn.refrain.clone(),
        verses: get_all_verses(hymn)
            .into_iter()
            .filter(|verse| !verse.text.trim().is_empty())
            .map(|verse| VerseItem {
                number: to_u32(verse.number),
                text: verse.text,
            })
            .collect(),
        favorited: hymn.favorited,
    })
}

/// Flips the in-memory favorite flag of hymn `id`.
///
/// Returns the new flag, or `None` when no hymnal is loaded or `id` is unknown.
/// Persisting the flag is the caller's job.
#[flutter_rust_bridge::frb(sync)]
pub fn hymnal_toggle_favorite(id: String) -> Option<bool> {
    write_index().as_mut()?.toggle_favorite(&id)
}

fn to_list_item(index: &HymnIndex, hymn: &HymnRecord, query: &str) -> HymnListItem {
    HymnListItem {
        id: hymn.id.clone(),
        number: hymn.number,
        title: hymn.title.clone(),
        section_title: index.section_info(&hymn.section).title.clone(),
        preview: hymn.preview_line().to_string(),
        number_match: number_matches(hymn, query),
    }
}

fn read_index() -> RwLockReadGuard<'static, Option<HymnIndex>> {
    LOADED_INDEX.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_index() -> RwLockWriteGuard<'static, Option<HymnIndex>> {
    LOADED_INDEX.write().unwrap_or_else(PoisonError::into_inner)
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        hymnal_detail, hymnal_load, hymnal_search, hymnal_sections, hymnal_toggle_favorite,
    };
    use serde_json::json;

    // Single test: the loaded index is process-wide state.
    #[test]
    fn load_search_detail_and_favorite_flow() {
        let failed = hymnal_load("{ \"sections\": [] }".to_string());
        assert!(!failed.ok);
        assert!(failed.message.contains("hymns"));

        let dataset = json!({
            "sections": [{ "id": 1, "title": "Opening", "description": "First hymns" }],
            "hymns": [
                {
                    "id": "a",
                    "Number": 23,
                    "Title": "Amazing Grace",
                    "Section": 1,
                    "Refrain": "How sweet\nthe sound",
                    "Verse1": "first verse",
                    "verse 3": "third verse"
                },
                { "id": "b", "Number": 123, "Title": "Other", "Section": 2 }
            ]
        });
        let loaded = hymnal_load(dataset.to_string());
        assert!(loaded.ok);
        assert_eq!((loaded.hymns, loaded.sections, loaded.skipped), (2, 1, 0));

        let all = hymnal_search(None, String::new());
        assert_eq!(all.items.len(), 2);
        assert_eq!(all.message, "2 hymns");

        let by_number = hymnal_search(None, "23".to_string());
        assert_eq!(by_number.items.len(), 2);
        assert!(by_number.items.iter().all(|item| item.number_match));
        assert_eq!(by_number.message, "2 hymns found for \"23\"");

        let opening = hymnal_search(Some("1".to_string()), String::new());
        assert_eq!(opening.items.len(), 1);
        assert_eq!(opening.items[0].preview, "How sweet");
        assert_eq!(
            opening.section_header.map(|header| header.title),
            Some("Opening".to_string())
        );

        let unknown_section = hymnal_search(Some("2".to_string()), String::new());
        assert_eq!(unknown_section.items[0].section_title, "Section 2");
        assert!(unknown_section.section_header.is_none());

        assert_eq!(hymnal_sections().len(), 1);

        let detail = hymnal_detail("a".to_string()).unwrap();
        let verse_numbers = detail
            .verses
            .iter()
            .map(|verse| verse.number)
            .collect::<Vec<_>>();
        assert_eq!(verse_numbers, vec![1, 3]);
        assert_eq!(detail.section.title, "Opening");
        assert!(hymnal_detail("missing".to_string()).is_none());

        assert_eq!(hymnal_toggle_favorite("a".to_string()), Some(true));
        assert!(hymnal_detail("a".to_string()).unwrap().favorited);
        assert_eq!(hymnal_toggle_favorite("missing".to_string()), None);

        let rejected = hymnal_load("{ \"hymns\": {} }".to_string());
        assert!(!rejected.ok);
        assert_eq!(hymnal_search(None, String::new()).items.len(), 2);
        assert!(hymnal_detail("a".to_string()).unwrap().favorited);
    }
}
