use hymnal_core::{
    filter_hymns, load_dataset_str, HymnFilter, HymnIndex, HymnRecord, Section, SectionId,
};
use std::collections::HashSet;

const FIXTURE: &str = include_str!("fixtures/hymnal.json");

fn amazing_grace() -> HymnRecord {
    HymnRecord::new("ag", 23, "Amazing Grace", 1_u32).with_verse(1, "T'was grace that taught...")
}

fn sample() -> (Vec<HymnRecord>, Vec<Section>) {
    let collection = load_dataset_str(FIXTURE).unwrap();
    (collection.hymns, collection.sections)
}

fn numbers(hits: &[&HymnRecord]) -> Vec<u32> {
    hits.iter().map(|hymn| hymn.number).collect()
}

fn ids(hits: &[&HymnRecord]) -> Vec<String> {
    hits.iter().map(|hymn| hymn.id.clone()).collect()
}

#[test]
fn number_match() {
    let hymns = vec![amazing_grace()];
    let hits = filter_hymns(&hymns, &[], None, "23");
    assert_eq!(numbers(&hits), vec![23]);
}

#[test]
fn title_match_ignores_case() {
    let hymns = vec![amazing_grace()];
    assert_eq!(filter_hymns(&hymns, &[], None, "grace").len(), 1);
    assert_eq!(filter_hymns(&hymns, &[], None, "AMAZING").len(), 1);
    assert!(filter_hymns(&hymns, &[], None, "mercy").is_empty());
}

#[test]
fn verse_fallback_spelling_is_searchable() {
    let (hymns, sections) = sample();
    let hits = filter_hymns(&hymns, &sections, None, "hidden");
    assert_eq!(numbers(&hits), vec![23]);
}

#[test]
fn refrain_and_section_title_are_searchable() {
    let (hymns, sections) = sample();

    assert_eq!(numbers(&filter_hymns(&hymns, &sections, None, "sweet the")), vec![23]);
    assert_eq!(
        numbers(&filter_hymns(&hymns, &sections, None, "opening")),
        vec![1, 230]
    );
    assert_eq!(
        numbers(&filter_hymns(&hymns, &sections, None, "section 7")),
        vec![108]
    );
}

#[test]
fn section_filter_uses_identity_and_placeholder_resolution() {
    let hymns = vec![
        HymnRecord::new("a", 1, "First", 1_u32),
        HymnRecord::new("b", 2, "Second", 2_u32),
    ];
    let sections = vec![Section::new(1_u32, "Opening")];

    let active = SectionId::from(2_u32);
    let hits = filter_hymns(&hymns, &sections, Some(&active), "");
    assert_eq!(numbers(&hits), vec![2]);

    let index = HymnIndex::new(hymns.clone(), sections.clone());
    assert_eq!(index.section_info(&active).title, "Section 2");
    assert!(index
        .current_section(&HymnFilter::all().with_section(2_u32))
        .is_none());
    assert_eq!(
        index
            .current_section(&HymnFilter::all().with_section(1_u32))
            .map(|section| section.title.as_str()),
        Some("Opening")
    );
}

#[test]
fn empty_filter_returns_everything_in_order() {
    let (hymns, sections) = sample();
    let hits = filter_hymns(&hymns, &sections, None, "");

    assert_eq!(hits.len(), hymns.len());
    for (hit, hymn) in hits.iter().zip(&hymns) {
        assert!(std::ptr::eq(*hit, hymn));
    }
}

#[test]
fn query_is_not_trimmed() {
    let hymns = vec![amazing_grace()];
    assert_eq!(filter_hymns(&hymns, &[], None, "amazing grace").len(), 1);
    assert!(filter_hymns(&hymns, &[], None, " amazing").is_empty());
}

#[test]
fn section_and_query_compose_as_intersection() {
    let (hymns, sections) = sample();
    let section_ids = [None, Some(SectionId::from(1_u32)), Some(SectionId::from(2_u32))];
    let queries = ["", "praise", "grace", "1", "e", "zzz"];

    for section in &section_ids {
        for query in queries {
            let combined = filter_hymns(&hymns, &sections, section.as_ref(), query);
            let by_section = filter_hymns(&hymns, &sections, section.as_ref(), "");
            let by_query = filter_hymns(&hymns, &sections, None, query);

            let by_query_ptrs = by_query
                .iter()
                .map(|hymn| *hymn as *const HymnRecord)
                .collect::<HashSet<_>>();
            let expected = by_section
                .into_iter()
                .filter(|hymn| by_query_ptrs.contains(&(*hymn as *const HymnRecord)))
                .collect::<Vec<_>>();

            assert_eq!(numbers(&combined), numbers(&expected), "section={section:?} query={query}");
        }
    }
}

#[test]
fn index_filter_matches_stateless_filter() {
    let (hymns, sections) = sample();
    let index = HymnIndex::new(hymns.clone(), sections.clone());
    let section_ids = [None, Some(SectionId::from(1_u32)), Some(SectionId::from(7_u32))];
    let queries = ["", "PRAISE", "hidden", "section", "0", "wondrously", "nothing"];

    for section in &section_ids {
        for query in queries {
            let stateless = filter_hymns(&hymns, &sections, section.as_ref(), query);
            let mut filter = HymnFilter::all().with_query(query);
            filter.section = section.clone();
            let indexed = index.filter(&filter);

            assert_eq!(ids(&indexed), ids(&stateless), "section={section:?} query={query}");
        }
    }
}

#[test]
fn index_lookups_and_favorites() {
    let (hymns, sections) = sample();
    let mut index = HymnIndex::new(hymns, sections);

    assert_eq!(index.len(), 4);
    assert_eq!(index.get("h-023").map(|hymn| hymn.number), Some(23));
    assert!(index.get("missing").is_none());
    assert_eq!(numbers(&index.by_number(108)), vec![108]);
    assert!(index.by_number(999).is_empty());

    assert_eq!(numbers(&index.favorites()), vec![23]);
    assert_eq!(index.toggle_favorite("h-001"), Some(true));
    assert_eq!(index.toggle_favorite("h-023"), Some(false));
    assert_eq!(index.toggle_favorite("missing"), None);
    assert_eq!(numbers(&index.favorites()), vec![1]);
}
