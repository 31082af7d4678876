use hymnal_core::{load_collection, load_dataset, load_dataset_file, load_dataset_str, LoadError};
use hymnal_core::{SectionId, VERSE_COUNT};
use serde_json::json;

const FIXTURE: &str = include_str!("fixtures/hymnal.json");

#[test]
fn fixture_loads_valid_records_in_order() {
    let collection = load_dataset_str(FIXTURE).unwrap();

    let numbers = collection
        .hymns
        .iter()
        .map(|hymn| hymn.number)
        .collect::<Vec<_>>();
    assert_eq!(numbers, vec![1, 23, 108, 230]);
    assert_eq!(collection.sections.len(), 2);

    assert_eq!(collection.report.hymns_loaded, 4);
    assert_eq!(collection.report.hymns_skipped, 2);
    assert_eq!(collection.report.sections_loaded, 2);
    assert_eq!(collection.report.sections_skipped, 1);
}

#[test]
fn verse_spellings_are_normalized_at_load() {
    let collection = load_dataset_str(FIXTURE).unwrap();
    let grace = &collection.hymns[1];

    assert_eq!(grace.verses[0], "T'was grace that taught my heart to fear");
    assert_eq!(grace.verses[1], "hidden phrase in the second verse");
    assert!(grace.verses[2..].iter().all(String::is_empty));
    assert_eq!(grace.verses.len(), VERSE_COUNT);
    assert_eq!(grace.refrain.as_deref(), Some("How sweet the sound"));
    assert!(grace.favorited);
}

#[test]
fn lowercase_field_names_and_string_numbers_are_accepted() {
    let collection = load_dataset_str(FIXTURE).unwrap();

    let assurance = &collection.hymns[2];
    assert_eq!(assurance.number, 108);
    assert_eq!(assurance.section, SectionId::from(7_u32));

    let silent = &collection.hymns[3];
    assert_eq!(silent.id, "h-230");
    assert_eq!(silent.title, "Silent Hymn");
    assert_eq!(silent.refrain, None);
    assert!(!silent.favorited);
}

#[test]
fn missing_ids_are_synthesized_stably() {
    let first = load_dataset_str(FIXTURE).unwrap();
    let second = load_dataset_str(FIXTURE).unwrap();

    let synthesized = &first.hymns[2].id;
    assert!(!synthesized.is_empty());
    assert_eq!(synthesized, &second.hymns[2].id);
    assert_ne!(synthesized, &first.hymns[0].id);
}

#[test]
fn underscore_id_key_is_kept_as_hymn_id() {
    let loaded = load_dataset(&json!({
        "hymns": [
            { "_id": 42, "Number": 1, "Title": "A" },
            { "_id": "h-7", "Number": 7, "Title": "B" },
        ]
    }))
    .unwrap();

    assert_eq!(loaded.hymns[0].id, "42");
    assert_eq!(loaded.hymns[1].id, "h-7");
}

#[test]
fn integral_float_section_ids_match_integer_sections() {
    let loaded = load_dataset(&json!({
        "hymns": [{ "Number": 1, "Title": "A", "Section": 2.0 }],
        "sections": [{ "id": 2, "title": "Praise" }, { "id": 3.0, "title": "Prayer" }],
    }))
    .unwrap();

    assert_eq!(loaded.hymns[0].section, SectionId::from(2u32));
    assert_eq!(loaded.sections[0].id, loaded.hymns[0].section);
    assert_eq!(loaded.sections[1].id.as_str(), "3");
}

#[test]
fn absent_or_null_sections_read_as_empty() {
    let hymns = json!([{ "Number": 1, "Title": "Only" }]);

    let without = load_collection(&hymns, None).unwrap();
    assert!(without.sections.is_empty());
    assert_eq!(without.hymns[0].section, SectionId::default());

    let with_null = load_dataset(&json!({ "hymns": hymns, "sections": null })).unwrap();
    assert!(with_null.sections.is_empty());
}

#[test]
fn structural_problems_are_fatal() {
    assert!(matches!(
        load_dataset(&json!([])).unwrap_err(),
        LoadError::NotAnObject
    ));
    assert!(matches!(
        load_dataset(&json!({ "sections": [] })).unwrap_err(),
        LoadError::MissingHymns
    ));
    assert!(matches!(
        load_dataset(&json!({ "hymns": {} })).unwrap_err(),
        LoadError::NotASequence { field: "hymns" }
    ));
    assert!(matches!(
        load_dataset(&json!({ "hymns": [], "sections": "nope" })).unwrap_err(),
        LoadError::NotASequence { field: "sections" }
    ));
    assert!(matches!(
        load_dataset_str("{ not json").unwrap_err(),
        LoadError::Json(_)
    ));
}

#[test]
fn empty_hymn_list_is_not_an_error() {
    let collection = load_dataset(&json!({ "hymns": [] })).unwrap();
    assert!(collection.hymns.is_empty());
    assert_eq!(collection.report.hymns_loaded, 0);
}

#[test]
fn dataset_file_is_read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hymns.json");
    std::fs::write(&path, FIXTURE).unwrap();

    let collection = load_dataset_file(&path).unwrap();
    assert_eq!(collection.hymns.len(), 4);

    let err = load_dataset_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn blank_titles_are_skipped() {
    let collection = load_dataset(&json!({
        "hymns": [
            { "Number": 1, "Title": "   " },
            { "Number": 2, "Title": "Kept" }
        ]
    }))
    .unwrap();

    assert_eq!(collection.hymns.len(), 1);
    assert_eq!(collection.hymns[0].number, 2);
    assert_eq!(collection.report.hymns_skipped, 1);
}
