// Tests for query string handling and MemoryLocation

use super::*;

#[test]
fn test_parse_query_string_decodes_values() {
    let pairs = parse_query_string("?dictionaries=en-de%2Cfr-de&queryString=guten+tag");

    assert_eq!(
        pairs,
        vec![
            ("dictionaries".to_string(), "en-de,fr-de".to_string()),
            ("queryString".to_string(), "guten tag".to_string()),
        ]
    );
}

#[test]
fn test_parse_empty_query_string() {
    assert!(parse_query_string("").is_empty());
    assert!(parse_query_string("?").is_empty());
    assert!(parse_query_string("   ").is_empty());
}

#[test]
fn test_build_query_string_preserves_order() {
    let pairs = vec![
        ("queryString".to_string(), "haus".to_string()),
        ("dictionaries".to_string(), "de-en".to_string()),
    ];

    assert_eq!(
        build_query_string(&pairs),
        "queryString=haus&dictionaries=de-en"
    );
    assert_eq!(build_query_string(&[]), "");
}

#[test]
fn test_memory_location_set_and_get() {
    let location = MemoryLocation::new();
    assert!(location.search_param(parameters::DICTIONARIES).is_none());

    location.set_search_param(parameters::DICTIONARIES, "en-de");
    assert_eq!(
        location.search_param("dictionaries").as_deref(),
        Some("en-de")
    );

    location.set_search_param(parameters::DICTIONARIES, "en-de,sv-en");
    assert_eq!(
        location.search_param("dictionaries").as_deref(),
        Some("en-de,sv-en")
    );
}

#[test]
fn test_memory_location_empty_value_removes_parameter() {
    let location = MemoryLocation::from_query("dictionaries=en-de&queryString=haus");

    location.set_search_param(parameters::DICTIONARIES, "");

    assert!(location.search_param("dictionaries").is_none());
    assert_eq!(location.query_string(), "queryString=haus");
}

#[test]
fn test_memory_location_from_query_last_value_wins() {
    let location = MemoryLocation::from_query("dictionaries=a&dictionaries=b");

    assert_eq!(location.search_param("dictionaries").as_deref(), Some("b"));
    assert_eq!(location.query_string(), "dictionaries=b");
}

#[test]
fn test_query_string_round_trips_separator() {
    let location = MemoryLocation::new();
    location.set_search_param(parameters::DICTIONARIES, "en-de,fr-de");

    let reparsed = MemoryLocation::from_query(&location.query_string());

    assert_eq!(
        reparsed.search_param("dictionaries").as_deref(),
        Some("en-de,fr-de")
    );
}
