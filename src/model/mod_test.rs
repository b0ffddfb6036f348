// Tests for the wire model
// Test cases:
// - Catalog entries deserialize from the backend's camelCase JSON
// - Key matching is exact and case-sensitive on both query keys
// - Unknown response statuses fall back to ERROR, known ones keep their variant
// - Session payloads use the backend's camelCase names
// - Link containers pick next/previous and ignore unknown relations
// - Flag icon classes map en/sv to their country codes

use super::*;

const CATALOG_ENTRY: &str = r#"{
    "source": {"identifier": "de", "displayName": "German", "dialect": null, "dialectDisplayName": null},
    "target": {"identifier": "no", "displayName": "Norwegian", "dialect": "ny", "dialectDisplayName": "Nynorsk"},
    "bidirectional": true,
    "queryString": "de-no",
    "queryStringWithDialect": "de-no_ny"
}"#;

#[test]
fn test_bilingual_dictionary_deserializes_from_camel_case() {
    let dictionary: BilingualDictionary = serde_json::from_str(CATALOG_ENTRY).unwrap();

    assert_eq!(dictionary.source.identifier, "de");
    assert_eq!(dictionary.target.dialect.as_deref(), Some("ny"));
    assert!(dictionary.bidirectional);
    assert_eq!(dictionary.query_string, "de-no");
    assert_eq!(dictionary.query_string_with_dialect, "de-no_ny");
}

#[test]
fn test_matches_key_accepts_plain_and_dialect_keys_only() {
    let dictionary: BilingualDictionary = serde_json::from_str(CATALOG_ENTRY).unwrap();

    assert!(dictionary.matches_key("de-no"));
    assert!(dictionary.matches_key("de-no_ny"));
    assert!(!dictionary.matches_key("DE-NO"));
    assert!(!dictionary.matches_key("no-de"));
    assert!(!dictionary.matches_key(""));
}

#[test]
fn test_response_container_with_unknown_status_maps_to_error() {
    let json = r#"{"status":"SOMETHING_NEW","message":"boom"}"#;
    let container: ResponseContainer<Vec<BilingualDictionary>> =
        serde_json::from_str(json).unwrap();

    assert_eq!(container.status, ResponseStatus::Error);
    assert_eq!(container.message.as_deref(), Some("boom"));
    assert!(container.data.is_none());
    assert!(container.links.is_empty());
}

#[test]
fn test_response_container_ok_with_data() {
    let json = format!(r#"{{"status":"OK","message":null,"data":[{}]}}"#, CATALOG_ENTRY);
    let container: ResponseContainer<Vec<BilingualDictionary>> =
        serde_json::from_str(&json).unwrap();

    assert_eq!(container.status, ResponseStatus::Ok);
    assert_eq!(container.data.unwrap().len(), 1);
}

#[test]
fn test_link_container_from_links() {
    let links = vec![
        Link {
            rel: "next".to_string(),
            href: "/history?page=2".to_string(),
        },
        Link {
            rel: "self".to_string(),
            href: "/history".to_string(),
        },
        Link {
            rel: "previous".to_string(),
            href: "/history?page=0".to_string(),
        },
    ];

    let container = LinkContainer::from_links(&links);

    assert_eq!(container.next.unwrap().href, "/history?page=2");
    assert_eq!(container.previous.unwrap().href, "/history?page=0");
}

#[test]
fn test_query_response_tolerates_missing_fields() {
    let json = r#"{"requestString":"haus","groupedBilingualEntries":[
        {"groupIdentifier":"de-en","resultEntries":[
            {"entryType":"NOUN","entryScore":0.9,"source":{"generalForm":"Haus"},"target":{"generalForm":"house"}},
            {"source":{"generalForm":"Haus"},"target":{"generalForm":"home"}}
        ]}
    ]}"#;
    let response: QueryResponse = serde_json::from_str(json).unwrap();

    assert_eq!(response.request_string, "haus");
    assert_eq!(response.entry_count(), 2);
    let second = &response.grouped_bilingual_entries[0].result_entries[1];
    assert_eq!(second.target.general_form, "home");
    assert!(second.entry_type.is_empty());
}

#[test]
fn test_query_log_entry_parses_request_time() {
    let json = r#"{"queryString":"hus","requestTime":"2017-05-01T12:30:00Z"}"#;
    let entry: QueryLogEntry = serde_json::from_str(json).unwrap();

    assert_eq!(entry.query_string, "hus");
    assert_eq!(entry.request_time.to_rfc3339(), "2017-05-01T12:30:00+00:00");
    assert!(entry.dictionaries.is_empty());
}

#[test]
fn test_flag_icon_class() {
    let language = |id: &str| Language {
        identifier: id.to_string(),
        display_name: String::new(),
        dialect: None,
        dialect_display_name: None,
    };

    assert_eq!(flag_icon_class(&language("en")), "flag-icon-gb");
    assert_eq!(flag_icon_class(&language("sv")), "flag-icon-se");
    assert_eq!(flag_icon_class(&language("de")), "flag-icon-de");
}

#[test]
fn test_known_statuses_round_trip() {
    for (status, wire) in [
        (ResponseStatus::Ok, "\"OK\""),
        (ResponseStatus::InternalError, "\"INTERNAL_ERROR\""),
        (ResponseStatus::MalformedQuery, "\"MALFORMED_QUERY\""),
        (ResponseStatus::Unauthorized, "\"UNAUTHORIZED\""),
        (ResponseStatus::Error, "\"ERROR\""),
    ] {
        assert_eq!(serde_json::to_string(&status).unwrap(), wire);
        assert_eq!(serde_json::from_str::<ResponseStatus>(wire).unwrap(), status);
        assert_eq!(format!("\"{}\"", status), wire);
    }
}

#[test]
fn test_credentials_serialize_camel_case() {
    let credentials = Credentials {
        name: "jane".to_string(),
        password: "secret".to_string(),
        stay_logged_in: true,
    };

    let json = serde_json::to_value(&credentials).unwrap();

    assert_eq!(
        json,
        serde_json::json!({"name": "jane", "password": "secret", "stayLoggedIn": true})
    );
}

#[test]
fn test_registration_data_serializes_confirmation() {
    let data = RegistrationData {
        name: "jane".to_string(),
        password: "secret".to_string(),
        confirm_password: "secret".to_string(),
    };

    let json = serde_json::to_value(&data).unwrap();

    assert_eq!(json["confirmPassword"], "secret");
}

#[test]
fn test_user_session_ignores_extra_principal_fields() {
    let json = r#"{"name":"jane","roles":["user"],"persistent":false}"#;

    let session: UserSession = serde_json::from_str(json).unwrap();

    assert_eq!(session.name, "jane");
}
