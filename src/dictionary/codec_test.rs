use super::*;

#[test]
fn test_split_selection() {
    assert_eq!(split_selection("en-de,fr-de"), vec!["en-de", "fr-de"]);
    assert_eq!(split_selection("sv-en"), vec!["sv-en"]);
}

#[test]
fn test_split_selection_drops_empty_segments() {
    assert!(split_selection("").is_empty());
    assert_eq!(split_selection(",en-de,,fr-de,"), vec!["en-de", "fr-de"]);
    assert_eq!(split_selection(" en-de , fr-de "), vec!["en-de", "fr-de"]);
}

#[test]
fn test_join_selection_preserves_order() {
    assert_eq!(join_selection(&["fr-de", "en-de"]), "fr-de,en-de");
    assert_eq!(join_selection::<&str>(&[]), "");
    assert_eq!(join_selection(&["de-no_ny".to_string()]), "de-no_ny");
}

#[test]
fn test_is_representable() {
    assert!(is_representable("de-no_ny"));
    assert!(!is_representable(""));
    assert!(!is_representable("en-de,fr-de"));
    assert!(!is_representable(" en-de"));
    assert!(!is_representable("en-de\t"));
}

#[test]
fn test_representable_keys_round_trip() {
    let keys = ["de-no_ny", "en-de", "x y"];
    assert!(keys.iter().all(|k| is_representable(k)));

    assert_eq!(split_selection(&join_selection(&keys)), keys);
}
