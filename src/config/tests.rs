//! Tests for the config module

use super::*;
use crate::error::Error;
use crate::types::LogLevel;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::time::Duration;

// ============================================================================
// ScenarioConfig
// ============================================================================

#[test]
fn test_scenario_config_defaults() {
    let config = ScenarioConfig::default();
    assert_eq!(config.page_size, 50);
    assert!(config.chain_lookup);
    assert_eq!(config.max_motels, 50);
    assert!(config.chain_allowed_status.is_empty());
    assert_eq!(config.motel.name_template, "{chain} - Motel1");
    assert_eq!(config.room_categories.categories.len(), 4);
    assert_eq!(config.rooms.floor_end, 3);
    assert_eq!(config.reservations.start_page, 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_document_is_default() {
    assert_eq!(scenario_config_from_str("").unwrap(), ScenarioConfig::default());
    assert_eq!(scenario_config_from_str("{}").unwrap(), ScenarioConfig::default());
}

#[test]
fn test_partial_yaml_keeps_defaults() {
    let yaml = r#"
page_size: 10
chain_allowed_status: [Active]
motel:
  state: CA
rooms:
  floor_start: 1
  floor_end: 2
  rooms_per_floor: 3
reservations:
  room_type: Deluxe Suite
  date: "2025-08-16"
"#;
    let config = scenario_config_from_str(yaml).unwrap();

    assert_eq!(config.page_size, 10);
    assert_eq!(config.chain_allowed_status, vec!["Active".to_string()]);
    assert_eq!(config.motel.state, "CA");
    assert_eq!(config.motel.pincode, "00000");
    assert_eq!(config.rooms.floor_start, 1);
    assert_eq!(config.rooms.status, "Active");
    assert_eq!(config.reservations.room_type.as_deref(), Some("Deluxe Suite"));
    assert_eq!(config.reservations.name, "John Doe");
}

#[test]
fn test_category_description_typo_is_accepted() {
    let json = r#"{
        "room_categories": {
            "categories": [
                {"displayName": "Penthouse", "roomCategoryName": "Penthouse", "desicription": "Top floor"},
                {"displayName": "Bunk", "roomCategoryName": "Bunk"}
            ]
        }
    }"#;
    let config = scenario_config_from_json(json).unwrap();
    let cats = &config.room_categories.categories;

    assert_eq!(cats[0].description, "Top floor");
    assert_eq!(cats[1].description, "");
    assert!(config.room_categories.only_active);
}

#[test]
fn test_validation_rejects_bad_values() {
    let cases = [
        "page_size: 0",
        "chain_get_path: ''",
        "motel: {name_template: 'Motel One'}",
        "room_categories: {categories: []}",
        "rooms: {floor_start: 4, floor_end: 3}",
        "rooms: {rooms_per_floor: 0}",
        "reservations: {per_page: 0}",
        "reservations: {date: 'tomorrow'}",
    ];
    for yaml in cases {
        let err = scenario_config_from_str(yaml).unwrap_err();
        assert!(
            matches!(err, Error::InvalidConfigValue { .. }),
            "{yaml}: {err:?}"
        );
    }
}

#[test]
fn test_malformed_documents() {
    assert!(matches!(
        scenario_config_from_str("page_size: [1"),
        Err(Error::YamlParse(_))
    ));
    assert!(matches!(
        scenario_config_from_json("{"),
        Err(Error::JsonParse(_))
    ));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_motels: 5\nchain_lookup: false").unwrap();

    let config = load_scenario_config(file.path()).unwrap();
    assert_eq!(config.max_motels, 5);
    assert!(!config.chain_lookup);
}

#[test]
fn test_load_missing_file() {
    let err = load_scenario_config("/nonexistent/scenario.yaml").unwrap_err();
    assert!(err.to_string().contains("scenario.yaml"));
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn test_settings_validate() {
    let settings = Settings {
        base_url: "http://localhost:8085".to_string(),
        ..Default::default()
    };
    assert!(settings.validate().is_ok());

    let bad_url = Settings {
        base_url: "not a url".to_string(),
        ..Default::default()
    };
    assert!(matches!(bad_url.validate(), Err(Error::InvalidUrl(_))));

    let bad_scheme = Settings {
        base_url: "ftp://motels".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        bad_scheme.validate(),
        Err(Error::InvalidConfigValue { .. })
    ));

    let zero_rps = Settings {
        max_rps: Some(0),
        ..Default::default()
    };
    assert!(zero_rps.validate().is_err());
}

#[test]
fn test_settings_http_config() {
    let settings = Settings {
        base_url: "http://localhost:8086".to_string(),
        api_token: Some("abc".to_string()),
        connect_timeout: Duration::from_millis(1500),
        read_timeout: Duration::from_secs(7),
        log_level: LogLevel::Debug,
        max_rps: Some(20),
        ..Default::default()
    };
    let http = settings.http_config();

    assert_eq!(http.base_url, "http://localhost:8086");
    assert_eq!(http.api_token.as_deref(), Some("abc"));
    assert_eq!(http.connect_timeout, Duration::from_millis(1500));
    assert_eq!(http.read_timeout, Duration::from_secs(7));
    assert!(http.rate_limit.is_some());
}

#[test]
fn test_empty_token_is_not_sent() {
    let settings = Settings {
        api_token: Some(String::new()),
        ..Default::default()
    };
    assert!(settings.http_config().api_token.is_none());
}

#[test]
fn test_seconds() {
    assert_eq!(seconds("read_timeout", 2.5).unwrap(), Duration::from_millis(2500));
    assert!(seconds("read_timeout", -1.0).is_err());
    assert!(seconds("read_timeout", f64::NAN).is_err());
}
