//! Config Store Integration Tests

use std::fs;

use tempfile::TempDir;

use hashtopolis_console::models::ConsoleConfigUpdate;
use hashtopolis_console::ConfigService;

#[test]
fn test_config_round_trip_through_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let mut service = ConfigService::open(path.clone()).unwrap();
    service
        .update_config(ConsoleConfigUpdate {
            api_url: Some("https://ht.example/api/v2".to_string()),
            chunk_time_window_secs: Some(1200),
            ..Default::default()
        })
        .unwrap();

    let reopened = ConfigService::open(path).unwrap();
    let config = reopened.get_config();
    assert_eq!(config.api_url, "https://ht.example/api/v2");
    assert_eq!(config.aggregator_config().chunk_time_window_secs, 1200);
}

#[test]
fn test_older_config_file_gets_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"api_url": "http://10.0.0.5/api/v2"}"#).unwrap();

    let service = ConfigService::open(path).unwrap();
    let config = service.get_config();
    assert_eq!(config.api_url, "http://10.0.0.5/api/v2");
    assert_eq!(config.chunk_time_window_secs, 600);
    assert_eq!(config.max_results_cap, 50_000);
}

#[test]
fn test_token_is_never_written() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let service = ConfigService::open(path.clone()).unwrap();
    service.save().unwrap();

    let content = fs::read_to_string(path).unwrap();
    assert!(!content.contains("api_token"));
}
