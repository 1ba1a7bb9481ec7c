//! Unit tests for TOML bootstrap configuration
//!
//! A missing file must never stop the harvester; a present but broken file
//! must be reported instead of silently ignored.

use lyrix_common::config::{load_config, load_toml_config, TomlConfig};
use lyrix_common::Error;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("lyrix.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load_toml_config(&dir.path().join("absent.toml")).unwrap();

    assert!(config.artist.is_none());
    assert!(config.max_songs.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_partial_file_sets_only_named_fields() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
artist = "Destroy Lonely"
per_page = 20
sort = "title"

[logging]
level = "debug"
"#,
    );

    let config = load_toml_config(&path).unwrap();

    assert_eq!(config.artist.as_deref(), Some("Destroy Lonely"));
    assert_eq!(config.per_page, Some(20));
    assert_eq!(config.sort.as_deref(), Some("title"));
    assert!(config.corpus_path.is_none());
    assert!(config.item_delay_ms.is_none());
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_full_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
artist = "Yeat"
corpus_path = "/data/yeat_lyrics.txt"
progress_path = "/data/scrape_progress.json"
max_songs = 120
per_page = 50
item_delay_ms = 500
"#,
    );

    let config = load_toml_config(&path).unwrap();

    assert_eq!(config.corpus_path, Some(PathBuf::from("/data/yeat_lyrics.txt")));
    assert_eq!(
        config.progress_path,
        Some(PathBuf::from("/data/scrape_progress.json"))
    );
    assert_eq!(config.max_songs, Some(120));
    assert_eq!(config.item_delay_ms, Some(500));
}

#[test]
fn test_malformed_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "max_songs = \"lots\"\n[[[");

    match load_toml_config(&path) {
        Err(Error::Config(msg)) => assert!(msg.contains("Parse")),
        other => panic!("expected Config error, got {:?}", other),
    }
}

#[test]
fn test_unknown_field_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "artsit = \"Yeat\"\n");

    assert!(matches!(load_toml_config(&path), Err(Error::Config(_))));
}

#[test]
fn test_explicit_path_takes_precedence() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "max_songs = 7\n");

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.max_songs, Some(7));
}

#[test]
fn test_default_is_empty() {
    let config = TomlConfig::default();
    assert!(config.artist.is_none());
    assert!(config.per_page.is_none());
}
