use clap::Parser;
use dupsweep::cli::Cli;
use dupsweep::config::{Config, ENV_PREFIX};
use dupsweep::scanner::IgnoreMatch;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tempfile::tempdir;

// Environment variables are process-wide
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
    let guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    guard
}

fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with(ENV_PREFIX) {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_config_load_from_toml() {
    let _guard = lock_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
ignored_file_names = [".DS_Store", "Thumbs.db"]
ignored_file_suffixes = [".tmp"]
quarantine_base = "/mnt/spare/quarantine"
ignore_match = "segment"
io_threads = 8
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.ignored_file_names, vec![".DS_Store", "Thumbs.db"]);
    assert_eq!(config.ignored_file_suffixes, vec![".tmp"]);
    assert_eq!(config.quarantine_base, PathBuf::from("/mnt/spare/quarantine"));
    assert_eq!(config.ignore_match, IgnoreMatch::Segment);
    assert_eq!(config.io_threads, 8);
    // Absent keys keep their defaults
    assert!(!config.strict);
}

#[test]
fn test_config_partial_toml_keeps_defaults() {
    let _guard = lock_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "strict = true\n").unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    let defaults = Config::default();

    assert!(config.strict);
    assert_eq!(config.ignored_file_names, defaults.ignored_file_names);
    assert_eq!(config.ignored_file_suffixes, defaults.ignored_file_suffixes);
    assert_eq!(config.io_threads, defaults.io_threads);
}

#[test]
fn test_config_env_overrides_toml() {
    let _guard = lock_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = 8\nignore_match = \"substring\"\n").unwrap();

    std::env::set_var("DUPSWEEP_IO_THREADS", "16");
    std::env::set_var("DUPSWEEP_IGNORE_MATCH", "segment");

    let config = Config::load_from_path(&config_path).unwrap();
    clear_env();

    assert_eq!(config.io_threads, 16);
    assert_eq!(config.ignore_match, IgnoreMatch::Segment);
}

#[test]
fn test_config_cli_overrides_env() {
    let _guard = lock_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "quarantine_base = \"/from/file\"\n").unwrap();

    std::env::set_var("DUPSWEEP_IO_THREADS", "16");
    let mut config = Config::load_from_path(&config_path).unwrap();
    clear_env();

    let cli = Cli::try_parse_from([
        "dupsweep",
        "--action",
        "clean",
        "--root-dir",
        "/data",
        "--cleanse-paths",
        "/data/b",
        "--io-threads",
        "2",
        "--quarantine-dir",
        "/from/cli",
    ])
    .unwrap();
    config.merge_cli(&cli);

    assert_eq!(config.io_threads, 2);
    assert_eq!(config.quarantine_base, PathBuf::from("/from/cli"));
}

#[test]
fn test_config_missing_explicit_file() {
    let _guard = lock_env();
    let temp_dir = tempdir().unwrap();
    assert!(Config::load(Some(&temp_dir.path().join("nope.toml"))).is_err());
}

#[test]
fn test_config_invalid_values() {
    let _guard = lock_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    fs::write(&config_path, "ignore_match = \"fuzzy\"\n").unwrap();
    assert!(Config::load_from_path(&config_path).is_err());

    fs::write(&config_path, "ignored_file_names = \".DS_Store\"\n").unwrap();
    assert!(Config::load_from_path(&config_path).is_err());
}

#[test]
fn test_config_rules_drive_scan() {
    let _guard = lock_env();
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("keep.txt"), "x").unwrap();
    fs::write(root.join("notes.tmp"), "x").unwrap();

    let config = Config {
        ignored_file_suffixes: vec![".tmp".to_string()],
        ..Config::default()
    };
    let finder = dupsweep::duplicates::DuplicateFinder::new(
        dupsweep::duplicates::FinderConfig::default().with_rules(config.ignore_rules(Vec::new())),
    );
    let (index, summary) = finder.find_duplicates(root).unwrap();

    assert_eq!(index.total_files(), 1);
    assert_eq!(summary.files_ignored, 1);
}
