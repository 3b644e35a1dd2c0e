//! Tests for the triage configuration system.

use std::path::PathBuf;
use std::sync::Mutex;

use triage_core::config::{CliOverrides, ReportFormat, TriageConfig};
use triage_core::errors::ConfigError;

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all TRIAGE_ env vars to prevent cross-test contamination.
fn clear_triage_env_vars() {
    for key in [
        "TRIAGE_CORPUS_PATH",
        "TRIAGE_REGISTRY_PATH",
        "TRIAGE_THREADS",
        "TRIAGE_PARALLEL",
        "TRIAGE_REPORT_FORMAT",
        "TRIAGE_REPORT_OUTPUT",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_triage_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("triage.toml"),
        r#"
[corpus]
path = "project/corpus.toml"

[classify]
threads = 2
parallel = false

[report]
format = "pretty"
"#,
    )
    .unwrap();

    // Env overrides project for threads
    std::env::set_var("TRIAGE_THREADS", "6");

    // CLI overrides env and project for the corpus path
    let cli = CliOverrides {
        corpus_path: Some(PathBuf::from("cli/corpus.toml")),
        ..Default::default()
    };

    let config = TriageConfig::load(dir.path(), Some(&cli)).unwrap();

    assert_eq!(config.corpus.path, Some(PathBuf::from("cli/corpus.toml")));
    assert_eq!(config.classify.threads, Some(6));
    assert_eq!(config.classify.parallel, Some(false));
    assert_eq!(config.report.effective_format().unwrap(), ReportFormat::Pretty);

    clear_triage_env_vars();
}

#[test]
fn test_missing_project_file_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_triage_env_vars();

    let dir = tempdir();
    let config = TriageConfig::load(dir.path(), None).unwrap();

    assert_eq!(
        config.corpus.effective_path(),
        PathBuf::from("corpus/python_banking.toml")
    );
    assert_eq!(config.classify.effective_threads(), 0);
    assert!(config.classify.effective_parallel());
    assert_eq!(config.report.effective_format().unwrap(), ReportFormat::Json);
    assert!(config.report.effective_include_rejections());
}

#[test]
fn test_invalid_project_toml_is_a_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_triage_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("triage.toml"), "[classify\nthreads = ").unwrap();

    let err = TriageConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }), "got {err:?}");
}

#[test]
fn test_unknown_keys_are_ignored() {
    let config = TriageConfig::from_toml(
        r#"
[classify]
threads = 4
future_knob = "ignored"

[unrelated]
value = 1
"#,
    )
    .unwrap();
    assert_eq!(config.classify.threads, Some(4));
}

#[test]
fn test_validation_rejects_unknown_report_format() {
    let config = TriageConfig::from_toml("[report]\nformat = \"xml\"\n").unwrap();
    let err = TriageConfig::validate(&config).unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => assert_eq!(field, "report.format"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_validation_rejects_excessive_threads() {
    let config = TriageConfig::from_toml("[classify]\nthreads = 100000\n").unwrap();
    assert!(TriageConfig::validate(&config).is_err());
}

#[test]
fn test_env_parallel_flag_parsed() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_triage_env_vars();

    std::env::set_var("TRIAGE_PARALLEL", "false");
    std::env::set_var("TRIAGE_THREADS", "not-a-number");
    let dir = tempdir();
    let config = TriageConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.classify.parallel, Some(false));
    // Unparseable values are skipped, not fatal.
    assert_eq!(config.classify.threads, None);

    clear_triage_env_vars();
}

#[test]
fn test_toml_round_trip_preserves_values() {
    let config = TriageConfig::from_toml(
        r#"
[corpus]
registry_path = "extra.toml"

[report]
include_rejections = false
"#,
    )
    .unwrap();
    let serialized = config.to_toml().unwrap();
    let reparsed = TriageConfig::from_toml(&serialized).unwrap();
    assert_eq!(reparsed.corpus.registry_path, Some(PathBuf::from("extra.toml")));
    assert!(!reparsed.report.effective_include_rejections());
}
