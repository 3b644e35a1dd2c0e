//! End-to-end pipeline runs over temporary project roots.

use std::path::Path;

use triage_analysis::grading::{grade, parse_submissions};
use triage_analysis::run_pipeline;
use triage_core::config::{ReportFormat, TriageConfig};
use triage_core::errors::{CorpusError, PipelineError, TriageErrorCode};

const CORPUS: &str = r#"
[[case]]
id = "search"
sink = "sql_injection"
entry = { handler = "search", file = "app.py", line = 1 }
expected = { verdict = "MUST_FIX" }
[[case.path]]
id = "p"
nodes = [{ role = "sink", identity = "cursor.execute", file = "db.py", line = 5 }]

[[case]]
id = "custom-guard"
sink = "sql_injection"
entry = { handler = "audit", file = "app.py", line = 10 }
expected = { verdict = "FALSE_POSITIVE_PROTECTED", subcategory = "3A" }
[[case.path]]
id = "p"
nodes = [
    { role = "guard", identity = "require_sso", file = "app.py", line = 9 },
    { role = "sink", identity = "cursor.execute", file = "db.py", line = 7 },
]
guards = [{ identity = "require_sso" }]

[[case]]
id = "broken"
sink = "sql_injection"
entry = { handler = "x", file = "app.py", line = 20 }
[[case.path]]
id = "p"
nodes = [
    { role = "sink", identity = "cursor.execute", file = "db.py", line = 1 },
    { role = "entry", identity = "x", file = "app.py", line = 21 },
]
"#;

const REGISTRY: &str = r#"
[[guard]]
identity = "require_sso"
category = "authentication"
"#;

fn project(with_registry: bool) -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("corpus")).unwrap();
    std::fs::write(dir.path().join("corpus/python_banking.toml"), CORPUS).unwrap();
    if with_registry {
        std::fs::write(dir.path().join("extra.toml"), REGISTRY).unwrap();
    }
    dir
}

fn config(toml: &str) -> TriageConfig {
    TriageConfig::from_toml(toml).unwrap()
}

#[test]
fn test_rejections_are_non_fatal() {
    let dir = project(false);
    let result = run_pipeline(&TriageConfig::default(), dir.path()).unwrap();

    assert_eq!(result.data.verdicts.len(), 2);
    assert_eq!(result.data.summary.rejected, 1);
    assert_eq!(result.error_count(), 1);
    assert!(matches!(
        result.errors[0],
        PipelineError::Corpus(CorpusError::SinkNotTerminal { .. })
    ));
    assert_eq!(result.data.rejections[0].case_id, "broken");
}

#[test]
fn test_registry_extension_changes_guard_tier() {
    let dir = project(false);
    let without = run_pipeline(&TriageConfig::default(), dir.path()).unwrap();
    assert_eq!(without.data.mismatches().len(), 1);

    let dir = project(true);
    let with = run_pipeline(
        &config("[corpus]\nregistry_path = \"extra.toml\"\n"),
        dir.path(),
    )
    .unwrap();
    assert!(with.data.mismatches().is_empty());
}

#[test]
fn test_missing_corpus_aborts() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = run_pipeline(&TriageConfig::default(), dir.path()).unwrap_err();
    assert_eq!(err.error_code(), "CORPUS_IO_ERROR");
}

#[test]
fn test_bad_registry_aborts() {
    let dir = project(false);
    std::fs::write(
        dir.path().join("bad.toml"),
        "[[sanitizer]]\nidentity = \"x\"\ntechnique = \"prayer\"\n",
    )
    .unwrap();
    let err = run_pipeline(&config("[corpus]\nregistry_path = \"bad.toml\"\n"), dir.path())
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Corpus(CorpusError::InvalidRegistry { .. })
    ));
}

#[test]
fn test_excluding_rejections_keeps_count() {
    let dir = project(false);
    let result = run_pipeline(
        &config("[report]\ninclude_rejections = false\n"),
        dir.path(),
    )
    .unwrap();
    assert!(result.data.rejections.is_empty());
    assert_eq!(result.data.summary.rejected, 1);
    let json = result.data.render(ReportFormat::Json).unwrap();
    assert!(!json.contains("\"rejections\""));
}

#[test]
fn test_report_written_to_file() {
    let dir = project(false);
    let result = run_pipeline(&TriageConfig::default(), dir.path()).unwrap();
    let out = dir.path().join("out/report.json");
    std::fs::create_dir_all(out.parent().unwrap()).unwrap();
    result.data.write(ReportFormat::Pretty, Some(&out)).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["verdicts"][0]["case_id"], "search");
    assert_eq!(value["registry_version"], 1);
    assert_eq!(value["rejections"][0]["code"], "CORPUS_STRUCTURE_ERROR");
}

#[test]
fn test_write_into_missing_directory_fails() {
    let dir = project(false);
    let result = run_pipeline(&TriageConfig::default(), dir.path()).unwrap();
    let err = result
        .data
        .write(ReportFormat::Json, Some(Path::new("/nonexistent/dir/report.json")))
        .unwrap_err();
    assert_eq!(err.error_code(), "REPORT_ERROR");
}

#[test]
fn test_grading_against_pipeline_report() {
    let dir = project(false);
    let report = run_pipeline(&TriageConfig::default(), dir.path()).unwrap().data;
    let subs = parse_submissions(
        r#"[{"case_id":"search","overall":"MUST_FIX"},{"case_id":"broken","overall":"MUST_FIX"}]"#,
        "subs.json",
    )
    .unwrap();
    let g = grade(&report, &subs);
    assert_eq!(g.exact_matches, 1);
    assert_eq!(g.missing, vec!["custom-guard".to_string()]);
    assert_eq!(g.unknown, vec!["broken".to_string()]);
    assert_eq!(g.confusion.true_positive, 1);
}
