//! The bundled banking corpus: every case loads and resolves to its
//! narrated expectation.

use std::path::PathBuf;

use triage_analysis::{
    classify_corpus, CaseVerdict, ClassifierRegistry, Corpus, PathVerdict, Subcategory,
    TriageReport,
};
use triage_core::config::ClassifyConfig;
use triage_core::constants::REGISTRY_VERSION;

fn corpus_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../corpus/python_banking.toml")
}

fn load() -> Corpus {
    Corpus::load(&corpus_path(), &ClassifierRegistry::builtin()).unwrap()
}

fn report() -> TriageReport {
    let corpus = load();
    let resolutions = classify_corpus(&corpus, &ClassifyConfig::default()).unwrap();
    TriageReport::new(&corpus, resolutions, REGISTRY_VERSION, true)
}

#[test]
fn test_corpus_loads_without_rejections() {
    let corpus = load();
    assert!(
        corpus.rejections().is_empty(),
        "unexpected rejections: {:?}",
        corpus.rejections()
    );
    assert_eq!(corpus.len(), 20);
    assert_eq!(corpus.application(), Some("python-banking-demo"));
    assert!(corpus.cases().iter().all(|c| c.expected.is_some()));
}

#[test]
fn test_every_case_matches_expectation() {
    let report = report();
    let mismatches = report.mismatches();
    assert!(mismatches.is_empty(), "mismatches: {mismatches:#?}");
}

#[test]
fn test_summary_counts() {
    let summary = report().summary;
    assert_eq!(summary.cases, 20);
    assert_eq!(summary.rejected, 0);
    assert_eq!(summary.by_verdict[&CaseVerdict::MustFix], 4);
    assert_eq!(summary.by_verdict[&CaseVerdict::GoodToFix], 1);
    assert_eq!(summary.by_verdict[&CaseVerdict::FalsePositiveSanitized], 6);
    assert_eq!(summary.by_verdict[&CaseVerdict::FalsePositiveProtected], 4);
    assert_eq!(summary.by_verdict[&CaseVerdict::FalsePositiveDeadCode], 5);
    assert_eq!(summary.by_verdict[&CaseVerdict::FalsePositive], 0);
    assert_eq!(summary.true_positives, 5);
    assert_eq!(summary.false_positives, 15);
}

#[test]
fn test_mixed_live_and_dead_paths_must_fix() {
    let report = report();
    let record = report.verdict("accounts-report").unwrap();
    assert_eq!(record.overall, CaseVerdict::MustFix);
    assert_eq!(record.per_path.len(), 2);
    assert_eq!(record.per_path[0].verdict, PathVerdict::Exploitable);
    assert_eq!(record.per_path[1].verdict, PathVerdict::DeadCode);
    assert!(record.rationale.contains("detailed"));
}

#[test]
fn test_confidence_values() {
    let report = report();
    let conf = |id: &str| report.verdict(id).unwrap().confidence;
    assert!((conf("app-search-transactions") - 0.95).abs() < 1e-9);
    assert!((conf("app-render-custom-template") - 0.80).abs() < 1e-9);
    assert!((conf("app-legacy-import") - 0.95).abs() < 1e-9);
    assert!((conf("app-user-profile") - 0.90).abs() < 1e-9);
    assert!((conf("app-user-preferences") - 0.85).abs() < 1e-9);
    assert!((conf("accounts-admin-search") - 0.90).abs() < 1e-9);
}

#[test]
fn test_decisive_sanitizer_prefers_parameterization() {
    let report = report();
    let record = report.verdict("accounts-find").unwrap();
    assert_eq!(record.subcategory, Some(Subcategory::Sanitized2A));
    assert!(record.per_path[0]
        .rationale
        .contains("DatabaseHelper.execute_parameterized_query"));
}

#[test]
fn test_dead_paths_cite_flag_location() {
    let report = report();
    let record = report.verdict("app-legacy-import").unwrap();
    assert!(record.per_path[0]
        .rationale
        .contains("services/legacy_service.py:22"));
}

#[test]
fn test_every_path_carries_evidence() {
    let report = report();
    for record in &report.verdicts {
        for path in &record.per_path {
            assert!(!path.evidence.is_empty(), "{}/{}", record.case_id, path.path_id);
        }
    }
}
