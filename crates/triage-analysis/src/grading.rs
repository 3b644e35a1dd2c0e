//! Grading a scanner's submitted verdicts against the computed report.
//!
//! MUST_FIX and GOOD_TO_FIX count as positives; every FALSE_POSITIVE_*
//! verdict counts as a negative.

use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};
use triage_core::errors::GradeError;
use triage_core::types::collections::{FxHashMap, FxHashSet};

use crate::model::{CaseVerdict, Subcategory};
use crate::report::TriageReport;

/// One verdict claimed by the system under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub case_id: String,
    pub overall: CaseVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<Subcategory>,
}

/// Per-case grading detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseGrade {
    pub case_id: String,
    pub expected: CaseVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_subcategory: Option<Subcategory>,
    pub submitted: CaseVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_subcategory: Option<Subcategory>,
    pub verdict_match: bool,
    pub subcategory_match: bool,
}

impl CaseGrade {
    pub fn is_exact(&self) -> bool {
        self.verdict_match && self.subcategory_match
    }
}

/// True/false-positive confusion counts, positives being exploitable verdicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Confusion {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl Confusion {
    fn record(&mut self, expected: CaseVerdict, submitted: CaseVerdict) {
        match (expected.is_true_positive(), submitted.is_true_positive()) {
            (true, true) => self.true_positive += 1,
            (false, true) => self.false_positive += 1,
            (false, false) => self.true_negative += 1,
            (true, false) => self.false_negative += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeReport {
    pub cases: Vec<CaseGrade>,
    /// Report cases the submission did not cover.
    pub missing: Vec<String>,
    /// Submitted ids that name no case in the report.
    pub unknown: Vec<String>,
    pub exact_matches: usize,
    pub verdict_matches: usize,
    /// Exact matches over all report cases; missing cases count as misses.
    pub accuracy: f64,
    pub confusion: Confusion,
}

/// Parse a JSON array of submissions.
pub fn parse_submissions(json: &str, source_name: &str) -> Result<Vec<Submission>, GradeError> {
    serde_json::from_str(json).map_err(|e| GradeError::Parse {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
}

/// Read and parse a submissions file.
pub fn load_submissions(path: &FsPath) -> Result<Vec<Submission>, GradeError> {
    let json = std::fs::read_to_string(path).map_err(|e| GradeError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_submissions(&json, &path.display().to_string())
}

/// Grade submissions against the report. When a case id is submitted more
/// than once, the first submission counts.
pub fn grade(report: &TriageReport, submissions: &[Submission]) -> GradeReport {
    let mut by_id: FxHashMap<&str, &Submission> = FxHashMap::default();
    let mut unknown = Vec::new();
    let known: FxHashSet<&str> = report.verdicts.iter().map(|v| v.case_id.as_str()).collect();

    for submission in submissions {
        let id = submission.case_id.as_str();
        if !known.contains(id) {
            if !unknown.iter().any(|u| u == id) {
                unknown.push(submission.case_id.clone());
            }
            continue;
        }
        by_id.entry(id).or_insert(submission);
    }

    let mut grades = GradeReport {
        unknown,
        ..Default::default()
    };
    for record in &report.verdicts {
        let Some(submission) = by_id.get(record.case_id.as_str()) else {
            grades.missing.push(record.case_id.clone());
            continue;
        };
        let case = CaseGrade {
            case_id: record.case_id.clone(),
            expected: record.overall,
            expected_subcategory: record.subcategory,
            submitted: submission.overall,
            submitted_subcategory: submission.subcategory,
            verdict_match: record.overall == submission.overall,
            subcategory_match: record.subcategory == submission.subcategory,
        };
        grades.confusion.record(case.expected, case.submitted);
        grades.verdict_matches += usize::from(case.verdict_match);
        grades.exact_matches += usize::from(case.is_exact());
        grades.cases.push(case);
    }

    grades.accuracy = if report.verdicts.is_empty() {
        0.0
    } else {
        grades.exact_matches as f64 / report.verdicts.len() as f64
    };

    tracing::info!(
        graded = grades.cases.len(),
        missing = grades.missing.len(),
        unknown = grades.unknown.len(),
        accuracy = grades.accuracy,
        "grading complete"
    );
    grades
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::VerdictRecord;

    fn record(id: &str, overall: CaseVerdict, subcategory: Option<Subcategory>) -> VerdictRecord {
        VerdictRecord {
            case_id: id.to_string(),
            overall,
            subcategory,
            confidence: 0.9,
            rationale: String::new(),
            per_path: vec![],
            expected: None,
        }
    }

    fn report() -> TriageReport {
        TriageReport {
            verdicts: vec![
                record("a", CaseVerdict::MustFix, None),
                record("b", CaseVerdict::FalsePositiveSanitized, Some(Subcategory::Sanitized2B)),
                record("c", CaseVerdict::FalsePositiveDeadCode, None),
                record("d", CaseVerdict::GoodToFix, None),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn parse_accepts_optional_subcategory() {
        let subs = parse_submissions(
            r#"[{"case_id":"a","overall":"MUST_FIX"},
                {"case_id":"b","overall":"FALSE_POSITIVE_SANITIZED","subcategory":"2B"}]"#,
            "inline",
        )
        .unwrap();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[1].subcategory, Some(Subcategory::Sanitized2B));
    }

    #[test]
    fn parse_error_names_source() {
        let err = parse_submissions("{", "subs.json").unwrap_err();
        assert!(err.to_string().contains("subs.json"));
    }

    #[test]
    fn grades_matches_missing_and_unknown() {
        let subs = vec![
            Submission {
                case_id: "a".into(),
                overall: CaseVerdict::MustFix,
                subcategory: None,
            },
            Submission {
                case_id: "b".into(),
                overall: CaseVerdict::FalsePositiveSanitized,
                subcategory: Some(Subcategory::Sanitized2A),
            },
            Submission {
                case_id: "c".into(),
                overall: CaseVerdict::MustFix,
                subcategory: None,
            },
            Submission {
                case_id: "zzz".into(),
                overall: CaseVerdict::MustFix,
                subcategory: None,
            },
        ];
        let g = grade(&report(), &subs);
        assert_eq!(g.cases.len(), 3);
        assert_eq!(g.missing, vec!["d".to_string()]);
        assert_eq!(g.unknown, vec!["zzz".to_string()]);
        assert_eq!(g.verdict_matches, 2);
        assert_eq!(g.exact_matches, 1);
        assert!((g.accuracy - 0.25).abs() < 1e-9);
        assert_eq!(
            g.confusion,
            Confusion {
                true_positive: 1,
                false_positive: 1,
                true_negative: 1,
                false_negative: 0,
            }
        );
    }

    #[test]
    fn first_duplicate_submission_counts() {
        let subs = vec![
            Submission {
                case_id: "a".into(),
                overall: CaseVerdict::MustFix,
                subcategory: None,
            },
            Submission {
                case_id: "a".into(),
                overall: CaseVerdict::FalsePositive,
                subcategory: None,
            },
        ];
        let g = grade(&report(), &subs);
        assert_eq!(g.cases.len(), 1);
        assert!(g.cases[0].is_exact());
    }

    #[test]
    fn empty_report_has_zero_accuracy() {
        let g = grade(&TriageReport::default(), &[]);
        assert_eq!(g.accuracy, 0.0);
        assert!(g.missing.is_empty());
    }
}
