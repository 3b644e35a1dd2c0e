//! Verdict report: one record per case, plus rejections and summary counts.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};
use triage_core::config::ReportFormat;
use triage_core::constants::VERSION;
use triage_core::errors::ReportError;

use crate::corpus::{CaseRejection, Corpus};
use crate::model::{CaseVerdict, Expectation, PathVerdict, SourceLocation, Subcategory};
use crate::resolver::CaseResolution;

/// Per-path detail carried in a verdict record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    pub path_id: String,
    pub verdict: PathVerdict,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub weakly_mitigated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<Subcategory>,
    pub evidence: Vec<SourceLocation>,
    pub rationale: String,
}

/// The record emitted for each case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictRecord {
    pub case_id: String,
    pub overall: CaseVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<Subcategory>,
    pub confidence: f64,
    pub rationale: String,
    pub per_path: Vec<PathRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Expectation>,
}

impl VerdictRecord {
    pub fn new(resolution: CaseResolution, expected: Option<Expectation>) -> Self {
        Self {
            case_id: resolution.case_id,
            overall: resolution.overall,
            subcategory: resolution.subcategory,
            confidence: resolution.confidence,
            rationale: resolution.rationale,
            per_path: resolution
                .paths
                .into_iter()
                .map(|p| PathRecord {
                    path_id: p.path_id,
                    verdict: p.verdict,
                    weakly_mitigated: p.weakly_mitigated,
                    subcategory: p.subcategory,
                    evidence: p.evidence,
                    rationale: p.rationale,
                })
                .collect(),
            expected,
        }
    }

    /// Whether the computed verdict disagrees with the narrated ground truth.
    pub fn mismatch(&self) -> Option<Mismatch> {
        let expected = self.expected?;
        if expected.verdict == self.overall && expected.subcategory == self.subcategory {
            return None;
        }
        Some(Mismatch {
            case_id: self.case_id.clone(),
            expected,
            actual: Expectation {
                verdict: self.overall,
                subcategory: self.subcategory,
            },
        })
    }
}

/// A case whose computed verdict differs from its expectation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub case_id: String,
    pub expected: Expectation,
    pub actual: Expectation,
}

/// Verdict counts for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub cases: usize,
    pub rejected: usize,
    pub true_positives: usize,
    pub false_positives: usize,
    pub by_verdict: BTreeMap<CaseVerdict, usize>,
}

impl Summary {
    fn of(verdicts: &[VerdictRecord], rejected: usize) -> Self {
        let mut by_verdict: BTreeMap<CaseVerdict, usize> =
            CaseVerdict::all().iter().map(|v| (*v, 0)).collect();
        for record in verdicts {
            *by_verdict.entry(record.overall).or_default() += 1;
        }
        let true_positives = verdicts
            .iter()
            .filter(|r| r.overall.is_true_positive())
            .count();
        Self {
            cases: verdicts.len(),
            rejected,
            true_positives,
            false_positives: verdicts.len() - true_positives,
            by_verdict,
        }
    }
}

/// Append-only output of a classification run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TriageReport {
    pub tool_version: String,
    pub registry_version: u32,
    pub corpus: String,
    pub verdicts: Vec<VerdictRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejections: Vec<CaseRejection>,
    pub summary: Summary,
}

impl TriageReport {
    /// Pair resolutions (in corpus order) with their cases' expectations.
    pub fn new(
        corpus: &Corpus,
        resolutions: Vec<CaseResolution>,
        registry_version: u32,
        include_rejections: bool,
    ) -> Self {
        let verdicts: Vec<VerdictRecord> = resolutions
            .into_iter()
            .map(|r| {
                let expected = corpus.get(&r.case_id).and_then(|c| c.expected);
                VerdictRecord::new(r, expected)
            })
            .collect();
        let summary = Summary::of(&verdicts, corpus.rejections().len());
        let rejections = if include_rejections {
            corpus.rejections().to_vec()
        } else {
            Vec::new()
        };

        Self {
            tool_version: VERSION.to_string(),
            registry_version,
            corpus: corpus.source().to_string(),
            verdicts,
            rejections,
            summary,
        }
    }

    pub fn verdict(&self, case_id: &str) -> Option<&VerdictRecord> {
        self.verdicts.iter().find(|v| v.case_id == case_id)
    }

    /// Cases whose computed verdict disagrees with their expectation.
    pub fn mismatches(&self) -> Vec<Mismatch> {
        self.verdicts.iter().filter_map(VerdictRecord::mismatch).collect()
    }

    pub fn render(&self, format: ReportFormat) -> Result<String, ReportError> {
        let rendered = match format {
            ReportFormat::Json => serde_json::to_string(self),
            ReportFormat::Pretty => serde_json::to_string_pretty(self),
        };
        rendered.map_err(|e| ReportError::Serialize(e.to_string()))
    }

    /// Write the report to `output`, or stdout when `None`.
    pub fn write(&self, format: ReportFormat, output: Option<&FsPath>) -> Result<(), ReportError> {
        let mut rendered = self.render(format)?;
        rendered.push('\n');
        match output {
            Some(path) => std::fs::write(path, rendered).map_err(|e| ReportError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
            None => std::io::stdout()
                .lock()
                .write_all(rendered.as_bytes())
                .map_err(|e| ReportError::Io {
                    path: "<stdout>".to_string(),
                    message: e.to_string(),
                }),
        }
    }
}
