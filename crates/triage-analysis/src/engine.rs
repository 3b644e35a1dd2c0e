//! Classification engine: corpus in, report out.
//!
//! Cases are independent and the corpus is read-only, so classification
//! fans out over rayon. Output order always equals corpus order.

use std::path::{Path as FsPath, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use triage_core::config::{ClassifyConfig, TriageConfig};
use triage_core::errors::{ClassifyError, PipelineError, PipelineResult};

use crate::classifier::ClassifierRegistry;
use crate::corpus::Corpus;
use crate::report::TriageReport;
use crate::resolver::{resolve_case, CaseResolution};

/// Resolve every case of the corpus.
pub fn classify_corpus(
    corpus: &Corpus,
    config: &ClassifyConfig,
) -> Result<Vec<CaseResolution>, ClassifyError> {
    let cases = corpus.cases();
    if !config.effective_parallel() {
        return Ok(cases.iter().map(resolve_case).collect());
    }

    match config.effective_threads() {
        0 => Ok(cases.par_iter().map(resolve_case).collect()),
        threads => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("triage-classify-{i}"))
                .build()
                .map_err(|e| ClassifyError::ThreadPool(e.to_string()))?;
            Ok(pool.install(|| cases.par_iter().map(resolve_case).collect()))
        }
    }
}

/// Build the registry a run classifies with: built-ins plus the optional
/// extension file.
pub fn build_registry(
    config: &TriageConfig,
    root: &FsPath,
) -> Result<ClassifierRegistry, PipelineError> {
    let mut registry = ClassifierRegistry::builtin();
    if let Some(ref path) = config.corpus.registry_path {
        registry.extend_from_file(&resolve(root, path))?;
    }
    Ok(registry)
}

/// Load, classify and report. Rejected cases become non-fatal errors on the
/// result; only an unreadable corpus, bad registry or thread-pool failure
/// aborts.
pub fn run_pipeline(
    config: &TriageConfig,
    root: &FsPath,
) -> Result<PipelineResult<TriageReport>, PipelineError> {
    let start = Instant::now();
    let registry = build_registry(config, root)?;
    let corpus = Corpus::load(&resolve(root, &config.corpus.effective_path()), &registry)?;
    let resolutions = classify_corpus(&corpus, &config.classify)?;

    let report = TriageReport::new(
        &corpus,
        resolutions,
        registry.version(),
        config.report.effective_include_rejections(),
    );
    tracing::info!(
        corpus = corpus.source(),
        cases = report.summary.cases,
        rejected = report.summary.rejected,
        true_positives = report.summary.true_positives,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "classification complete"
    );

    let mut result = PipelineResult::new(report);
    for rejection in corpus.rejections() {
        result.add_error(rejection.error.clone());
    }
    Ok(result)
}

fn resolve(root: &FsPath, path: &FsPath) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
