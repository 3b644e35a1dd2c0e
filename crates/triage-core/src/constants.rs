//! Shared constants for the triage model.

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the built-in sanitizer/guard registry. Bumped whenever a
/// built-in entry is added, removed or re-tiered.
pub const REGISTRY_VERSION: u32 = 1;

/// Minimum number of distinct guard categories for defense-in-depth.
pub const DEFENSE_IN_DEPTH_MIN_LAYERS: usize = 3;

// ---- Confidence table ----

/// MUST_FIX base confidence.
pub const CONFIDENCE_MUST_FIX: f64 = 0.90;

/// Bonus applied when no guard exists anywhere in the case.
pub const CONFIDENCE_NO_GUARD_BONUS: f64 = 0.05;

/// Upper bound for MUST_FIX confidence.
pub const CONFIDENCE_MUST_FIX_CAP: f64 = 0.95;

/// GOOD_TO_FIX base confidence.
pub const CONFIDENCE_GOOD_TO_FIX: f64 = 0.75;

/// Upper bound for GOOD_TO_FIX confidence.
pub const CONFIDENCE_GOOD_TO_FIX_CAP: f64 = 0.80;

/// FALSE_POSITIVE_DEAD_CODE confidence.
pub const CONFIDENCE_DEAD_CODE: f64 = 0.95;

/// FALSE_POSITIVE_SANITIZED confidence.
pub const CONFIDENCE_SANITIZED: f64 = 0.90;

/// FALSE_POSITIVE_PROTECTED confidence for a single access-control guard (3A).
pub const CONFIDENCE_PROTECTED_SINGLE: f64 = 0.85;

/// FALSE_POSITIVE_PROTECTED confidence under defense-in-depth (3B).
pub const CONFIDENCE_PROTECTED_LAYERED: f64 = 0.90;

/// Mixed FALSE_POSITIVE confidence.
pub const CONFIDENCE_MIXED: f64 = 0.85;

// ---- Defaults ----

/// Default corpus description path, relative to the project root.
pub const DEFAULT_CORPUS_PATH: &str = "corpus/python_banking.toml";

/// Default report format.
pub const DEFAULT_REPORT_FORMAT: &str = "json";

/// Accepted report formats.
pub const REPORT_FORMATS: [&str; 2] = ["json", "pretty"];

/// Default number of classification threads (0 = rayon default).
pub const DEFAULT_THREADS: usize = 0;

/// Upper bound accepted for `classify.threads`.
pub const MAX_THREADS: usize = 256;

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "triage.toml";

/// Environment variable read by `init_tracing`.
pub const LOG_ENV_VAR: &str = "TRIAGE_LOG";

/// Filter used when `TRIAGE_LOG` is absent or invalid.
pub const DEFAULT_LOG_FILTER: &str = "triage=info";
