//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::{DEFAULT_LOG_FILTER, LOG_ENV_VAR};

static INIT: Once = Once::new();

/// Initialize the triage tracing/logging system.
///
/// Reads the `TRIAGE_LOG` environment variable for per-module log levels.
/// Format: `TRIAGE_LOG=triage_analysis::corpus=debug,triage_analysis::engine=info`
///
/// Falls back to `triage=info` if `TRIAGE_LOG` is not set or is invalid.
/// Output goes to stderr so that reports written to stdout stay parseable.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        // `try_init` so an embedding process that already owns the global
        // subscriber keeps it.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
