//! Core infrastructure for the triage workspace.
//!
//! Errors, configuration, tracing, constants and shared collection types.
//! Contains no classification logic; `triage-analysis` builds on top of it.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;
