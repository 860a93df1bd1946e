// src/batch/mod.rs
// =============================================================================
// This module drives a batch run from the first URL to the summary.
//
// Submodules:
// - driver: the per-URL loop
// - rate: the fixed pause between requests
// - report: terminal output (progress lines, summary)
// - summary: counters and per-URL outcomes
// =============================================================================

mod driver;
pub(crate) mod rate;
mod report;
mod summary;

pub use driver::BatchDriver;
pub use rate::{FixedIntervalGate, Sleeper, DEFAULT_DELAY};
pub use report::{ConsoleReporter, Reporter};
pub use summary::{BatchReport, RunSummary};
