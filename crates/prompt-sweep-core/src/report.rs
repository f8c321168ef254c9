//! Operator-facing status output and exit-code mapping.
//!
//! Status lines go to stdout; `tracing` carries the diagnostic copies.

use tracing::warn;

use crate::driver::{RunOutcome, RunSummary};
use crate::error::TransformError;
use crate::matcher::FileTarget;

/// Exit code for a completed run, including zero matches and per-file skips.
pub const EXIT_OK: i32 = 0;
/// Exit code for precondition failures and a failed dry run.
pub const EXIT_FAILURE: i32 = 1;

/// Prints one status line per target plus a final summary line.
#[derive(Debug, Default)]
pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    /// The matcher found nothing to do.
    pub fn no_matches(&self) {
        println!("no files matched the configured patterns");
    }

    /// `target` was overwritten with its transformed content.
    pub fn committed(&self, target: &FileTarget) {
        println!("✏️  {} rewritten", target.display);
    }

    /// `target` was skipped; the file on disk is untouched.
    pub fn skipped(&self, target: &FileTarget, err: &TransformError) {
        warn!(file = %target.display, error = %err, "file_skipped");
        println!("⏭️  {} skipped: {err}", target.display);
    }

    /// The transform succeeded but the overwrite failed. Reported with a
    /// distinct message so operators can tell a filesystem problem from a
    /// content problem.
    pub fn write_failed(&self, target: &FileTarget, err: &std::io::Error) {
        warn!(file = %target.display, error = %err, "write_failed");
        println!("⚠️  {} transformed but not written: {err}", target.display);
    }

    /// Dry-run preview: what the first target would become.
    pub fn preview(&self, target: &FileTarget, text: &str) {
        println!("🔍 dry run — {} would become:", target.display);
        println!("{text}");
    }

    /// Final tallies for the run.
    pub fn summary(&self, summary: &RunSummary) {
        println!(
            "done: {} processed, {} rewritten, {} skipped, {} unwritten",
            summary.processed, summary.committed, summary.skipped, summary.write_failed
        );
    }
}

/// Map the driver's terminal condition to the process exit code.
pub fn exit_code(outcome: &RunOutcome) -> i32 {
    match outcome {
        RunOutcome::Completed(_) => EXIT_OK,
        RunOutcome::Aborted { .. } => EXIT_FAILURE,
    }
}
