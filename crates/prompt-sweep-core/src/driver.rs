//! The sequential sweep pipeline.
//!
//! Each matched file moves through read → render → request → decide →
//! commit-or-skip, one file at a time. Successive committed files are paced
//! by the configured interval to respect service rate limits; a skipped
//! file continues immediately.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::client::Transformer;
use crate::config::{PromptContext, RunConfig};
use crate::error::TransformError;
use crate::matcher::FileTarget;
use crate::report::Reporter;
use crate::template;

/// Per-run tallies accumulated by the driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files attempted.
    pub processed: usize,
    /// Files overwritten with transformed content.
    pub committed: usize,
    /// Files skipped after a read or request failure.
    pub skipped: usize,
    /// Transforms that succeeded but could not be persisted.
    pub write_failed: usize,
}

/// Terminal condition of a whole run.
///
/// The driver only ever returns this; the entry point alone maps it to a
/// process exit code.
#[derive(Debug)]
pub enum RunOutcome {
    /// The run reached its natural end, possibly with per-file skips.
    Completed(RunSummary),
    /// Dry-run mode and the single attempted file produced no output.
    Aborted { reason: String },
}

/// Sweep every target through the transform pipeline, in order.
///
/// Zero targets completes immediately. In dry-run mode exactly one file is
/// attempted: its transform is printed instead of written, and a failure
/// aborts the run. In a normal run per-file failures are reported and the
/// sweep continues with the next target.
pub async fn run_sweep<T: Transformer>(
    targets: &[FileTarget],
    config: &RunConfig,
    prompts: &PromptContext,
    transformer: &T,
    reporter: &Reporter,
) -> RunOutcome {
    if targets.is_empty() {
        reporter.no_matches();
        return RunOutcome::Completed(RunSummary::default());
    }

    debug!(
        target_count = targets.len(),
        dry_run = config.dry_run,
        "sweep_start"
    );

    if config.dry_run {
        return preview_first(&targets[0], config, prompts, transformer, reporter).await;
    }

    let mut summary = RunSummary::default();
    let last = targets.len() - 1;

    for (index, target) in targets.iter().enumerate() {
        summary.processed += 1;

        let text = match transform_target(target, config, prompts, transformer).await {
            Ok(text) => text,
            Err(err) => {
                summary.skipped += 1;
                reporter.skipped(target, &err);
                continue;
            }
        };

        if let Err(err) = std::fs::write(&target.path, &text) {
            summary.write_failed += 1;
            reporter.write_failed(target, &err);
            continue;
        }
        summary.committed += 1;
        reporter.committed(target);

        // Only a committed file arms the pacing delay; the last file ends
        // the run without waiting.
        if index < last && config.interval_millis > 0 {
            debug!(millis = config.interval_millis, "pacing_delay");
            sleep(Duration::from_millis(config.interval_millis)).await;
        }
    }

    debug!(
        processed = summary.processed,
        committed = summary.committed,
        skipped = summary.skipped,
        write_failed = summary.write_failed,
        "sweep_complete"
    );
    reporter.summary(&summary);
    RunOutcome::Completed(summary)
}

/// Dry-run branch: attempt only the first target and never write.
async fn preview_first<T: Transformer>(
    target: &FileTarget,
    config: &RunConfig,
    prompts: &PromptContext,
    transformer: &T,
    reporter: &Reporter,
) -> RunOutcome {
    match transform_target(target, config, prompts, transformer).await {
        Ok(text) => {
            reporter.preview(target, &text);
            let summary = RunSummary {
                processed: 1,
                ..RunSummary::default()
            };
            reporter.summary(&summary);
            RunOutcome::Completed(summary)
        }
        Err(err) => {
            reporter.skipped(target, &err);
            RunOutcome::Aborted {
                reason: format!("dry run failed for {}: {err}", target.display),
            }
        }
    }
}

/// Read one file, render the user prompt, and perform the exchange.
async fn transform_target<T: Transformer>(
    target: &FileTarget,
    config: &RunConfig,
    prompts: &PromptContext,
    transformer: &T,
) -> Result<String, TransformError> {
    let content = std::fs::read_to_string(&target.path)?;
    let user_prompt = template::render(&prompts.user_prompt_template, &content);
    transformer
        .transform(&config.model, &prompts.system_prompt, &user_prompt)
        .await
}
