//! Run configuration and shared prompt context.

use serde::Deserialize;

use crate::error::{SweepError, SweepResult};

/// Model requested when the configuration names none.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Pacing interval applied when the configuration names none.
pub const DEFAULT_INTERVAL_MILLIS: u64 = 1000;

/// Immutable configuration for a single sweep run.
///
/// Constructed once before processing starts and shared read-only with the
/// driver for the run's lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Glob patterns selecting the files to process. Must be non-empty.
    pub patterns: Vec<String>,

    /// Glob patterns excluding files from processing.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Preview the first file's transform on stdout instead of writing.
    #[serde(default)]
    pub dry_run: bool,

    /// Model identifier sent with every completion request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Milliseconds to wait between successive committed files.
    #[serde(default = "default_interval_millis")]
    pub interval_millis: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_interval_millis() -> u64 {
    DEFAULT_INTERVAL_MILLIS
}

impl RunConfig {
    /// Check the invariants serde defaults cannot express.
    pub fn validate(&self) -> SweepResult<()> {
        if self.patterns.is_empty() {
            return Err(SweepError::Config {
                message: "`patterns` must contain at least one glob".to_string(),
            });
        }
        Ok(())
    }
}

/// System and user prompt pair, loaded once and shared across all files.
#[derive(Debug, Clone)]
pub struct PromptContext {
    /// Sent as the system message of every exchange.
    pub system_prompt: String,

    /// Rendered per file; contains the content placeholder token.
    pub user_prompt_template: String,
}
