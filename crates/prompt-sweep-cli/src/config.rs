//! Invocation settings: JSON config file plus environment overrides.
//!
//! Precedence: environment variables over file values; the API credential
//! comes from the environment only and its absence fails the run before
//! any matching starts.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use prompt_sweep_core::{PromptContext, RunConfig};
use serde::Deserialize;

/// Completion endpoint used when no override is present.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

/// On-disk config schema: the run record plus prompt file locations.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(flatten)]
    run: RunConfig,

    /// Path to the system prompt file.
    #[serde(default = "default_system_prompt")]
    system_prompt: PathBuf,

    /// Path to the user prompt template file.
    #[serde(default = "default_user_prompt")]
    user_prompt: PathBuf,
}

fn default_system_prompt() -> PathBuf {
    PathBuf::from("prompts/system.md")
}

fn default_user_prompt() -> PathBuf {
    PathBuf::from("prompts/user.md")
}

/// Fully resolved settings for one invocation.
#[derive(Debug)]
pub struct Settings {
    pub run: RunConfig,
    pub api_url: String,
    pub api_key: String,
    system_prompt_path: PathBuf,
    user_prompt_path: PathBuf,
}

impl Settings {
    /// Load the JSON config and resolve endpoint and credential from the
    /// environment. `.env` files are honored (silently ignored if missing).
    pub fn load(path: &Path) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let file: ConfigFile = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;

        let mut run = file.run;
        if let Some(model) = env_first(&["PSWEEP_MODEL", "OPENAI_MODEL_NAME"]) {
            run.model = model;
        }

        let api_key = env_first(&["PSWEEP_API_KEY", "OPENAI_API_KEY"]).ok_or_else(|| {
            anyhow!("API credential required. Set PSWEEP_API_KEY or OPENAI_API_KEY")
        })?;
        let api_url = env_first(&["PSWEEP_API_URL", "OPENAI_API_URL"])
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            run,
            api_url,
            api_key,
            system_prompt_path: file.system_prompt,
            user_prompt_path: file.user_prompt,
        })
    }

    /// Read the system and user prompt files named by the config.
    pub fn load_prompts(&self) -> Result<PromptContext> {
        let system_prompt = std::fs::read_to_string(&self.system_prompt_path).with_context(|| {
            format!(
                "failed to read system prompt from {}",
                self.system_prompt_path.display()
            )
        })?;
        let user_prompt_template =
            std::fs::read_to_string(&self.user_prompt_path).with_context(|| {
                format!(
                    "failed to read user prompt from {}",
                    self.user_prompt_path.display()
                )
            })?;

        Ok(PromptContext {
            system_prompt,
            user_prompt_template,
        })
    }
}

fn env_first(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| std::env::var(key).ok())
}
