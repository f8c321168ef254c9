//! prompt-sweep CLI — rewrite matched files through a completion service.
//!
//! Reads a JSON run configuration describing glob patterns and pacing,
//! loads a system/user prompt pair, and sweeps every matched file through
//! the configured model, one file at a time.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use prompt_sweep_core::{
    report, resolve_targets, run_sweep, CompletionClient, Reporter, RunOutcome,
};
use tracing::Level;

mod config;

use config::Settings;

/// Sweep matched files through a chat-completion model, overwriting each
/// file with the returned text.
#[derive(Parser, Debug)]
#[command(
    name = "psweep",
    author,
    version,
    about = "Rewrite matched files through a chat-completion model",
    long_about = None
)]
struct Cli {
    /// Path to the JSON run configuration.
    #[arg(default_value = "psweep.json")]
    config: PathBuf,

    /// Preview the first file's transform without writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap renders its own message; usage problems exit 1 while
            // --help/--version exit 0.
            let code = if err.use_stderr() {
                report::EXIT_FAILURE
            } else {
                report::EXIT_OK
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let code = match run(cli).await {
        Ok(outcome) => {
            if let RunOutcome::Aborted { reason } = &outcome {
                eprintln!("sweep aborted: {reason}");
            }
            report::exit_code(&outcome)
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            report::EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

/// Resolve preconditions in order — credentials before any matching — then
/// hand the target list to the driver. Only `main` decides the exit code.
async fn run(cli: Cli) -> Result<RunOutcome> {
    let settings = Settings::load(&cli.config)?;

    let mut run_config = settings.run.clone();
    if cli.dry_run {
        run_config.dry_run = true;
    }
    run_config.validate()?;

    let prompts = settings.load_prompts()?;
    let client = CompletionClient::new(&settings.api_url, &settings.api_key)?;

    let base = std::env::current_dir().context("cannot determine working directory")?;
    let targets = resolve_targets(&base, &run_config.patterns, &run_config.ignore)?;

    Ok(run_sweep(&targets, &run_config, &prompts, &client, &Reporter::new()).await)
}
