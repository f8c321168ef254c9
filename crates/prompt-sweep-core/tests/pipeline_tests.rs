//! End-to-end driver tests over tempdir fixtures with a scripted
//! stand-in for the completion service.

use std::collections::VecDeque;
use std::fs;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use prompt_sweep_core::{
    resolve_targets, run_sweep, PromptContext, Reporter, RunConfig, RunOutcome, RunSummary,
    TransformError, Transformer,
};
use tempfile::TempDir;

enum StubReply {
    Text(String),
    RequestError(String),
    Empty,
}

/// Scripted transformer that records every user prompt it receives.
#[derive(Default)]
struct StubTransformer {
    replies: Mutex<VecDeque<StubReply>>,
    calls: Mutex<Vec<String>>,
}

impl StubTransformer {
    fn with_replies(replies: Vec<StubReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transformer for StubTransformer {
    async fn transform(
        &self,
        _model: &str,
        _system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, TransformError> {
        self.calls.lock().unwrap().push(user_prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(StubReply::Text(text)) => Ok(text),
            Some(StubReply::RequestError(message)) => Err(TransformError::Request(message)),
            Some(StubReply::Empty) => Err(TransformError::EmptyResponse),
            None => Err(TransformError::Request("no scripted reply left".to_string())),
        }
    }
}

fn config(dry_run: bool, interval_millis: u64) -> RunConfig {
    RunConfig {
        patterns: vec!["*.md".to_string()],
        ignore: Vec::new(),
        dry_run,
        model: "test-model".to_string(),
        interval_millis,
    }
}

fn prompts() -> PromptContext {
    PromptContext {
        system_prompt: "You rewrite files.".to_string(),
        user_prompt_template: "Rewrite the following file:\n{{ file_content }}".to_string(),
    }
}

fn write_files(dir: &TempDir, files: &[(&str, &str)]) {
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
}

#[tokio::test]
async fn rewrites_every_target_in_order_with_pacing() {
    let dir = TempDir::new().unwrap();
    write_files(&dir, &[("a.md", "A1"), ("b.md", "B1"), ("c.md", "C1")]);

    let targets = resolve_targets(dir.path(), &["*.md".to_string()], &[]).unwrap();
    let stub = StubTransformer::with_replies(vec![
        StubReply::Text("A2".to_string()),
        StubReply::Text("B2".to_string()),
        StubReply::Text("C2".to_string()),
    ]);

    let started = Instant::now();
    let outcome = run_sweep(&targets, &config(false, 40), &prompts(), &stub, &Reporter::new()).await;
    let elapsed = started.elapsed();

    match outcome {
        RunOutcome::Completed(summary) => assert_eq!(
            summary,
            RunSummary {
                processed: 3,
                committed: 3,
                skipped: 0,
                write_failed: 0,
            }
        ),
        RunOutcome::Aborted { reason } => panic!("unexpected abort: {reason}"),
    }

    assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), "A2");
    assert_eq!(fs::read_to_string(dir.path().join("b.md")).unwrap(), "B2");
    assert_eq!(fs::read_to_string(dir.path().join("c.md")).unwrap(), "C2");

    // Two pacing delays between three commits, none after the last.
    assert!(
        elapsed >= Duration::from_millis(80),
        "expected two pacing delays, elapsed only {elapsed:?}"
    );

    // Prompts were rendered from each file's content, in matcher order.
    let calls = stub.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].contains("A1"));
    assert!(calls[1].contains("B1"));
    assert!(calls[2].contains("C1"));
}

#[tokio::test]
async fn request_failure_skips_without_pacing_and_continues() {
    let dir = TempDir::new().unwrap();
    write_files(&dir, &[("a.md", "A1"), ("b.md", "B1")]);

    let targets = resolve_targets(dir.path(), &["*.md".to_string()], &[]).unwrap();
    let stub = StubTransformer::with_replies(vec![
        StubReply::RequestError("boom".to_string()),
        StubReply::Text("B2".to_string()),
    ]);

    // An interval this long would hang the test if a skip triggered pacing.
    let started = Instant::now();
    let outcome =
        run_sweep(&targets, &config(false, 60_000), &prompts(), &stub, &Reporter::new()).await;
    assert!(started.elapsed() < Duration::from_secs(5));

    match outcome {
        RunOutcome::Completed(summary) => assert_eq!(
            summary,
            RunSummary {
                processed: 2,
                committed: 1,
                skipped: 1,
                write_failed: 0,
            }
        ),
        RunOutcome::Aborted { reason } => panic!("unexpected abort: {reason}"),
    }

    assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), "A1");
    assert_eq!(fs::read_to_string(dir.path().join("b.md")).unwrap(), "B2");
}

#[tokio::test]
async fn read_failure_skips_file_without_issuing_a_request() {
    let dir = TempDir::new().unwrap();
    write_files(&dir, &[("a.md", "A1"), ("b.md", "B1"), ("c.md", "C1")]);

    let targets = resolve_targets(dir.path(), &["*.md".to_string()], &[]).unwrap();
    fs::remove_file(dir.path().join("b.md")).unwrap();

    let stub = StubTransformer::with_replies(vec![
        StubReply::Text("A2".to_string()),
        StubReply::Text("C2".to_string()),
    ]);

    let outcome = run_sweep(&targets, &config(false, 0), &prompts(), &stub, &Reporter::new()).await;

    match outcome {
        RunOutcome::Completed(summary) => assert_eq!(
            summary,
            RunSummary {
                processed: 3,
                committed: 2,
                skipped: 1,
                write_failed: 0,
            }
        ),
        RunOutcome::Aborted { reason } => panic!("unexpected abort: {reason}"),
    }

    // The unreadable file never reached the service.
    let calls = stub.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].contains("A1"));
    assert!(calls[1].contains("C1"));
}

#[tokio::test]
async fn empty_response_is_a_skip_in_a_normal_run() {
    let dir = TempDir::new().unwrap();
    write_files(&dir, &[("a.md", "A1"), ("b.md", "B1")]);

    let targets = resolve_targets(dir.path(), &["*.md".to_string()], &[]).unwrap();
    let stub = StubTransformer::with_replies(vec![
        StubReply::Empty,
        StubReply::Text("B2".to_string()),
    ]);

    let outcome = run_sweep(&targets, &config(false, 0), &prompts(), &stub, &Reporter::new()).await;

    match outcome {
        RunOutcome::Completed(summary) => {
            assert_eq!(summary.skipped, 1);
            assert_eq!(summary.committed, 1);
        }
        RunOutcome::Aborted { reason } => panic!("unexpected abort: {reason}"),
    }
    assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), "A1");
}

#[tokio::test]
async fn dry_run_attempts_only_the_first_target_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    write_files(&dir, &[("a.md", "A1"), ("b.md", "B1")]);

    let targets = resolve_targets(dir.path(), &["*.md".to_string()], &[]).unwrap();
    let stub = StubTransformer::with_replies(vec![StubReply::Text("PREVIEW".to_string())]);

    let outcome = run_sweep(&targets, &config(true, 0), &prompts(), &stub, &Reporter::new()).await;

    match outcome {
        RunOutcome::Completed(summary) => assert_eq!(
            summary,
            RunSummary {
                processed: 1,
                committed: 0,
                skipped: 0,
                write_failed: 0,
            }
        ),
        RunOutcome::Aborted { reason } => panic!("unexpected abort: {reason}"),
    }

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("A1"));

    // On-disk content is untouched in dry-run mode.
    assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), "A1");
    assert_eq!(fs::read_to_string(dir.path().join("b.md")).unwrap(), "B1");
}

#[tokio::test]
async fn dry_run_failure_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    write_files(&dir, &[("a.md", "A1"), ("b.md", "B1")]);

    let targets = resolve_targets(dir.path(), &["*.md".to_string()], &[]).unwrap();
    let stub = StubTransformer::with_replies(vec![StubReply::Empty]);

    let outcome = run_sweep(&targets, &config(true, 0), &prompts(), &stub, &Reporter::new()).await;

    assert!(matches!(outcome, RunOutcome::Aborted { .. }));
    assert_eq!(stub.calls().len(), 1);
    assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), "A1");
}

#[tokio::test]
async fn zero_targets_completes_without_requests() {
    let dir = TempDir::new().unwrap();
    write_files(&dir, &[("notes.txt", "not matched")]);

    let targets = resolve_targets(dir.path(), &["*.md".to_string()], &[]).unwrap();
    assert!(targets.is_empty());

    let stub = StubTransformer::default();
    let outcome = run_sweep(&targets, &config(false, 0), &prompts(), &stub, &Reporter::new()).await;

    match outcome {
        RunOutcome::Completed(summary) => assert_eq!(summary, RunSummary::default()),
        RunOutcome::Aborted { reason } => panic!("unexpected abort: {reason}"),
    }
    assert!(stub.calls().is_empty());
}
