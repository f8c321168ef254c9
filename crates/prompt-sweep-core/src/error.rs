//! Error types for the sweep pipeline.

use thiserror::Error;

/// Result type alias for fatal pipeline errors.
pub type SweepResult<T> = Result<T, SweepError>;

/// Fatal precondition failures. Any of these aborts the whole run before a
/// single file is touched.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The run configuration is unusable.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// A glob pattern failed to parse.
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// Directory traversal failed while resolving targets.
    #[error("file matching failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// I/O error while preparing the run.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-file failures. Logged and skipped in a normal run; fatal in dry-run
/// mode, where the single attempted file decides the run's disposition.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The source file could not be read before the request was built.
    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),

    /// The exchange with the completion service could not complete.
    #[error("request failed: {0}")]
    Request(String),

    /// The exchange completed but returned no usable completion.
    #[error("completion response contained no choices")]
    EmptyResponse,
}
