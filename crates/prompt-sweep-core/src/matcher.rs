//! Glob-based target resolution.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{SweepError, SweepResult};

/// One file matched for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    /// Absolute path used for reading and writing.
    pub path: PathBuf,

    /// Path relative to the sweep base directory, used in status lines.
    pub display: String,
}

/// Resolve include/ignore globs against `base` into an ordered target list.
///
/// A file is kept when its base-relative path matches at least one entry of
/// `patterns` and none of `ignore`, and it is a regular file. Dotfiles (and
/// files under dot directories) are skipped unless a pattern names the
/// leading dot explicitly. `*` does not cross path separators; use `**` to
/// recurse.
///
/// Zero matches is an empty list, not an error. The traversal is sorted by
/// file name, so the order is stable across runs on an unchanged tree and
/// each file appears at most once.
pub fn resolve_targets(
    base: &Path,
    patterns: &[String],
    ignore: &[String],
) -> SweepResult<Vec<FileTarget>> {
    let includes = compile(patterns)?;
    let excludes = compile(ignore)?;

    let options = MatchOptions {
        require_literal_separator: true,
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let base = std::path::absolute(base)?;
    let mut targets = Vec::new();

    for entry in WalkDir::new(&base).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&base) else {
            continue;
        };
        if !includes
            .iter()
            .any(|pattern| pattern.matches_path_with(relative, options))
        {
            continue;
        }
        if excludes
            .iter()
            .any(|pattern| pattern.matches_path_with(relative, options))
        {
            continue;
        }

        targets.push(FileTarget {
            path: entry.path().to_path_buf(),
            display: relative.to_string_lossy().into_owned(),
        });
    }

    debug!(target_count = targets.len(), "targets_resolved");
    Ok(targets)
}

fn compile(patterns: &[String]) -> SweepResult<Vec<Pattern>> {
    patterns
        .iter()
        .map(|raw| {
            Pattern::new(raw).map_err(|source| SweepError::Pattern {
                pattern: raw.clone(),
                source,
            })
        })
        .collect()
}
