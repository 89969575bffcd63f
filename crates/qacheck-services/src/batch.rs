use std::path::{Path, PathBuf};

use qacheck_core::{Glossary, QaError, Result, RunStats};
use qacheck_domain::{BatchFileReport, BatchReport, IssueRecord, SkippedFile, SCHEMA_VERSION};
use qacheck_import::InputFormat;
use walkdir::WalkDir;

use crate::{check_bilingual, CheckOptions, CheckOutcome};

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub recursive: bool,
    /// Files never treated as inputs (e.g. the glossary itself).
    pub exclude: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub outcome: CheckOutcome,
}

#[derive(Debug, Clone)]
pub struct SkippedInput {
    pub path: PathBuf,
    pub reason: String,
    /// True when the file was skipped only because of its format.
    pub unsupported: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub files: Vec<FileOutcome>,
    pub skipped: Vec<SkippedInput>,
}

impl BatchOutcome {
    pub fn totals(&self) -> RunStats {
        self.files.iter().fold(RunStats::default(), |acc, f| RunStats {
            total: acc.total + f.outcome.stats.total,
            issues: acc.issues + f.outcome.stats.issues,
        })
    }

    pub fn to_report(&self) -> BatchReport {
        BatchReport {
            schema_version: SCHEMA_VERSION,
            files: self
                .files
                .iter()
                .map(|f| BatchFileReport {
                    path: f.path.display().to_string(),
                    stats: f.outcome.stats.into(),
                    issues: f.outcome.issues.iter().map(IssueRecord::from).collect(),
                })
                .collect(),
            skipped: self
                .skipped
                .iter()
                .map(|s| SkippedFile {
                    path: s.path.display().to_string(),
                    reason: s.reason.clone(),
                })
                .collect(),
            totals: self.totals().into(),
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Check every bilingual file under `root` in file-name order. A file that
/// cannot be read is recorded as skipped and the walk goes on.
pub fn check_batch(
    root: &Path,
    glossary: Option<&Glossary>,
    opts: &CheckOptions,
    batch: &BatchOptions,
) -> Result<BatchOutcome> {
    if !root.is_dir() {
        return Err(QaError::Other(format!("{} is not a directory", root.display())).into());
    }
    let mut walker = WalkDir::new(root).follow_links(true).sort_by_file_name();
    if !batch.recursive {
        walker = walker.max_depth(1);
    }

    let mut out = BatchOutcome::default();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                tracing::warn!(event = "batch_walk_failed", path = %path.display(), error = %e);
                out.skipped.push(SkippedInput {
                    path,
                    reason: e.to_string(),
                    unsupported: false,
                });
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || is_hidden(path) {
            continue;
        }
        if batch.exclude.iter().any(|x| same_file(x, path)) {
            tracing::debug!(event = "batch_excluded", path = %path.display());
            continue;
        }

        match InputFormat::from_path(path) {
            Ok(f) if f.is_bilingual() => {}
            Ok(_) => {
                out.skipped.push(SkippedInput {
                    path: path.to_path_buf(),
                    reason: "holds a single side; pair it with --source/--target".into(),
                    unsupported: true,
                });
                continue;
            }
            Err(e) => {
                tracing::warn!(event = "batch_unsupported", path = %path.display());
                out.skipped.push(SkippedInput {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                    unsupported: true,
                });
                continue;
            }
        }

        match check_bilingual(path, glossary, opts) {
            Ok(outcome) => out.files.push(FileOutcome {
                path: path.to_path_buf(),
                outcome,
            }),
            Err(e) => {
                tracing::warn!(event = "batch_file_failed", path = %path.display(), error = %e);
                out.skipped.push(SkippedInput {
                    path: path.to_path_buf(),
                    reason: format!("{e:#}"),
                    unsupported: e.downcast_ref::<QaError>().is_some_and(|q| {
                        matches!(q, QaError::UnsupportedFormat { .. })
                    }),
                });
            }
        }
    }

    let totals = out.totals();
    tracing::info!(
        event = "batch_done",
        root = %root.display(),
        files = out.files.len(),
        skipped = out.skipped.len(),
        total = totals.total,
        issues = totals.issues
    );
    Ok(out)
}
