//! High-level orchestration over the reader, aligner and checker crates.
//! Intentionally thin: exposes the entry points the CLI calls.

use std::path::Path;

pub use qacheck_align::AlignMode;
pub use qacheck_core::{
    Glossary, LengthRatioLimits, QaError, QaIssue, Result, RunConfig, RunStats, SegmentList,
    SegmentPair, Side,
};

mod batch;

pub use batch::{check_batch, BatchOptions, BatchOutcome, FileOutcome, SkippedInput};

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub limits: LengthRatioLimits,
    pub align: AlignMode,
    pub run_config: Option<RunConfig>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckOutcome {
    pub pairs: Vec<SegmentPair>,
    pub issues: Vec<QaIssue>,
    pub stats: RunStats,
}

/// Read both sides and align them. Without a target every pair gets an
/// empty target.
pub fn align_files(source: &Path, target: Option<&Path>, mode: AlignMode) -> Result<Vec<SegmentPair>> {
    let src = qacheck_import::read_segments(source, Side::Source)?;
    let tgt = match target {
        Some(p) => qacheck_import::read_segments(p, Side::Target)?,
        None => SegmentList::default(),
    };
    Ok(qacheck_align::align(mode, &src, &tgt))
}

pub fn check_pairs(
    pairs: Vec<SegmentPair>,
    glossary: Option<&Glossary>,
    opts: &CheckOptions,
) -> CheckOutcome {
    let (issues, stats) =
        qacheck_validate::run_checks(&pairs, glossary, opts.run_config.as_ref(), opts.limits);
    CheckOutcome {
        pairs,
        issues,
        stats,
    }
}

pub fn check_files(
    source: &Path,
    target: Option<&Path>,
    glossary: Option<&Glossary>,
    opts: &CheckOptions,
) -> Result<CheckOutcome> {
    let pairs = align_files(source, target, opts.align)?;
    let out = check_pairs(pairs, glossary, opts);
    tracing::info!(
        event = "check_files",
        source = %source.display(),
        target = ?target.map(|p| p.display().to_string()),
        total = out.stats.total,
        issues = out.stats.issues
    );
    Ok(out)
}

/// Check a file that carries both sides (table, JSON pair list, PO).
pub fn check_bilingual(
    path: &Path,
    glossary: Option<&Glossary>,
    opts: &CheckOptions,
) -> Result<CheckOutcome> {
    let pairs = qacheck_import::read_pairs(path)?;
    let out = check_pairs(pairs, glossary, opts);
    tracing::info!(
        event = "check_bilingual",
        path = %path.display(),
        total = out.stats.total,
        issues = out.stats.issues
    );
    Ok(out)
}
