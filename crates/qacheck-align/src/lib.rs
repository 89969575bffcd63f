//! Segment pair builder.
//!
//! Two strategies live behind [`Aligner`]: [`Positional`] for documents that
//! only yield ordered text, and [`ByIdentifier`] for tabular inputs whose rows
//! already carry ids. [`AlignMode`] chooses between them from the shape of the
//! inputs, never from file names.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use qacheck_core::{QaError, Segment, SegmentList, SegmentPair};

/// Turns two independently read segment lists into ordered pairs.
pub trait Aligner: Send + Sync {
    fn name(&self) -> &'static str;
    fn align(&self, source: &[Segment], target: &[Segment]) -> Vec<SegmentPair>;
}

/// Pairs the i-th source with the i-th target. Ids are `1..=max(len)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Positional;

impl Aligner for Positional {
    fn name(&self) -> &'static str {
        "position"
    }

    fn align(&self, source: &[Segment], target: &[Segment]) -> Vec<SegmentPair> {
        let len = source.len().max(target.len());
        (0..len)
            .map(|i| SegmentPair {
                id: (i + 1).to_string(),
                source: source.get(i).map(|s| s.text.clone()).unwrap_or_default(),
                target: target.get(i).map(|s| s.text.clone()).unwrap_or_default(),
            })
            .collect()
    }
}

/// Merges by id. Segments without an id get their 1-based position within
/// their own list. For repeated ids the last segment wins, while the id keeps
/// the slot of its first appearance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByIdentifier;

struct IdTable<'a> {
    order: Vec<String>,
    texts: HashMap<String, &'a str>,
}

impl<'a> IdTable<'a> {
    fn build(segments: &'a [Segment]) -> Self {
        let mut order = Vec::with_capacity(segments.len());
        let mut texts = HashMap::with_capacity(segments.len());
        for (i, seg) in segments.iter().enumerate() {
            let id = match seg.id.as_deref() {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => (i + 1).to_string(),
            };
            if texts.insert(id.clone(), seg.text.as_str()).is_none() {
                order.push(id);
            }
        }
        Self { order, texts }
    }
}

impl Aligner for ByIdentifier {
    fn name(&self) -> &'static str {
        "id"
    }

    fn align(&self, source: &[Segment], target: &[Segment]) -> Vec<SegmentPair> {
        let src = IdTable::build(source);
        let tgt = IdTable::build(target);

        let mut seen: HashSet<&str> = HashSet::with_capacity(src.order.len() + tgt.order.len());
        let mut out = Vec::with_capacity(src.order.len().max(tgt.order.len()));
        for id in src.order.iter().chain(tgt.order.iter()) {
            if !seen.insert(id.as_str()) {
                continue;
            }
            out.push(SegmentPair {
                id: id.clone(),
                source: src.texts.get(id).map(|t| t.to_string()).unwrap_or_default(),
                target: tgt.texts.get(id).map(|t| t.to_string()).unwrap_or_default(),
            });
        }
        out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlignMode {
    /// Identifier merge when both inputs carry native ids, positional otherwise.
    #[default]
    Auto,
    Position,
    Id,
}

impl AlignMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AlignMode::Auto => "auto",
            AlignMode::Position => "position",
            AlignMode::Id => "id",
        }
    }

    pub fn aligner(self, source: &SegmentList, target: &SegmentList) -> &'static dyn Aligner {
        match self {
            AlignMode::Position => &Positional,
            AlignMode::Id => &ByIdentifier,
            AlignMode::Auto if source.identified && target.identified => &ByIdentifier,
            AlignMode::Auto => &Positional,
        }
    }
}

impl fmt::Display for AlignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlignMode {
    type Err = QaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(AlignMode::Auto),
            "position" | "positional" => Ok(AlignMode::Position),
            "id" | "identifier" => Ok(AlignMode::Id),
            other => Err(QaError::Other(format!(
                "unknown align mode '{other}': expected auto, position or id"
            ))),
        }
    }
}

/// Align two segment lists with the strategy `mode` resolves to.
pub fn align(mode: AlignMode, source: &SegmentList, target: &SegmentList) -> Vec<SegmentPair> {
    let aligner = mode.aligner(source, target);
    let pairs = aligner.align(&source.segments, &target.segments);
    tracing::debug!(
        event = "align",
        strategy = aligner.name(),
        source = source.len(),
        target = target.len(),
        pairs = pairs.len()
    );
    pairs
}
