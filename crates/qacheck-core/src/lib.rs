use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod glossary;

pub use glossary::{Glossary, GlossaryEntry};

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Free-form run configuration. Accepted by the checker so callers can pass
/// client-specific settings through; no rule reads it yet.
pub type RunConfig = serde_json::Map<String, serde_json::Value>;

/// One unit of translatable text as extracted from a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Native identifier if the reader produced one (row id, msgctxt, ...)
    pub id: Option<String>,
    pub text: String,
}

impl Segment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
        }
    }

    pub fn with_id(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            text: text.into(),
        }
    }
}

/// Ordered segments read from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentList {
    pub segments: Vec<Segment>,
    /// True when the reader takes ids from the file itself rather than from
    /// segment order.
    pub identified: bool,
}

impl SegmentList {
    pub fn positional(texts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            segments: texts.into_iter().map(Segment::new).collect(),
            identified: false,
        }
    }

    pub fn identified(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            identified: true,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// A source segment and its aligned target segment, sharing one identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentPair {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl SegmentPair {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Which half of a bilingual document a file provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Source,
    Target,
}

impl Side {
    /// Column / field name used by tabular inputs for this side.
    pub fn column(self) -> &'static str {
        match self {
            Side::Source => "source",
            Side::Target => "target",
        }
    }
}

/// Closed set of defects the rule set can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    LengthRatio,
    PlaceholderMismatch,
    NumMismatch,
    TagMismatch,
    EmptyTarget,
    GlossaryMismatch,
}

impl IssueType {
    /// All variants in the order the checker evaluates them.
    pub const ALL: [IssueType; 6] = [
        IssueType::LengthRatio,
        IssueType::PlaceholderMismatch,
        IssueType::NumMismatch,
        IssueType::TagMismatch,
        IssueType::EmptyTarget,
        IssueType::GlossaryMismatch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IssueType::LengthRatio => "LENGTH_RATIO",
            IssueType::PlaceholderMismatch => "PLACEHOLDER_MISMATCH",
            IssueType::NumMismatch => "NUM_MISMATCH",
            IssueType::TagMismatch => "TAG_MISMATCH",
            IssueType::EmptyTarget => "EMPTY_TARGET",
            IssueType::GlossaryMismatch => "GLOSSARY_MISMATCH",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single flagged defect on one segment pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaIssue {
    pub uid: String,
    pub issue_type: IssueType,
    /// Short diagnostic; its textual layout is fixed per issue type because
    /// exports and highlighting parse it back.
    pub details: String,
    pub source: String,
    pub target: String,
}

impl QaIssue {
    pub fn new(
        uid: &str,
        issue_type: IssueType,
        details: impl Into<String>,
        source: &str,
        target: &str,
    ) -> Self {
        Self {
            uid: uid.to_string(),
            issue_type,
            details: details.into(),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// Aggregate counts for one checker run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub total: usize,
    pub issues: usize,
}

/// Inclusive bounds for `chars(target) / chars(source)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthRatioLimits {
    min: f64,
    max: f64,
}

impl LengthRatioLimits {
    pub const DEFAULT_MIN: f64 = 0.5;
    pub const DEFAULT_MAX: f64 = 3.0;

    pub fn new(min: f64, max: f64) -> std::result::Result<Self, QaError> {
        let valid = min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0 && min < max;
        if !valid {
            return Err(QaError::InvalidRatioLimits { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, ratio: f64) -> bool {
        self.min <= ratio && ratio <= self.max
    }
}

impl Default for LengthRatioLimits {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

/// Typed failures that callers may want to tell apart from generic I/O errors.
#[derive(Debug, Error)]
pub enum QaError {
    #[error("unsupported file format '{extension}' for {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },
    #[error("'{extension}' files can only be read as the source side: {}", path.display())]
    SourceOnlyFormat { path: PathBuf, extension: String },
    #[error("invalid length ratio bounds min={min} max={max}: both must be positive and min < max")]
    InvalidRatioLimits { min: f64, max: f64 },
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_type_wire_names_match_as_str() {
        for t in IssueType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn ratio_limits_reject_bad_bounds() {
        assert!(LengthRatioLimits::new(0.5, 3.0).is_ok());
        assert!(LengthRatioLimits::new(3.0, 0.5).is_err());
        assert!(LengthRatioLimits::new(1.0, 1.0).is_err());
        assert!(LengthRatioLimits::new(0.0, 2.0).is_err());
        assert!(LengthRatioLimits::new(f64::NAN, 2.0).is_err());
    }

    #[test]
    fn ratio_limits_are_inclusive() {
        let l = LengthRatioLimits::default();
        assert!(l.contains(0.5));
        assert!(l.contains(3.0));
        assert!(!l.contains(0.4));
        assert!(!l.contains(3.01));
    }
}
