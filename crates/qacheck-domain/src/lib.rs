use qacheck_core::{QaIssue, RunStats, SegmentPair};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Flattened issue row shared by CSV and JSON exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IssueRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Issue Type")]
    pub issue_type: String,
    #[serde(rename = "Details")]
    pub details: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Target")]
    pub target: String,
}

impl From<&QaIssue> for IssueRecord {
    fn from(i: &QaIssue) -> Self {
        Self {
            id: i.uid.clone(),
            issue_type: i.issue_type.as_str().to_string(),
            details: i.details.clone(),
            source: i.source.clone(),
            target: i.target.clone(),
        }
    }
}

/// Input pair as supplied by bilingual readers. Every field is optional:
/// missing text reads as empty, a missing id falls back to the 1-based position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PairRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

impl PairRecord {
    /// `position` is 0-based.
    pub fn into_pair(self, position: usize) -> SegmentPair {
        let id = self
            .id
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| (position + 1).to_string());
        SegmentPair {
            id,
            source: self.source.unwrap_or_default(),
            target: self.target.unwrap_or_default(),
        }
    }
}

pub fn pairs_from_records(records: Vec<PairRecord>) -> Vec<SegmentPair> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, r)| r.into_pair(i))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatsRecord {
    pub total: usize,
    pub issues: usize,
}

impl From<RunStats> for StatsRecord {
    fn from(s: RunStats) -> Self {
        Self {
            total: s.total,
            issues: s.issues,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckReport {
    pub schema_version: u32,
    pub stats: StatsRecord,
    pub issues: Vec<IssueRecord>,
}

impl CheckReport {
    pub fn new(issues: &[QaIssue], stats: RunStats) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            stats: stats.into(),
            issues: issues.iter().map(IssueRecord::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchFileReport {
    pub path: String,
    pub stats: StatsRecord,
    pub issues: Vec<IssueRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchReport {
    pub schema_version: u32,
    pub files: Vec<BatchFileReport>,
    pub skipped: Vec<SkippedFile>,
    pub totals: StatsRecord,
}
