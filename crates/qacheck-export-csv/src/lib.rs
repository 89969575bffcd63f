use color_eyre::eyre::Result;
use qacheck_core::{QaIssue, SegmentPair};
use qacheck_domain::IssueRecord;
use std::io::Write;

pub const ISSUE_HEADERS: [&str; 5] = ["ID", "Issue Type", "Details", "Source", "Target"];

/// One row per issue, in checker order.
pub fn write_issues_csv<W: Write>(writer: W, issues: &[QaIssue]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(ISSUE_HEADERS)?;
    for issue in issues {
        let r = IssueRecord::from(issue);
        wtr.write_record([&r.id, &r.issue_type, &r.details, &r.source, &r.target])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_pairs_csv<W: Write>(writer: W, pairs: &[SegmentPair]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["id", "source", "target"])?;
    for p in pairs {
        wtr.write_record([&p.id, &p.source, &p.target])?;
    }
    wtr.flush()?;
    Ok(())
}
