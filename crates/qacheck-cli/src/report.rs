use color_eyre::eyre::Result;
use owo_colors::OwoColorize;
use qacheck_core::{IssueType, QaIssue, RunStats};
use serde::Serialize;
use std::io::Write;

use crate::highlight;

fn icon(t: IssueType) -> &'static str {
    match t {
        IssueType::EmptyTarget => "✖",
        IssueType::PlaceholderMismatch | IssueType::TagMismatch | IssueType::NumMismatch => "⚠",
        IssueType::GlossaryMismatch => "ℹ",
        IssueType::LengthRatio => "•",
    }
}

fn colored_kind(t: IssueType) -> String {
    let s = t.as_str();
    match t {
        IssueType::EmptyTarget => s.red().bold().to_string(),
        IssueType::PlaceholderMismatch | IssueType::TagMismatch => s.yellow().to_string(),
        IssueType::NumMismatch => s.magenta().to_string(),
        IssueType::GlossaryMismatch => s.cyan().to_string(),
        IssueType::LengthRatio => s.blue().to_string(),
    }
}

pub fn issue_line(issue: &QaIssue, use_color: bool) -> String {
    if use_color {
        format!(
            "{} [{}] {} — {}",
            icon(issue.issue_type),
            colored_kind(issue.issue_type),
            issue.uid.green(),
            issue.details
        )
    } else {
        format!("[{}] {} — {}", issue.issue_type, issue.uid, issue.details)
    }
}

pub fn summary_line(stats: RunStats, use_color: bool) -> String {
    if stats.issues == 0 {
        let tick = if use_color {
            "✔".green().to_string()
        } else {
            "✔".to_string()
        };
        return format!("{tick} No issues found in {} segment(s)", stats.total);
    }
    format!(
        "Checked {} segment(s), found {} issue(s)",
        stats.total, stats.issues
    )
}

pub fn print_issues(
    issues: &[QaIssue],
    stats: RunStats,
    limit: Option<usize>,
    highlight: bool,
    use_color: bool,
) {
    let shown = limit.unwrap_or(issues.len()).min(issues.len());
    for issue in &issues[..shown] {
        println!("{}", issue_line(issue, use_color));
        if highlight {
            let s = highlight::spans(issue);
            println!("    source: {}", highlight::render(&issue.source, &s.source, use_color));
            println!("    target: {}", highlight::render(&issue.target, &s.target, use_color));
        }
    }
    if shown < issues.len() {
        println!(
            "… and {} more (use --format csv or --format json for the full list)",
            issues.len() - shown
        );
    }
    println!("{}", summary_line(stats, use_color));
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, value)?;
    writeln!(lock)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_issue_line() {
        let i = QaIssue::new("12", IssueType::LengthRatio, "Ratio=0.40", "Hello", "ab");
        assert_eq!(issue_line(&i, false), "[LENGTH_RATIO] 12 — Ratio=0.40");
    }

    #[test]
    fn coloured_line_keeps_text() {
        let i = QaIssue::new("3", IssueType::EmptyTarget, "Target is empty", "Hi", "");
        let line = issue_line(&i, true);
        assert!(line.starts_with("✖ ["));
        assert!(line.contains("EMPTY_TARGET"));
        assert!(line.contains('\x1b'));
    }

    #[test]
    fn summary_wording() {
        assert_eq!(
            summary_line(RunStats { total: 4, issues: 0 }, false),
            "✔ No issues found in 4 segment(s)"
        );
        assert_eq!(
            summary_line(RunStats { total: 4, issues: 2 }, false),
            "Checked 4 segment(s), found 2 issue(s)"
        );
    }
}
