//! Marks the tokens behind an issue inside its source and target text.

use std::collections::HashMap;
use std::ops::Range;

use owo_colors::OwoColorize;
use qacheck_core::{IssueType, QaIssue};
use qacheck_validate::TokenKind;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Spans {
    pub source: Vec<Range<usize>>,
    pub target: Vec<Range<usize>>,
}

pub fn spans(issue: &QaIssue) -> Spans {
    let (src, tgt) = (issue.source.as_str(), issue.target.as_str());
    match issue.issue_type {
        IssueType::PlaceholderMismatch => unmatched(TokenKind::Placeholder, src, tgt),
        IssueType::NumMismatch => unmatched(TokenKind::Number, src, tgt),
        IssueType::TagMismatch => unmatched(TokenKind::Tag, src, tgt),
        IssueType::GlossaryMismatch => match glossary_term(&issue.details) {
            Some(term) if !term.is_empty() => Spans {
                source: src
                    .match_indices(term)
                    .map(|(i, m)| i..i + m.len())
                    .collect(),
                target: Vec::new(),
            },
            _ => Spans::default(),
        },
        IssueType::EmptyTarget | IssueType::LengthRatio => Spans::default(),
    }
}

/// Source term out of `Expected '<src>' -> '<tgt>'`.
fn glossary_term(details: &str) -> Option<&str> {
    let rest = details.strip_prefix("Expected '")?.strip_suffix('\'')?;
    rest.rsplit_once("' -> '").map(|(src, _)| src)
}

/// Tokens on each side that have no counterpart left on the other side.
fn unmatched(kind: TokenKind, src: &str, tgt: &str) -> Spans {
    Spans {
        source: surplus(kind, src, tgt),
        target: surplus(kind, tgt, src),
    }
}

fn surplus(kind: TokenKind, text: &str, other: &str) -> Vec<Range<usize>> {
    let mut budget: HashMap<&str, usize> = HashMap::new();
    for t in kind.extract(other) {
        *budget.entry(t).or_insert(0) += 1;
    }
    kind.spans(text)
        .into_iter()
        .filter(|r| match budget.get_mut(&text[r.clone()]) {
            Some(n) if *n > 0 => {
                *n -= 1;
                false
            }
            _ => true,
        })
        .collect()
}

/// Render `text` with `spans` marked: colour when enabled, `[[...]]` otherwise.
pub fn render(text: &str, spans: &[Range<usize>], use_color: bool) -> String {
    if text.is_empty() {
        return if use_color {
            "(empty)".dimmed().to_string()
        } else {
            "(empty)".to_string()
        };
    }
    let mut out = String::with_capacity(text.len() + spans.len() * 4);
    let mut last = 0;
    for r in spans {
        out.push_str(&text[last..r.start]);
        let tok = &text[r.clone()];
        if use_color {
            out.push_str(&tok.red().bold().underline().to_string());
        } else {
            out.push_str("[[");
            out.push_str(tok);
            out.push_str("]]");
        }
        last = r.end;
    }
    out.push_str(&text[last..]);
    out
}
