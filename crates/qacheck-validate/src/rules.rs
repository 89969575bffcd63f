//! Stateless per-pair checks. Each returns at most one issue.

use qacheck_core::{Glossary, IssueType, LengthRatioLimits, QaIssue};

use crate::tokens::{format_token_list, same_multiset, TokenKind};

/// Signature shared by the rules that need nothing beyond the pair itself.
pub type PairRule = fn(&str, &str, &str) -> Option<QaIssue>;

/// Token-comparison and emptiness rules, in evaluation order.
pub const PAIR_RULES: [PairRule; 4] = [check_placeholders, check_numbers, check_tags, check_empty];

/// `chars(target) / max(1, chars(source))`.
pub fn length_ratio(source: &str, target: &str) -> f64 {
    let src_len = source.chars().count().max(1);
    target.chars().count() as f64 / src_len as f64
}

pub fn check_length_ratio(
    uid: &str,
    source: &str,
    target: &str,
    limits: &LengthRatioLimits,
) -> Option<QaIssue> {
    if source.is_empty() || target.is_empty() {
        return None;
    }
    let ratio = length_ratio(source, target);
    if limits.contains(ratio) {
        return None;
    }
    Some(QaIssue::new(
        uid,
        IssueType::LengthRatio,
        format!("Ratio={ratio:.2}"),
        source,
        target,
    ))
}

fn token_mismatch(
    kind: TokenKind,
    issue_type: IssueType,
    uid: &str,
    source: &str,
    target: &str,
) -> Option<QaIssue> {
    let src_tokens = kind.extract(source);
    let tgt_tokens = kind.extract(target);
    if same_multiset(&src_tokens, &tgt_tokens) {
        return None;
    }
    Some(QaIssue::new(
        uid,
        issue_type,
        format!(
            "Source={}, Target={}",
            format_token_list(&src_tokens),
            format_token_list(&tgt_tokens)
        ),
        source,
        target,
    ))
}

pub fn check_placeholders(uid: &str, source: &str, target: &str) -> Option<QaIssue> {
    token_mismatch(
        TokenKind::Placeholder,
        IssueType::PlaceholderMismatch,
        uid,
        source,
        target,
    )
}

pub fn check_numbers(uid: &str, source: &str, target: &str) -> Option<QaIssue> {
    token_mismatch(TokenKind::Number, IssueType::NumMismatch, uid, source, target)
}

pub fn check_tags(uid: &str, source: &str, target: &str) -> Option<QaIssue> {
    token_mismatch(TokenKind::Tag, IssueType::TagMismatch, uid, source, target)
}

pub fn check_empty(uid: &str, source: &str, target: &str) -> Option<QaIssue> {
    if !source.trim().is_empty() && target.trim().is_empty() {
        return Some(QaIssue::new(
            uid,
            IssueType::EmptyTarget,
            "Target is empty",
            source,
            target,
        ));
    }
    None
}

/// Reports only the first violated entry in glossary order.
pub fn check_glossary(
    uid: &str,
    source: &str,
    target: &str,
    glossary: &Glossary,
) -> Option<QaIssue> {
    glossary
        .iter()
        .find(|e| source.contains(e.source.as_str()) && !target.contains(e.target.as_str()))
        .map(|e| {
            QaIssue::new(
                uid,
                IssueType::GlossaryMismatch,
                format!("Expected '{}' -> '{}'", e.source, e.target),
                source,
                target,
            )
        })
}
