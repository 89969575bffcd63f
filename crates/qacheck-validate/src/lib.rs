use qacheck_core::{Glossary, LengthRatioLimits, QaIssue, RunConfig, RunStats, SegmentPair};

pub mod rules;
pub mod tokens;

pub use rules::{
    check_empty, check_glossary, check_length_ratio, check_numbers, check_placeholders,
    check_tags, length_ratio,
};
pub use tokens::TokenKind;

/// Run every rule over every pair.
///
/// Issues come out pair-major, rule-minor: LENGTH_RATIO, PLACEHOLDER_MISMATCH,
/// NUM_MISMATCH, TAG_MISMATCH, EMPTY_TARGET, then GLOSSARY_MISMATCH when a
/// non-empty glossary is given. `config` is carried for client-specific
/// settings and does not switch any rule off.
pub fn run_checks(
    pairs: &[SegmentPair],
    glossary: Option<&Glossary>,
    config: Option<&RunConfig>,
    limits: LengthRatioLimits,
) -> (Vec<QaIssue>, RunStats) {
    if let Some(cfg) = config.filter(|c| !c.is_empty()) {
        let keys: Vec<&str> = cfg.keys().map(String::as_str).collect();
        tracing::debug!(event = "run_config_ignored", keys = ?keys);
    }
    let glossary = glossary.filter(|g| !g.is_empty());

    let mut issues = Vec::new();
    for p in pairs {
        let (uid, src, tgt) = (p.id.as_str(), p.source.as_str(), p.target.as_str());

        if let Some(issue) = check_length_ratio(uid, src, tgt, &limits) {
            issues.push(issue);
        }
        for rule in rules::PAIR_RULES {
            if let Some(issue) = rule(uid, src, tgt) {
                issues.push(issue);
            }
        }
        if let Some(g) = glossary {
            if let Some(issue) = check_glossary(uid, src, tgt, g) {
                issues.push(issue);
            }
        }
    }

    let stats = RunStats {
        total: pairs.len(),
        issues: issues.len(),
    };
    tracing::debug!(event = "run_checks_done", total = stats.total, issues = stats.issues);
    (issues, stats)
}
