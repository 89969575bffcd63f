use regex::Regex;
use std::fmt::Write;
use std::ops::Range;
use std::sync::OnceLock;
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

/// Token families compared as multisets between source and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `%name`, `{...}` up to the nearest `}`, `$name`. Name characters are
    /// letters, numbers and `_`; combining marks end a name.
    Placeholder,
    /// Maximal runs of decimal digits
    Number,
    /// `<...>` up to the nearest `>`
    Tag,
}

static RE_PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
static RE_NUMBER: OnceLock<Regex> = OnceLock::new();
static RE_TAG: OnceLock<Regex> = OnceLock::new();

impl TokenKind {
    fn regex(self) -> &'static Regex {
        match self {
            TokenKind::Placeholder => RE_PLACEHOLDER
                .get_or_init(|| Regex::new(r"%[\p{L}\p{N}_]+|\{[^}]+\}|\$[\p{L}\p{N}_]+").unwrap()),
            TokenKind::Number => RE_NUMBER.get_or_init(|| Regex::new(r"\d+").unwrap()),
            TokenKind::Tag => RE_TAG.get_or_init(|| Regex::new(r"<[^>]+>").unwrap()),
        }
    }

    /// Tokens in order of occurrence.
    pub fn extract(self, text: &str) -> Vec<&str> {
        self.regex().find_iter(text).map(|m| m.as_str()).collect()
    }

    /// Byte ranges of the tokens in `text`.
    pub fn spans(self, text: &str) -> Vec<Range<usize>> {
        self.regex().find_iter(text).map(|m| m.range()).collect()
    }
}

/// Order-insensitive, count-sensitive comparison.
pub fn same_multiset(a: &[&str], b: &[&str]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

/// Render tokens as a bracketed list of quoted strings: `['%s', '{n}']`.
pub fn format_token_list(tokens: &[&str]) -> String {
    let items: Vec<String> = tokens.iter().map(|t| quote_token(t)).collect();
    format!("[{}]", items.join(", "))
}

fn quote_token(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => {
                let cp = c as u32;
                let _ = match cp {
                    0..=0xff => write!(out, "\\x{cp:02x}"),
                    0x100..=0xffff => write!(out, "\\u{cp:04x}"),
                    _ => write!(out, "\\U{cp:08x}"),
                };
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Space is the only separator shown as-is; controls, format characters,
/// private-use, unassigned and the other separators are escaped.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !matches!(
        c.general_category(),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_patterns() {
        let t = "Hello %name%, {count} items for $user at 100%";
        assert_eq!(
            TokenKind::Placeholder.extract(t),
            vec!["%name", "{count}", "$user"]
        );
    }

    #[test]
    fn nested_braces_stop_at_first_close() {
        assert_eq!(TokenKind::Placeholder.extract("{a{b}c}"), vec!["{a{b}"]);
        assert!(TokenKind::Placeholder.extract("{}").is_empty());
    }

    #[test]
    fn numbers_are_maximal_digit_runs() {
        assert_eq!(TokenKind::Number.extract("v1.25 x 300"), vec!["1", "25", "300"]);
    }

    #[test]
    fn tags_are_non_nested() {
        assert_eq!(
            TokenKind::Tag.extract("<b>bold</b> <a href='x'>"),
            vec!["<b>", "</b>", "<a href='x'>"]
        );
        assert!(TokenKind::Tag.extract("a <> b").is_empty());
    }

    #[test]
    fn spans_point_at_tokens() {
        let t = "x <i>y</i>";
        let spans = TokenKind::Tag.spans(t);
        assert_eq!(&t[spans[0].clone()], "<i>");
        assert_eq!(&t[spans[1].clone()], "</i>");
    }

    #[test]
    fn multiset_counts_matter() {
        assert!(same_multiset(&["%s", "%d"], &["%d", "%s"]));
        assert!(!same_multiset(&["%s", "%s"], &["%s"]));
        assert!(!same_multiset(&["%s", "%s"], &["%s", "%d"]));
    }

    #[test]
    fn list_formatting() {
        assert_eq!(format_token_list(&[]), "[]");
        assert_eq!(format_token_list(&["%name", "{count}"]), "['%name', '{count}']");
        assert_eq!(format_token_list(&["<a href='x'>"]), "[\"<a href='x'>\"]");
        assert_eq!(
            format_token_list(&["<a title=\"it's\">"]),
            "['<a title=\"it\\'s\">']"
        );
        assert_eq!(format_token_list(&["{a\nb}"]), "['{a\\nb}']");
    }

    #[test]
    fn invisible_characters_are_escaped() {
        assert_eq!(format_token_list(&["<a\u{a0}b>"]), "['<a\\xa0b>']");
        assert_eq!(format_token_list(&["{x\u{200b}}"]), "['{x\\u200b}']");
        assert_eq!(format_token_list(&["{\u{85}}"]), "['{\\x85}']");
        assert_eq!(format_token_list(&["{\u{2028}\u{7f}}"]), "['{\\u2028\\x7f}']");
        assert_eq!(format_token_list(&["{\u{f0000}}"]), "['{\\U000f0000}']");
        assert_eq!(format_token_list(&["{caf\u{e9} \u{301}}"]), "['{caf\u{e9} \u{301}}']");
    }

    #[test]
    fn combining_marks_end_placeholder_names() {
        assert_eq!(TokenKind::Placeholder.extract("%cafe\u{301}"), vec!["%cafe"]);
        assert_eq!(TokenKind::Placeholder.extract("$\u{928}\u{93e}\u{92e}"), vec!["$\u{928}"]);
        assert_eq!(TokenKind::Placeholder.extract("%n_2 $x\u{2163}"), vec!["%n_2", "$x\u{2163}"]);
    }
}
