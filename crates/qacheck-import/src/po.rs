use std::path::Path;

use color_eyre::eyre::{eyre, WrapErr};
use qacheck_core::{Result, Segment, SegmentList, SegmentPair, Side};
use qacheck_domain::{pairs_from_records, PairRecord};

/// One gettext message. `context` is the msgctxt up to an optional `|`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoEntry {
    pub context: Option<String>,
    pub msgid: String,
    pub msgstr: String,
    /// First `#:` reference line, if any.
    pub reference: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Ctxt,
    Id,
    Str,
    /// msgid_plural / msgstr[n>0]: parsed but not kept
    Ignored,
}

#[derive(Default)]
struct Pending {
    reference: Option<String>,
    ctxt: Option<String>,
    id: Option<String>,
    str_: Option<String>,
}

impl Pending {
    fn flush(&mut self, out: &mut Vec<PoEntry>) {
        let p = std::mem::take(self);
        let Some(msgid) = p.id else { return };
        // header entry
        if msgid.is_empty() && p.ctxt.is_none() {
            return;
        }
        out.push(PoEntry {
            context: p.ctxt,
            msgid,
            msgstr: p.str_.unwrap_or_default(),
            reference: p.reference,
        });
    }
}

pub fn read_po_entries(po_path: &Path) -> Result<Vec<PoEntry>> {
    let content = std::fs::read_to_string(po_path)
        .wrap_err_with(|| format!("failed to read {}", po_path.display()))?;
    parse_entries(content.trim_start_matches('\u{feff}'))
}

pub(crate) fn parse_entries(content: &str) -> Result<Vec<PoEntry>> {
    let mut out = Vec::new();
    let mut cur = Pending::default();
    let mut field = Field::None;

    for (n, line) in content.lines().enumerate() {
        let lt = line.trim();
        let lineno = n + 1;

        if lt.is_empty() {
            cur.flush(&mut out);
            field = Field::None;
            continue;
        }
        if let Some(r) = lt.strip_prefix("#:") {
            if cur.str_.is_some() {
                cur.flush(&mut out);
            }
            if cur.reference.is_none() {
                cur.reference = Some(r.trim().to_string());
            }
            continue;
        }
        if lt.starts_with('#') {
            continue;
        }

        if let Some(rest) = lt.strip_prefix("msgctxt") {
            if cur.str_.is_some() {
                cur.flush(&mut out);
            }
            let raw = parse_po_string(rest, lineno)?;
            let key = raw
                .split_once('|')
                .map(|(k, _)| k.to_string())
                .unwrap_or(raw);
            cur.ctxt = Some(key);
            field = Field::Ctxt;
        } else if lt.starts_with("msgid_plural") {
            field = Field::Ignored;
        } else if let Some(rest) = lt.strip_prefix("msgid") {
            if cur.str_.is_some() {
                cur.flush(&mut out);
            }
            cur.id = Some(parse_po_string(rest, lineno)?);
            field = Field::Id;
        } else if let Some(rest) = lt.strip_prefix("msgstr[0]") {
            cur.str_ = Some(parse_po_string(rest, lineno)?);
            field = Field::Str;
        } else if lt.starts_with("msgstr[") {
            field = Field::Ignored;
        } else if let Some(rest) = lt.strip_prefix("msgstr") {
            cur.str_ = Some(parse_po_string(rest, lineno)?);
            field = Field::Str;
        } else if lt.starts_with('"') {
            let val = parse_po_string(lt, lineno)?;
            let slot = match field {
                Field::Ctxt => cur.ctxt.as_mut(),
                Field::Id => cur.id.as_mut(),
                Field::Str => cur.str_.as_mut(),
                Field::None | Field::Ignored => None,
            };
            if let Some(s) = slot {
                s.push_str(&val);
            }
        } else {
            return Err(eyre!("line {lineno}: unexpected content: {lt}"));
        }
    }
    cur.flush(&mut out);
    Ok(out)
}

fn parse_po_string(s: &str, lineno: usize) -> Result<String> {
    let s = s.trim();
    if s.len() < 2 || !s.starts_with('"') || !s.ends_with('"') {
        return Err(eyre!("line {lineno}: invalid po string: {s}"));
    }
    let inner = &s[1..s.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                match next {
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    other => out.push(other),
                }
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

pub(crate) fn segments(entries: &[PoEntry], side: Side) -> SegmentList {
    let segments = entries
        .iter()
        .map(|e| Segment {
            id: e.context.clone(),
            text: match side {
                Side::Source => e.msgid.clone(),
                Side::Target => e.msgstr.clone(),
            },
        })
        .collect();
    SegmentList {
        segments,
        identified: entries.iter().any(|e| e.context.is_some()),
    }
}

pub(crate) fn pairs(entries: Vec<PoEntry>) -> Vec<SegmentPair> {
    pairs_from_records(
        entries
            .into_iter()
            .map(|e| PairRecord {
                id: e.context,
                source: Some(e.msgid),
                target: Some(e.msgstr),
            })
            .collect(),
    )
}
