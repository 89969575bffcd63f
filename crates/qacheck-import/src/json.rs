use color_eyre::eyre::eyre;
use qacheck_core::{Result, Segment, SegmentList, SegmentPair, Side};
use qacheck_domain::{pairs_from_records, PairRecord};
use serde_json::Value;

/// Scalars become text; `null` and containers count as missing.
fn scalar(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn array(content: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(content)? {
        Value::Array(items) => Ok(items),
        other => Err(eyre!(
            "expected a JSON array of segments, found {}",
            match other {
                Value::Object(_) => "an object",
                Value::Null => "null",
                _ => "a scalar",
            }
        )),
    }
}

/// Accepts `["text", ...]` or `[{"id": .., "source"|"target"|"text": ..}, ...]`.
pub(crate) fn segments(content: &str, side: Side) -> Result<SegmentList> {
    let mut identified = false;
    let mut segments = Vec::new();
    for item in array(content)? {
        let seg = match &item {
            Value::Object(map) => {
                let id = scalar(map.get("id"));
                identified |= id.is_some();
                Segment {
                    id,
                    text: scalar(map.get(side.column()))
                        .or_else(|| scalar(map.get("text")))
                        .unwrap_or_default(),
                }
            }
            other => Segment::new(scalar(Some(other)).unwrap_or_default()),
        };
        segments.push(seg);
    }
    Ok(SegmentList {
        segments,
        identified,
    })
}

pub(crate) fn pairs(content: &str) -> Result<Vec<SegmentPair>> {
    let records = array(content)?
        .iter()
        .map(|item| match item {
            Value::Object(map) => PairRecord {
                id: scalar(map.get("id")),
                source: scalar(map.get("source")),
                target: scalar(map.get("target")),
            },
            _ => PairRecord::default(),
        })
        .collect();
    Ok(pairs_from_records(records))
}
