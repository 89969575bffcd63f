use color_eyre::eyre::eyre;
use qacheck_core::{Result, Segment, SegmentList, SegmentPair, Side};
use qacheck_domain::{pairs_from_records, PairRecord};

/// A header row and the data rows under it. Delimited text and spreadsheets
/// both end up here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Rows {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Rows {
    pub fn from_delimited(content: &str, delimiter: u8) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(content.as_bytes());
        let headers = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for rec in rdr.records() {
            rows.push(rec?.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

    /// First row is the header.
    pub fn from_grid(mut grid: Vec<Vec<String>>) -> Self {
        if grid.is_empty() {
            return Self::default();
        }
        let headers = grid.remove(0);
        Self {
            headers,
            rows: grid,
        }
    }

    /// Index of the first header equal to `name`, ignoring ASCII case and padding.
    fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }
}

fn cell(row: &[String], idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| row.get(i)).cloned()
}

/// One side of a table: the `source`/`target` column, else the first column.
/// An `id` column makes the list identified.
pub(crate) fn segments(table: &Rows, side: Side) -> SegmentList {
    if table.headers.is_empty() {
        return SegmentList::default();
    }
    let text_col = table.column(side.column()).unwrap_or(0);
    let id_col = table.column("id");

    let segments = table
        .rows
        .iter()
        .map(|row| Segment {
            id: cell(row, id_col),
            text: cell(row, Some(text_col)).unwrap_or_default(),
        })
        .collect();
    SegmentList {
        segments,
        identified: id_col.is_some(),
    }
}

/// A table holding both sides. `source` and `target` columns are required,
/// `id` is optional.
pub(crate) fn pairs(table: &Rows) -> Result<Vec<SegmentPair>> {
    let (Some(src_col), Some(tgt_col)) = (table.column("source"), table.column("target")) else {
        return Err(eyre!(
            "bilingual table needs 'source' and 'target' columns, found: {}",
            table.headers.join(", ")
        ));
    };
    let id_col = table.column("id");

    let records = table
        .rows
        .iter()
        .map(|row| PairRecord {
            id: cell(row, id_col),
            source: cell(row, Some(src_col)),
            target: cell(row, Some(tgt_col)),
        })
        .collect();
    Ok(pairs_from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv(content: &str) -> Rows {
        Rows::from_delimited(content, b',').unwrap()
    }

    #[test]
    fn picks_side_column_case_insensitively() {
        let t = csv("id,Source,TARGET\n1,Hello,Bonjour\n2,Bye,Salut\n");
        let src = segments(&t, Side::Source);
        let tgt = segments(&t, Side::Target);
        assert!(src.identified && tgt.identified);
        assert_eq!(src.segments[1], Segment::with_id("2", "Bye"));
        assert_eq!(tgt.segments[0], Segment::with_id("1", "Bonjour"));
    }

    #[test]
    fn falls_back_to_first_column_without_ids() {
        let t = Rows::from_delimited("text\tnote\nHallo\tgreeting\n\tblank row\n", b'\t').unwrap();
        let list = segments(&t, Side::Target);
        assert!(!list.identified);
        let texts: Vec<_> = list.segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Hallo", ""]);
    }

    #[test]
    fn short_rows_read_as_empty() {
        let p = pairs(&csv("id,source,target\nx,Only source\n")).unwrap();
        assert_eq!(p, vec![SegmentPair::new("x", "Only source", "")]);
    }

    #[test]
    fn pairs_require_both_columns() {
        let err = pairs(&csv("id,source\n1,a\n")).unwrap_err();
        assert!(err.to_string().contains("'source' and 'target'"));
    }

    #[test]
    fn quoted_cells_keep_commas_and_newlines() {
        let p = pairs(&csv("source,target\n\"Hello, {name}\",\"Bonjour,\n{name}\"\n")).unwrap();
        assert_eq!(p[0].source, "Hello, {name}");
        assert_eq!(p[0].target, "Bonjour,\n{name}");
        assert_eq!(p[0].id, "1");
    }

    #[test]
    fn grid_uses_first_row_as_header() {
        let grid = vec![
            vec!["source".to_string(), "target".to_string()],
            vec!["Total: 5".to_string(), "Total : 5".to_string()],
        ];
        let t = Rows::from_grid(grid);
        assert_eq!(t.headers, vec!["source", "target"]);
        assert_eq!(segments(&t, Side::Target).segments[0].text, "Total : 5");
        assert!(segments(&Rows::from_grid(Vec::new()), Side::Source).is_empty());
    }
}
