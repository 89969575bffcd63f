//! Excel workbooks. Only the first worksheet is read; its first row is the header.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use qacheck_core::Result;

use crate::table::Rows;

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

pub(crate) fn first_sheet(path: &Path) -> Result<Rows> {
    let mut workbook = open_workbook_auto(path)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        return Ok(Rows::default());
    };
    let grid = range?
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok(Rows::from_grid(grid))
}
