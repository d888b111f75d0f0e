//! Spreadsheet track lists (first worksheet only)

use super::Columns;
use crate::model::Track;
use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Read every data row of the first worksheet of the workbook at `path`
pub fn read_xlsx(path: &Path) -> Result<Vec<Track>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open track list: {:?}", path))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("Cannot find any sheets in {:?}", path))?;
    log::debug!("Reading sheet {:?}", sheet);

    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("Failed to read sheet {:?} of {:?}", sheet, path))?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let Some(headers) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns = Columns::new(headers.iter().map(String::as_str));

    Ok(rows
        .map(|cells| columns.track(cells.iter().map(String::as_str)))
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
