// src/input/reader.rs
use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};

use crate::extractors::grid::{Grid, Row};
use crate::utils::error::SheetError;

/// Decodes the first worksheet of an `.xlsx` file into a blank-filled text
/// grid. One document per file; additional sheets are ignored.
pub fn load_grid(path: &Path) -> Result<Grid, SheetError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| SheetError::NoSheets(path.display().to_string()))?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let rows: Vec<Row> = range
        .rows()
        .map(|row| Row::from_cells(row.iter().map(cell_text)))
        .collect();

    tracing::debug!(
        "Loaded {} row(s) from sheet '{}' of {}",
        rows.len(),
        sheet_name,
        path.display()
    );
    Ok(Grid::new(rows))
}

/// Normalizes every cell to display text; blank for empty or error cells.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}
