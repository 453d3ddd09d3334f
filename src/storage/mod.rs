// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::extractors::records::Record;
use crate::utils::error::StorageError;

/// One consolidated output table: column order is first-seen across records,
/// with the document-identifier column always first.
#[derive(Debug, Clone)]
pub struct Table {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

/// Flattens one section's per-document record lists into a single table.
/// Zero contributing documents still yield a single "no record" row so the
/// output sheet is never empty.
pub fn consolidate(title: &str, records: Vec<Record>, id_column: &str, no_record: &str) -> Table {
    if records.is_empty() {
        let mut sentinel = Record::new();
        sentinel.insert(id_column.to_string(), no_record.to_string());
        return Table {
            title: title.to_string(),
            columns: vec![id_column.to_string()],
            rows: vec![sentinel],
        };
    }

    let mut columns: Vec<String> = Vec::new();
    for record in &records {
        for key in record.keys() {
            if !columns.iter().any(|existing| existing == key) {
                columns.push(key.clone());
            }
        }
    }

    Table {
        title: title.to_string(),
        columns,
        rows: records,
    }
}

/// Writes each table to its own sheet of a fresh workbook, header row first.
/// Fields a record does not carry are rendered as empty cells.
pub fn write_workbook(tables: &[Table], path: &Path) -> Result<(), StorageError> {
    let mut book = umya_spreadsheet::new_file();

    for table in tables {
        let sheet = book
            .new_sheet(&table.title)
            .map_err(|e| StorageError::Sheet(e.to_string()))?;

        for (col, name) in table.columns.iter().enumerate() {
            sheet
                .get_cell_mut(format!("{}1", column_letter(col + 1)).as_str())
                .set_value(name);
        }
        for (row_idx, record) in table.rows.iter().enumerate() {
            for (col, name) in table.columns.iter().enumerate() {
                let value = record.get(name).map(String::as_str).unwrap_or("");
                if value.is_empty() {
                    continue;
                }
                sheet
                    .get_cell_mut(format!("{}{}", column_letter(col + 1), row_idx + 2).as_str())
                    .set_value(value);
            }
        }
        tracing::info!("Prepared sheet '{}' with {} row(s)", table.title, table.rows.len());
    }

    // drop the default sheet created by new_file
    if book.remove_sheet_by_name("Sheet1").is_err() {
        tracing::warn!("Default sheet not found while assembling output workbook");
    }

    umya_spreadsheet::writer::xlsx::write(&book, path)
        .map_err(|e| StorageError::Workbook(e.to_string()))?;
    tracing::info!("Saved workbook to {}", path.display());
    Ok(())
}

/// Per-document outcome recorded in the run metadata sidecar, keeping the
/// silent-skip policy inspectable after the fact.
#[derive(Debug, Clone, Serialize)]
pub struct RunEntry {
    pub file: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<RowCounts>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RowCounts {
    pub share: usize,
    pub rights: usize,
    pub liens: usize,
}

impl RunEntry {
    pub fn extracted(file: &str, counts: (usize, usize, usize)) -> Self {
        Self {
            file: file.to_string(),
            status: "extracted",
            reason: None,
            rows: Some(RowCounts {
                share: counts.0,
                rights: counts.1,
                liens: counts.2,
            }),
        }
    }

    pub fn skipped(file: &str, reason: String) -> Self {
        Self {
            file: file.to_string(),
            status: "skipped",
            reason: Some(reason),
            rows: None,
        }
    }
}

/// Saves a JSON summary next to the output workbook.
pub fn write_run_metadata(output: &Path, entries: &[RunEntry]) -> Result<PathBuf, StorageError> {
    let skipped = entries.iter().filter(|e| e.status == "skipped").count();
    let metadata = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "documents": entries.len(),
        "extracted": entries.len() - skipped,
        "skipped": skipped,
        "entries": entries,
    });

    let text = serde_json::to_string_pretty(&metadata)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    let path = output.with_extension("meta.json");
    fs::write(&path, text)?;
    Ok(path)
}

fn column_letter(n: usize) -> String {
    let mut result = String::new();
    let mut n = n;
    while n > 0 {
        let rem = (n - 1) % 26;
        result.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    result
}
