// src/extractors/section.rs
use super::grid::{Grid, Row};
use super::matching::MatchMode;

/// A bounded sub-grid: the rows between a start marker (exclusive) and the
/// nearest following end marker (exclusive). `found` is false when the start
/// marker is missing or the bounded range holds no non-blank cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    rows: Vec<Row>,
    pub found: bool,
}

impl Section {
    pub fn absent() -> Self {
        Self {
            rows: Vec::new(),
            found: false,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

/// Scans the grid top-to-bottom for the first row containing a cell matching
/// `start_keyword`; the section starts at the following row. The first later
/// row matching any of `end_keywords` ends the section (exclusive); without
/// one, the section runs to the grid's last row. An all-blank result is
/// replaced by a single-cell `no_record` placeholder with `found = false`.
pub fn locate_section(
    grid: &Grid,
    start_keyword: &str,
    end_keywords: &[String],
    mode: MatchMode,
    no_record: &str,
) -> Section {
    let rows = grid.rows();

    let start = rows.iter().position(|row| {
        row.iter().any(|(_, cell)| mode.matches(cell, start_keyword))
    });
    let Some(marker) = start else {
        tracing::debug!("Start marker '{}' not found", start_keyword);
        return Section::absent();
    };
    let start = marker + 1;

    let end = rows[start..]
        .iter()
        .position(|row| {
            end_keywords.iter().any(|keyword| {
                row.iter().any(|(_, cell)| mode.matches(cell, keyword))
            })
        })
        .map(|offset| start + offset)
        .unwrap_or(rows.len());

    let bounded: Vec<Row> = rows[start..end].to_vec();
    if bounded.iter().all(Row::is_blank) {
        tracing::debug!(
            "Section after '{}' is empty ({} blank rows)",
            start_keyword,
            bounded.len()
        );
        return Section {
            rows: vec![Row::from_cells([no_record])],
            found: false,
        };
    }

    Section {
        rows: bounded,
        found: true,
    }
}
