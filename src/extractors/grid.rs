// src/extractors/grid.rs
use std::collections::BTreeMap;

/// Central "is this cell effectively empty" predicate. Whitespace-only cells
/// count as blank everywhere in the extraction pipeline.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// One grid row: an ordered association from column index to cell text.
///
/// Indices may become sparse after header reconciliation blanks out consumed
/// fragments, so the row is keyed explicitly rather than stored as a dense
/// vector. Iteration is always in ascending index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: BTreeMap<usize, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a row from dense cell contents, indexed 0..n.
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells = cells
            .into_iter()
            .enumerate()
            .map(|(idx, cell)| (idx, cell.into()))
            .collect();
        Self { cells }
    }

    /// Cell text at `index`, empty string for absent cells.
    pub fn get(&self, index: usize) -> &str {
        self.cells.get(&index).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        self.cells.insert(index, value.into());
    }

    /// (index, text) pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.cells.iter().map(|(idx, cell)| (*idx, cell.as_str()))
    }

    /// Indices of non-blank cells, ascending.
    pub fn non_blank_indices(&self) -> Vec<usize> {
        self.iter()
            .filter(|(_, cell)| !is_blank(cell))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|cell| is_blank(cell))
    }

    /// All cell texts joined by `separator`, in index order.
    pub fn joined(&self, separator: &str) -> String {
        self.cells
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// A rectangular, row-major grid of text cells decoded from one sheet.
/// Immutable input to a single document's extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Convenience constructor for tests and loaders working with nested text.
    pub fn from_cells<R, I, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows.into_iter().map(Row::from_cells).collect(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_predicate_covers_whitespace() {
        assert!(is_blank(""));
        assert!(is_blank("  \t "));
        assert!(!is_blank(" 소유권 "));
    }

    #[test]
    fn row_access_is_blank_filled() {
        let row = Row::from_cells(["갑", "", "을"]);
        assert_eq!(row.get(0), "갑");
        assert_eq!(row.get(1), "");
        assert_eq!(row.get(99), "");
        assert_eq!(row.non_blank_indices(), vec![0, 2]);
    }

    #[test]
    fn joined_preserves_index_order() {
        let mut row = Row::new();
        row.set(3, "번호");
        row.set(0, "순위");
        assert_eq!(row.joined(" "), "순위 번호");
    }
}
