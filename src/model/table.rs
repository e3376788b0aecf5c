//! Table types.

use serde::{Deserialize, Serialize};

/// A detected table as a row/column grid of cell strings.
///
/// Rows may be ragged. Renderers treat missing trailing cells as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table, top to bottom
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from rows of anything string-like.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows padded with empty cells up to [`Table::column_count`].
    pub fn padded_rows(&self) -> Vec<Vec<&str>> {
        let width = self.column_count();
        self.rows
            .iter()
            .map(|row| {
                let mut cells: Vec<&str> = row.iter().map(String::as_str).collect();
                cells.resize(width, "");
                cells
            })
            .collect()
    }

    /// Get a cell, if present.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let table = Table::from_rows([["a", "b"], ["1", "2"]]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.cell(1, 0), Some("1"));
        assert_eq!(table.cell(2, 0), None);
    }

    #[test]
    fn test_padded_rows() {
        let table = Table::from_rows(vec![vec!["a", "b", "c"], vec!["1"]]);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.padded_rows()[1], vec!["1", "", ""]);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 0);
    }
}
