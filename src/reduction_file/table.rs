//! The inline frame table of a table-formatted data block.

use crate::error::{RdxError, RdxResult};
use serde::Serialize;

/// Column every frame table must carry: the file name relative to a declared path.
pub const FILENAME_COLUMN: &str = "filename";
/// Column every frame table must carry: the frame classification (bias, arc, ...).
pub const FRAMETYPE_COLUMN: &str = "frametype";

const DELIMITER: char = '|';

/// Rectangular table of string cells keyed by column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Split a `| a | b |` line into trimmed cells, dropping the boundary empties.
pub fn split_cells(line: &str) -> Vec<String> {
    let mut cells: Vec<String> = line
        .split(DELIMITER)
        .map(|cell| cell.trim().to_string())
        .collect();
    if line.starts_with(DELIMITER) && !cells.is_empty() {
        cells.remove(0);
    }
    if line.ends_with(DELIMITER) && !cells.is_empty() {
        cells.pop();
    }
    cells
}

/// Whether a line belongs to a table (header or row).
pub fn is_table_line(line: &str) -> bool {
    line.starts_with(DELIMITER)
}

impl FrameTable {
    /// Build a table from its header line and row lines.
    ///
    /// The mandatory columns are checked before any row is looked at.
    pub fn from_lines(header: &str, rows: &[String]) -> RdxResult<Self> {
        let columns = split_cells(header);
        for required in [FILENAME_COLUMN, FRAMETYPE_COLUMN] {
            if !columns.iter().any(|c| c == required) {
                return Err(RdxError::Schema(format!("No '{required}' column.")));
            }
        }

        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let cells = split_cells(line);
                if cells.len() != columns.len() {
                    return Err(RdxError::ColumnMismatch {
                        row: i + 1,
                        expected: columns.len(),
                        found: cells.len(),
                    });
                }
                Ok(cells)
            })
            .collect::<RdxResult<Vec<_>>>()?;

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Render back to `|`-delimited lines, header first, columns padded to equal width.
    pub fn to_lines(&self) -> Vec<String> {
        let widths: Vec<usize> = (0..self.columns.len())
            .map(|i| {
                self.rows
                    .iter()
                    .map(|r| r[i].len())
                    .chain(std::iter::once(self.columns[i].len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let render = |cells: &[String]| {
            let body = cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!(" {cell:<w$} "))
                .collect::<Vec<_>>()
                .join("|");
            format!("|{body}|")
        };

        std::iter::once(render(&self.columns))
            .chain(self.rows.iter().map(|r| render(r)))
            .collect()
    }
}
