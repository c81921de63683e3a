//! In-memory table model
//!
//! A table is an ordered collection of named columns sharing one row count.
//! Cells are typed (numeric, text, or missing) so the missing marker is
//! representable in every column kind.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Missing value marker
    Null,
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

impl Cell {
    /// Whether this cell is the missing marker
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view of the cell, if it holds a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Text view of the cell, if it holds text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        match v {
            Some(v) => Cell::Number(v),
            None => Cell::Null,
        }
    }
}

/// Kind of a column, derived from its cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Every non-missing cell is a number
    Numeric,
    /// At least one non-missing cell is text
    Categorical,
}

/// A named column of cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    cells: Vec<Cell>,
}

impl Column {
    /// Create a column from a name and cells
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Convenience constructor for a numeric column with optional values
    pub fn from_numbers(name: impl Into<String>, values: &[Option<f64>]) -> Self {
        Self::new(name, values.iter().map(|v| Cell::from(*v)).collect())
    }

    /// Column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All cells in row order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable cell access; callers must not change the length
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the column has no rows
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of missing cells
    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }

    /// Derived kind: a column is categorical iff any non-missing cell is
    /// text; otherwise numeric (an all-missing column counts as numeric,
    /// matching float inference in the usual ingest path).
    pub fn kind(&self) -> ColumnKind {
        if self.cells.iter().any(|c| matches!(c, Cell::Text(_))) {
            ColumnKind::Categorical
        } else {
            ColumnKind::Numeric
        }
    }

    /// Whether the column is numeric
    pub fn is_numeric(&self) -> bool {
        self.kind() == ColumnKind::Numeric
    }

    /// Non-missing numeric values in row order
    pub fn numeric_values(&self) -> Vec<f64> {
        self.cells.iter().filter_map(Cell::as_number).collect()
    }

    /// Per-row numeric view: `Some(v)` for numbers, `None` otherwise
    pub fn numbers(&self) -> Vec<Option<f64>> {
        self.cells.iter().map(Cell::as_number).collect()
    }
}

/// An ordered collection of equally sized named columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table, validating the shared-row-count invariant
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            for col in &columns {
                if col.len() != expected {
                    return Err(Error::InvalidColumn {
                        name: col.name().to_string(),
                        reason: format!("expected {expected} rows, got {}", col.len()),
                    });
                }
            }
        }
        Ok(Self { columns })
    }

    /// An empty table with no columns
    pub fn empty() -> Self {
        Self { columns: vec![] }
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// All columns in table order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Mutable column access; callers must not change column lengths
    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    /// Column names in table order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Whether the table has a column with the given name
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name() == name)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| Error::column_not_found(name))
    }

    /// Mutable lookup of a column by name
    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| Error::column_not_found(name))
    }

    /// Numeric columns in table order
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_numeric()).collect()
    }

    /// Names of numeric columns in table order
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Names of categorical columns in table order
    pub fn categorical_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !c.is_numeric())
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Cells of row `i` in column order
    pub fn row(&self, i: usize) -> Vec<&Cell> {
        self.columns.iter().map(|c| &c.cells[i]).collect()
    }

    /// New table keeping exactly the rows where `keep[i]` is true
    ///
    /// `keep` must have one entry per row.
    pub fn filter_rows(&self, keep: &[bool]) -> Result<Self> {
        if keep.len() != self.n_rows() {
            return Err(Error::computation(format!(
                "row mask length {} does not match row count {}",
                keep.len(),
                self.n_rows()
            )));
        }
        let columns = self
            .columns
            .iter()
            .map(|col| {
                let cells = col
                    .cells
                    .iter()
                    .zip(keep)
                    .filter(|(_, &k)| k)
                    .map(|(c, _)| c.clone())
                    .collect();
                Column::new(col.name(), cells)
            })
            .collect();
        Ok(Self { columns })
    }

    /// Rows that contain at least one missing cell across all columns
    pub fn rows_with_missing(&self) -> usize {
        (0..self.n_rows())
            .filter(|&i| self.columns.iter().any(|c| c.cells[i].is_null()))
            .count()
    }
}
