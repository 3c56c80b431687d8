//! Positional row cursor contract and in-memory implementation.
//!
//! # Responsibility
//! - Define the row-source contract read by the mapper.
//! - Provide `MemoryCursor`, a materialized result set over SQLite values.
//!
//! # Invariants
//! - A fresh cursor is positioned before the first row.
//! - Typed reads return `Ok(None)` for NULL cells, never a zero/empty stand-in.
//! - An empty cursor reports both before-first and after-last.

use rusqlite::types::Value;
use rusqlite::{Connection, Params};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CellResult<T> = Result<T, CellError>;

/// Failure reading one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellError {
    NoCurrentRow,
    ColumnOutOfRange(usize),
    Incompatible {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
}

impl Display for CellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCurrentRow => write!(f, "cursor is not positioned on a row"),
            Self::ColumnOutOfRange(index) => write!(f, "column index {index} is out of range"),
            Self::Incompatible {
                index,
                expected,
                found,
            } => write!(f, "column {index} holds {found}, cannot read as {expected}"),
        }
    }
}

impl Error for CellError {}

/// Positional, column-addressable view over a query result.
pub trait RowCursor {
    fn count(&self) -> usize;
    fn is_before_first(&self) -> bool;
    fn is_after_last(&self) -> bool;
    /// Moves to the first row. Returns `false` when there is none.
    fn move_to_first(&mut self) -> bool;
    /// Moves to the next row. Returns `false` once past the last row.
    fn move_to_next(&mut self) -> bool;
    fn column_index(&self, name: &str) -> Option<usize>;
    fn get_string(&self, index: usize) -> CellResult<Option<String>>;
    fn get_i32(&self, index: usize) -> CellResult<Option<i32>>;
    fn get_i64(&self, index: usize) -> CellResult<Option<i64>>;
    fn get_f64(&self, index: usize) -> CellResult<Option<f64>>;

    /// Whether the cursor currently points at a readable row.
    fn has_current_row(&self) -> bool {
        !self.is_before_first() && !self.is_after_last()
    }
}

/// Materialized result set over SQLite cell values.
#[derive(Debug, Clone, Default)]
pub struct MemoryCursor {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    position: Option<usize>,
}

impl MemoryCursor {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            position: None,
        }
    }

    /// Appends one row. Missing trailing cells are filled with NULL.
    pub fn push_row(&mut self, mut cells: Vec<Value>) {
        cells.resize(self.columns.len(), Value::Null);
        self.rows.push(cells);
    }

    pub fn with_row(mut self, cells: Vec<Value>) -> Self {
        self.push_row(cells);
        self
    }

    /// Runs a query and materializes every row.
    pub fn from_query<P: Params>(conn: &Connection, sql: &str, params: P) -> rusqlite::Result<Self> {
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let width = columns.len();

        let mut cursor = Self::new(columns);
        let mut rows = stmt.query(params)?;
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for index in 0..width {
                cells.push(row.get::<_, Value>(index)?);
            }
            cursor.rows.push(cells);
        }

        Ok(cursor)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn cell(&self, index: usize) -> CellResult<&Value> {
        let row = self
            .position
            .and_then(|position| self.rows.get(position))
            .ok_or(CellError::NoCurrentRow)?;
        row.get(index).ok_or(CellError::ColumnOutOfRange(index))
    }
}

impl RowCursor for MemoryCursor {
    fn count(&self) -> usize {
        self.rows.len()
    }

    fn is_before_first(&self) -> bool {
        self.rows.is_empty() || self.position.is_none()
    }

    fn is_after_last(&self) -> bool {
        match self.position {
            Some(position) => position >= self.rows.len(),
            None => self.rows.is_empty(),
        }
    }

    fn move_to_first(&mut self) -> bool {
        self.position = Some(0);
        !self.rows.is_empty()
    }

    fn move_to_next(&mut self) -> bool {
        let next = self.position.map_or(0, |position| position.saturating_add(1));
        let next = next.min(self.rows.len());
        self.position = Some(next);
        next < self.rows.len()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    fn get_string(&self, index: usize) -> CellResult<Option<String>> {
        match self.cell(index)? {
            Value::Null => Ok(None),
            Value::Text(text) => Ok(Some(text.clone())),
            Value::Integer(value) => Ok(Some(value.to_string())),
            Value::Real(value) => Ok(Some(value.to_string())),
            Value::Blob(_) => Err(incompatible(index, "text", "blob")),
        }
    }

    fn get_i32(&self, index: usize) -> CellResult<Option<i32>> {
        match self.get_i64(index)? {
            Some(value) => i32::try_from(value)
                .map(Some)
                .map_err(|_| incompatible(index, "integer", "out-of-range integer")),
            None => Ok(None),
        }
    }

    fn get_i64(&self, index: usize) -> CellResult<Option<i64>> {
        match self.cell(index)? {
            Value::Null => Ok(None),
            Value::Integer(value) => Ok(Some(*value)),
            Value::Real(value) => Ok(Some(*value as i64)),
            Value::Text(text) => parse_integer_text(text)
                .map(Some)
                .ok_or_else(|| incompatible(index, "integer", "text")),
            Value::Blob(_) => Err(incompatible(index, "integer", "blob")),
        }
    }

    fn get_f64(&self, index: usize) -> CellResult<Option<f64>> {
        match self.cell(index)? {
            Value::Null => Ok(None),
            Value::Integer(value) => Ok(Some(*value as f64)),
            Value::Real(value) => Ok(Some(*value)),
            Value::Text(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| incompatible(index, "double", "text")),
            Value::Blob(_) => Err(incompatible(index, "double", "blob")),
        }
    }
}

fn parse_integer_text(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(|value| value as i64))
}

fn incompatible(index: usize, expected: &'static str, found: &'static str) -> CellError {
    CellError::Incompatible {
        index,
        expected,
        found,
    }
}
