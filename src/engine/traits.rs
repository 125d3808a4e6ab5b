use serde::{Deserialize, Serialize};

use crate::persist::PersistError;

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Text(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

pub type SheetRow = Vec<Cell>;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("sheet unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Append-only tabular destination addressed by a named section.
///
/// Rows already written are never updated or removed.
pub trait SheetSink: Send {
    /// True when the section holds no rows, header rows included.
    fn is_empty(&self) -> Result<bool, SinkError>;
    /// Writes the two header rows at the top of an empty section.
    fn write_header(&mut self, rows: &[SheetRow; 2]) -> Result<(), SinkError>;
    /// Appends one data row after the existing rows.
    fn append_row(&mut self, row: &SheetRow) -> Result<(), SinkError>;
}

impl<S: SheetSink + ?Sized> SheetSink for Box<S> {
    fn is_empty(&self) -> Result<bool, SinkError> {
        (**self).is_empty()
    }

    fn write_header(&mut self, rows: &[SheetRow; 2]) -> Result<(), SinkError> {
        (**self).write_header(rows)
    }

    fn append_row(&mut self, row: &SheetRow) -> Result<(), SinkError> {
        (**self).append_row(row)
    }
}

/// In-memory sheet; rows are kept in write order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemorySheet {
    pub rows: Vec<SheetRow>,
}

impl SheetSink for MemorySheet {
    fn is_empty(&self) -> Result<bool, SinkError> {
        Ok(self.rows.is_empty())
    }

    fn write_header(&mut self, rows: &[SheetRow; 2]) -> Result<(), SinkError> {
        self.rows.extend(rows.iter().cloned());
        Ok(())
    }

    fn append_row(&mut self, row: &SheetRow) -> Result<(), SinkError> {
        self.rows.push(row.clone());
        Ok(())
    }
}
