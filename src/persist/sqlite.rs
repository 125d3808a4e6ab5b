//! SQLite-backed append-only sheet.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, params};

use crate::engine::traits::{SheetRow, SheetSink, SinkError};

use super::{PersistError, PersistResult};

/// SQLite implementation of [`crate::engine::traits::SheetSink`].
///
/// Rows of one named section are numbered from 1 in write order.
pub struct SqliteSheetSink {
    conn: Connection,
    section: String,
}

impl SqliteSheetSink {
    /// Opens or creates a sheet database at `path`, writing to `section`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>, section: impl Into<String>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn, section.into())
    }

    /// Opens an in-memory sheet.
    pub fn open_in_memory(section: impl Into<String>) -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn, section.into())
    }

    fn init_connection(conn: Connection, section: String) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn, section })
    }

    /// Section this sink writes to.
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Number of rows in the section, header rows included.
    pub fn row_count(&self) -> PersistResult<u64> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sheet_rows WHERE section = ?1",
            params![self.section],
            |row| row.get(0),
        )?;
        Ok(n as u64)
    }

    /// All rows of the section in row order.
    pub fn rows(&self) -> PersistResult<Vec<SheetRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT cells FROM sheet_rows WHERE section = ?1 ORDER BY row_no ASC")?;
        let texts = stmt.query_map(params![self.section], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for text in texts {
            out.push(serde_json::from_str(&text?)?);
        }
        Ok(out)
    }

    fn insert_rows<'a>(
        &mut self,
        rows: impl IntoIterator<Item = &'a SheetRow>,
    ) -> PersistResult<()> {
        let tx = self.conn.transaction()?;
        {
            let next: i64 = tx.query_row(
                "SELECT COALESCE(MAX(row_no), 0) + 1 FROM sheet_rows WHERE section = ?1",
                params![self.section],
                |row| row.get(0),
            )?;
            let mut stmt = tx.prepare(
                "INSERT INTO sheet_rows(section, row_no, ts_ms, cells) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (offset, row) in rows.into_iter().enumerate() {
                let cells = serde_json::to_string(row)?;
                stmt.execute(params![self.section, next + offset as i64, now_ms() as i64, cells])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl SheetSink for SqliteSheetSink {
    fn is_empty(&self) -> Result<bool, SinkError> {
        Ok(self.row_count()? == 0)
    }

    fn write_header(&mut self, rows: &[SheetRow; 2]) -> Result<(), SinkError> {
        if !SheetSink::is_empty(self)? {
            let msg = "header written to a non-empty section".to_string();
            return Err(PersistError::Message(msg).into());
        }
        self.insert_rows(rows.iter())?;
        Ok(())
    }

    fn append_row(&mut self, row: &SheetRow) -> Result<(), SinkError> {
        self.insert_rows(std::iter::once(row))?;
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
