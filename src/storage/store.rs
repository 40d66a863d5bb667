//! In-memory SQLite connection, table creation and batched insertion

use super::{models::Record, schema};
use crate::error::{Result, SleeperError};
use rusqlite::{params_from_iter, Connection, DatabaseName, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Owns the connection holding one loaded league
pub struct LeagueDatabase {
    pub(crate) conn: Connection,
}

impl LeagueDatabase {
    /// Open an empty in-memory database with every table created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;

        let db = Self { conn };
        db.create_tables()?;
        Ok(db)
    }

    pub(crate) fn create_tables(&self) -> Result<()> {
        for table in schema::TABLES {
            self.conn.execute(&table.create_table_sql(), [])?;
            for sql in table.create_index_sql() {
                self.conn.execute(&sql, [])?;
            }
        }
        Ok(())
    }

    /// Insert all `rows` into their table inside one transaction.
    ///
    /// Returns the number of rows written. An empty slice is a no-op.
    pub fn bulk_insert<R: Record>(&mut self, rows: &[R]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let table = R::TABLE;
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&table.insert_sql())?;
            for row in rows {
                stmt.execute(params_from_iter(row.values()))?;
            }
        }
        tx.commit()?;

        debug!(table = table.name, rows = rows.len(), "Inserted rows");
        Ok(rows.len())
    }

    /// Number of rows currently in `table`.
    pub fn row_count(&self, table: &str) -> Result<u64> {
        let spec = schema::table(table)
            .ok_or_else(|| SleeperError::rejected(format!("Unknown table: {}", table)))?;
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", spec.name), [], |row| {
                    row.get(0)
                })?;
        Ok(count.max(0) as u64)
    }

    /// The week week-scoped queries default to, if a load has completed.
    pub fn effective_week(&self) -> Result<Option<u16>> {
        let week = self
            .conn
            .query_row(
                "SELECT effective_week FROM season_context LIMIT 1",
                [],
                |row| row.get::<_, u16>(0),
            )
            .optional()?;
        Ok(week)
    }

    /// Copy the whole database into a standalone SQLite file at `path`.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        self.conn.backup(DatabaseName::Main, path, None)?;
        Ok(path.to_path_buf())
    }
}
