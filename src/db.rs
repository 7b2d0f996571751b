mod schema;
mod seed;

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use schema::INITIAL_SCHEMA;

/// Database wrapper providing connection management and schema initialization.
///
/// Owns the single SQLite connection for the process. Every other layer
/// borrows it through [`Database::connection`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens an in-memory SQLite database.
    ///
    /// Automatically initializes the schema on connection open.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a file-based SQLite database at the given path.
    ///
    /// Creates the database file if it does not exist.
    /// Automatically initializes the schema on connection open.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// Executes all schema statements in a single transaction.
    /// Uses IF NOT EXISTS for idempotent execution.
    fn initialize_schema(&self) -> Result<()> {
        // Has no effect inside a transaction, so it runs first.
        self.conn
            .execute("PRAGMA foreign_keys = ON", [])
            .context("failed to enable foreign keys")?;

        let tx = self
            .conn
            .unchecked_transaction()
            .context("failed to begin schema transaction")?;
        tx.execute_batch(INITIAL_SCHEMA)
            .context("failed to create schema")?;
        tx.commit().context("failed to commit schema")?;

        Ok(())
    }

    /// Returns a reference to the underlying connection.
    ///
    /// Useful for executing custom queries in tests or future CRUD operations.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Current time as stored in timestamp columns.
pub(crate) fn now_timestamp() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Reads a unix-seconds column into an `OffsetDateTime`.
///
/// Out-of-range values surface as a conversion failure on that column so
/// callers can treat them like any other undecodable row.
pub(crate) fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<OffsetDateTime> {
    let seconds: i64 = row.get(idx)?;
    OffsetDateTime::from_unix_timestamp(seconds)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}
