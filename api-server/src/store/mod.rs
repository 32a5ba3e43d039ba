mod db;
#[cfg(test)]
mod tests;

use std::{
    fs,
    path::Path,
    sync::{Mutex, MutexGuard},
};

use rusqlite::Connection;
use timer_core::StoreError;

/// SQLite-backed player store.
///
/// One row per player, keyed by UUID text with a UNIQUE constraint on
/// `name`. The `seq` rowid records creation order and breaks ranking ties.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

const PLAYERS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS players (
        seq                   INTEGER PRIMARY KEY AUTOINCREMENT,
        id                    TEXT NOT NULL UNIQUE,
        name                  TEXT NOT NULL UNIQUE,
        total_attempts        INTEGER NOT NULL DEFAULT 0,
        perfect_attempts      INTEGER NOT NULL DEFAULT 0,
        first_perfect_attempt INTEGER,
        best_time             REAL,
        message               TEXT NOT NULL,
        created_at            INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_players_first_perfect
        ON players(first_perfect_attempt, seq);";

impl SqliteStore {
    /// Open (or create) `players.db` under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, String> {
        fs::create_dir_all(data_dir)
            .map_err(|e| format!("failed to create data dir {}: {e}", data_dir.display()))?;

        let db_path = data_dir.join("players.db");
        let conn = Connection::open(&db_path)
            .map_err(|e| format!("failed to open SQLite at {}: {e}", db_path.display()))?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;
             PRAGMA synchronous=NORMAL;",
        )
        .map_err(|e| format!("failed to set pragmas: {e}"))?;

        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, String> {
        let conn = Connection::open_in_memory()
            .map_err(|e| format!("failed to open in-memory SQLite: {e}"))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, String> {
        conn.execute_batch(PLAYERS_SCHEMA)
            .map_err(|e| format!("failed to create schema: {e}"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend("sqlite connection lock poisoned".to_string()))
    }
}
