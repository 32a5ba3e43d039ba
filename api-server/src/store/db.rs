use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use timer_core::constants::TARGET_SECONDS;
use timer_core::{Player, PlayerStore, StoreError};
use uuid::Uuid;

use super::SqliteStore;

const PLAYER_COLUMNS: &str = "id, name, total_attempts, perfect_attempts,
     first_perfect_attempt, best_time, message, created_at";

impl PlayerStore for SqliteStore {
    fn get_by_name(&self, name: &str) -> Result<Option<Player>, StoreError> {
        // Scope the mutex so it is released before row decoding.
        let row = {
            let conn = self.lock()?;
            conn.query_row(
                &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE name = ?1"),
                params![name],
                RawPlayerRow::from_row,
            )
            .optional()
            .map_err(|e| format!("get player failed: {e}"))?
        };

        row.map(RawPlayerRow::into_player).transpose()
    }

    fn create(&self, player: &Player) -> Result<(), StoreError> {
        let conn = self.lock()?;
        insert_row(&conn, player)
    }

    fn record_perfect(
        &self,
        name: &str,
        attempts: u32,
        message: Option<&str>,
    ) -> Result<Option<(Player, bool)>, StoreError> {
        // Read and fold under one guard; the fold itself is a single UPDATE.
        let (previous, row) = {
            let conn = self.lock()?;
            let previous: Option<Option<i64>> = conn
                .query_row(
                    "SELECT first_perfect_attempt FROM players WHERE name = ?1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| format!("get player failed: {e}"))?;
            let Some(previous) = previous else {
                return Ok(None);
            };

            let row = conn
                .query_row(
                    &format!(
                        "UPDATE players SET
                            perfect_attempts = perfect_attempts + 1,
                            total_attempts = total_attempts + ?2,
                            first_perfect_attempt = COALESCE(MIN(first_perfect_attempt, ?2), ?2),
                            best_time = ?3,
                            message = COALESCE(?4, message)
                         WHERE name = ?1
                         RETURNING {PLAYER_COLUMNS}"
                    ),
                    params![name, i64::from(attempts), TARGET_SECONDS, message],
                    RawPlayerRow::from_row,
                )
                .map_err(|e| format!("record perfect failed: {e}"))?;
            (previous, row)
        };

        let improved = previous.is_none_or(|current| i64::from(attempts) < current);
        Ok(Some((row.into_player()?, improved)))
    }

    fn set_message(&self, id: Uuid, message: &str) -> Result<Player, StoreError> {
        let row = {
            let conn = self.lock()?;
            conn.query_row(
                &format!("UPDATE players SET message = ?1 WHERE id = ?2 RETURNING {PLAYER_COLUMNS}"),
                params![message, id.to_string()],
                RawPlayerRow::from_row,
            )
            .optional()
            .map_err(|e| format!("set message failed: {e}"))?
        };

        row.ok_or_else(|| StoreError::Backend(format!("player not found: {id}")))?
            .into_player()
    }

    fn ranked(&self) -> Result<Vec<Player>, StoreError> {
        let rows: Vec<RawPlayerRow> = {
            let conn = self.lock()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {PLAYER_COLUMNS} FROM players
                     WHERE first_perfect_attempt IS NOT NULL
                     ORDER BY first_perfect_attempt ASC, seq ASC"
                ))
                .map_err(|e| format!("ranked query failed: {e}"))?;
            let rows = stmt
                .query_map([], RawPlayerRow::from_row)
                .map_err(|e| format!("ranked iteration failed: {e}"))?
                .collect::<Result<Vec<RawPlayerRow>, _>>()
                .map_err(|e| format!("ranked row decode failed: {e}"))?;
            rows
        };

        rows.into_iter().map(RawPlayerRow::into_player).collect()
    }

    fn count(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))
            .map_err(|e| format!("count failed: {e}"))?;
        Ok(count as usize)
    }

    fn top(&self) -> Result<Option<Player>, StoreError> {
        let row = {
            let conn = self.lock()?;
            conn.query_row(
                &format!(
                    "SELECT {PLAYER_COLUMNS} FROM players
                     WHERE first_perfect_attempt IS NOT NULL
                     ORDER BY first_perfect_attempt ASC, seq ASC
                     LIMIT 1"
                ),
                [],
                RawPlayerRow::from_row,
            )
            .optional()
            .map_err(|e| format!("top player query failed: {e}"))?
        };

        row.map(RawPlayerRow::into_player).transpose()
    }

    fn rank(&self, id: Uuid) -> Result<Option<u32>, StoreError> {
        let conn = self.lock()?;
        // Counts every ranked player ordered at or before this one. An absent
        // or unranked player joins nothing and counts zero.
        let position: i64 = conn
            .query_row(
                "SELECT COUNT(*)
                 FROM players p,
                      (SELECT first_perfect_attempt AS best, seq FROM players
                       WHERE id = ?1 AND first_perfect_attempt IS NOT NULL) me
                 WHERE p.first_perfect_attempt IS NOT NULL
                   AND (p.first_perfect_attempt < me.best
                        OR (p.first_perfect_attempt = me.best AND p.seq <= me.seq))",
                params![id.to_string()],
                |row| row.get(0),
            )
            .map_err(|e| format!("rank query failed: {e}"))?;

        Ok((position > 0).then_some(position as u32))
    }
}

fn insert_row(conn: &Connection, player: &Player) -> Result<(), StoreError> {
    let result = conn.execute(
        "INSERT INTO players (
            id, name, total_attempts, perfect_attempts,
            first_perfect_attempt, best_time, message, created_at
        ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
        params![
            player.id.to_string(),
            player.name,
            player.total_attempts as i64,
            player.perfect_attempts as i64,
            player.first_perfect_attempt.map(|v| v as i64),
            player.best_time,
            player.message,
            player.created_at_unix_s as i64,
        ],
    );

    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
            Err(StoreError::Conflict(format!(
                "player {:?} already exists",
                player.name
            )))
        }
        Err(e) => Err(StoreError::Backend(format!("insert player failed: {e}"))),
    }
}

struct RawPlayerRow {
    id: String,
    name: String,
    total_attempts: i64,
    perfect_attempts: i64,
    first_perfect_attempt: Option<i64>,
    best_time: Option<f64>,
    message: String,
    created_at: i64,
}

impl RawPlayerRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            total_attempts: row.get(2)?,
            perfect_attempts: row.get(3)?,
            first_perfect_attempt: row.get(4)?,
            best_time: row.get(5)?,
            message: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_player(self) -> Result<Player, StoreError> {
        let id = Uuid::parse_str(&self.id).map_err(|e| format!("bad uuid in db: {e}"))?;
        Ok(Player {
            id,
            name: self.name,
            total_attempts: self.total_attempts as u64,
            perfect_attempts: self.perfect_attempts as u32,
            first_perfect_attempt: self.first_perfect_attempt.map(|v| v as u32),
            best_time: self.best_time,
            message: self.message,
            created_at_unix_s: self.created_at as u64,
        })
    }
}
