//! SQLite-backed status log — the minimal audit trail of actor runs.
//!
//! Append-only: the orchestrator writes each frozen outcome as it lands and
//! never reads the log during a run. External collaborators (dashboards,
//! reporting) consume it read-only.

use std::path::{Path, PathBuf};

use cascade_core::{Error, Result};
use cascade_engine::{RunOutcome, TransitionRecord};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use serde::Serialize;
use tracing::info;

use crate::schema::SCHEMA_SQL;

/// A run row read back from the log, with its transition events.
#[derive(Debug, Clone, Serialize)]
pub struct LoggedRun {
    #[serde(rename = "runId")]
    pub run_id: String,
    #[serde(rename = "actorId")]
    pub actor_id: String,
    #[serde(rename = "reachedTerminal")]
    pub reached_terminal: bool,
    #[serde(rename = "finalState")]
    pub final_state: String,
    #[serde(rename = "finalCoherence")]
    pub final_coherence: f64,
    #[serde(rename = "ticksUsed")]
    pub ticks_used: u32,
    #[serde(rename = "recordedAt")]
    pub recorded_at: i64,
    pub transitions: Vec<TransitionRecord>,
}

/// Append-only log of run outcomes and transition events.
pub struct StatusLog {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl StatusLog {
    /// Open or create the status log under `db_dir`. The file is
    /// `db_dir/cascade.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("cascade.db");

        let conn = Connection::open(&db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;

        let log = Self {
            conn: Mutex::new(conn),
            db_path,
        };
        info!(
            "StatusLog initialized: {} runs, path={}",
            log.run_count()?,
            log.db_path.display()
        );
        Ok(log)
    }

    /// Append one frozen outcome plus its transition rows.
    pub fn record_outcome(&self, run_id: &str, outcome: &RunOutcome) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| Error::Database(e.to_string()))?;

        tx.execute(
            "INSERT INTO runs (run_id, actor_id, reached_terminal, final_state,
                               final_coherence, ticks_used, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run_id,
                outcome.actor_id,
                outcome.reached_terminal as i64,
                outcome.final_state,
                outcome.final_coherence,
                outcome.ticks_used,
                chrono::Utc::now().timestamp_millis(),
            ],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        let run_row_id = tx.last_insert_rowid();
        for record in &outcome.event_log {
            tx.execute(
                "INSERT INTO transitions (run_row_id, tick, from_state, to_state, coherence)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    run_row_id,
                    record.tick,
                    record.from_state,
                    record.to_state,
                    record.coherence,
                ],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        }

        tx.commit().map_err(|e| Error::Database(e.to_string()))
    }

    /// All recorded runs for an actor, oldest first.
    pub fn outcomes_for_actor(&self, actor_id: &str) -> Result<Vec<LoggedRun>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, run_id, actor_id, reached_terminal, final_state,
                        final_coherence, ticks_used, recorded_at
                 FROM runs WHERE actor_id = ?1 ORDER BY id",
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![actor_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    LoggedRun {
                        run_id: row.get(1)?,
                        actor_id: row.get(2)?,
                        reached_terminal: row.get::<_, i64>(3)? != 0,
                        final_state: row.get(4)?,
                        final_coherence: row.get(5)?,
                        ticks_used: row.get::<_, i64>(6)? as u32,
                        recorded_at: row.get(7)?,
                        transitions: Vec::new(),
                    },
                ))
            })
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut runs = Vec::with_capacity(rows.len());
        for (row_id, mut run) in rows {
            run.transitions = Self::transitions_for_row(&conn, row_id)?;
            runs.push(run);
        }
        Ok(runs)
    }

    /// Total number of recorded runs.
    pub fn run_count(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }

    fn transitions_for_row(conn: &Connection, run_row_id: i64) -> Result<Vec<TransitionRecord>> {
        let mut stmt = conn
            .prepare(
                "SELECT tick, from_state, to_state, coherence
                 FROM transitions WHERE run_row_id = ?1 ORDER BY tick",
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![run_row_id], |row| {
                Ok(TransitionRecord {
                    tick: row.get::<_, i64>(0)? as u32,
                    from_state: row.get(1)?,
                    to_state: row.get(2)?,
                    coherence: row.get(3)?,
                })
            })
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()));
        rows
    }
}

#[cfg(test)]
mod tests {
    use cascade_engine::SecondaryMetrics;

    use super::*;

    fn test_log() -> (StatusLog, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let log = StatusLog::open(dir.path()).unwrap();
        (log, dir)
    }

    fn outcome(actor_id: &str) -> RunOutcome {
        RunOutcome {
            actor_id: actor_id.to_string(),
            reached_terminal: true,
            final_state: "terminal".to_string(),
            final_coherence: 1.61,
            ticks_used: 13,
            event_log: vec![
                TransitionRecord {
                    tick: 2,
                    from_state: "standby".to_string(),
                    to_state: "syncing".to_string(),
                    coherence: 0.33,
                },
                TransitionRecord {
                    tick: 7,
                    from_state: "syncing".to_string(),
                    to_state: "engaged".to_string(),
                    coherence: 0.89,
                },
            ],
            secondary: SecondaryMetrics::default(),
        }
    }

    #[test]
    fn test_open_empty_log() {
        let (log, _dir) = test_log();
        assert_eq!(log.run_count().unwrap(), 0);
        assert!(log.outcomes_for_actor("node-1").unwrap().is_empty());
    }

    #[test]
    fn test_record_and_read_back() {
        let (log, _dir) = test_log();
        log.record_outcome("run-1", &outcome("node-1")).unwrap();

        let runs = log.outcomes_for_actor("node-1").unwrap();
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert_eq!(run.run_id, "run-1");
        assert!(run.reached_terminal);
        assert_eq!(run.ticks_used, 13);
        assert_eq!(run.transitions.len(), 2);
        assert_eq!(run.transitions[0].tick, 2);
        assert_eq!(run.transitions[1].to_state, "engaged");
        assert!(run.recorded_at > 0);
    }

    #[test]
    fn test_runs_ordered_oldest_first() {
        let (log, _dir) = test_log();
        let mut first = outcome("node-1");
        first.reached_terminal = false;
        first.final_state = "syncing".to_string();
        log.record_outcome("run-1", &first).unwrap();
        log.record_outcome("run-2", &outcome("node-1")).unwrap();
        log.record_outcome("run-2", &outcome("node-2")).unwrap();

        let runs = log.outcomes_for_actor("node-1").unwrap();
        assert_eq!(runs.len(), 2);
        assert!(!runs[0].reached_terminal);
        assert!(runs[1].reached_terminal);
        assert_eq!(log.run_count().unwrap(), 3);
    }
}
