//! Database schema for the run status log.

/// Run outcomes and their transition events.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id TEXT NOT NULL,
    actor_id TEXT NOT NULL,
    reached_terminal INTEGER NOT NULL,
    final_state TEXT NOT NULL,
    final_coherence REAL NOT NULL,
    ticks_used INTEGER NOT NULL,
    recorded_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_runs_actor ON runs(actor_id);
CREATE INDEX IF NOT EXISTS idx_runs_run ON runs(run_id);

CREATE TABLE IF NOT EXISTS transitions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_row_id INTEGER NOT NULL REFERENCES runs(id) ON DELETE CASCADE,
    tick INTEGER NOT NULL,
    from_state TEXT NOT NULL,
    to_state TEXT NOT NULL,
    coherence REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transitions_run ON transitions(run_row_id);
"#;
