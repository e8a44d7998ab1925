//! Forward-only schema migrations.
//!
//! Mirrors the original migration runner: a `schema_version` table holding a
//! single row, migrations applied in order starting from the stored
//! version, and a hard refusal to open a database stamped with a version
//! newer than this binary understands (downgrading silently would risk
//! losing columns the newer schema relies on).

use rusqlite::Connection;

use crate::error::{RegistryError, Result};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);",
    )?;

    let found: Option<u32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
        .ok();

    let current = found.unwrap_or(0);
    if current > CURRENT_SCHEMA_VERSION {
        return Err(RegistryError::FutureSchema {
            found: current,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }

    if current < 1 {
        apply_v1(conn)?;
    }

    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS policies (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            rule TEXT NOT NULL,
            action TEXT NOT NULL,
            enabled INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS threat_history (
            id TEXT PRIMARY KEY,
            timestamp TEXT NOT NULL,
            subject TEXT NOT NULL,
            threat_type TEXT NOT NULL,
            confidence REAL NOT NULL,
            action_taken TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS iocs (
            id TEXT PRIMARY KEY,
            ioc_type TEXT NOT NULL,
            value TEXT NOT NULL,
            source TEXT NOT NULL,
            confidence REAL NOT NULL,
            first_seen TEXT NOT NULL,
            last_seen TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_policies_name ON policies(name);
        CREATE INDEX IF NOT EXISTS idx_policies_enabled ON policies(enabled);
        CREATE INDEX IF NOT EXISTS idx_policies_action ON policies(action);
        CREATE INDEX IF NOT EXISTS idx_threat_history_subject ON threat_history(subject);
        CREATE INDEX IF NOT EXISTS idx_threat_history_timestamp ON threat_history(timestamp);
        CREATE INDEX IF NOT EXISTS idx_threat_history_threat_type ON threat_history(threat_type);
        CREATE INDEX IF NOT EXISTS idx_iocs_value ON iocs(value);
        CREATE INDEX IF NOT EXISTS idx_iocs_type ON iocs(ioc_type);
        CREATE INDEX IF NOT EXISTS idx_iocs_source ON iocs(source);
        CREATE INDEX IF NOT EXISTS idx_iocs_last_seen ON iocs(last_seen);
        ",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        let version: u32 = conn
            .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn refuses_to_open_future_schema() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE schema_version (version INTEGER NOT NULL);")
            .unwrap();
        conn.execute("INSERT INTO schema_version (version) VALUES (99)", [])
            .unwrap();
        let result = migrate(&conn);
        assert!(matches!(result, Err(RegistryError::FutureSchema { .. })));
    }

    #[test]
    fn creates_expected_indexes() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'index'")
            .unwrap();
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();
        assert!(names.len() >= 10);
    }
}
