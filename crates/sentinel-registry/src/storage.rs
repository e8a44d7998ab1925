//! SQLite-backed persistence for policies, threat history, and IOCs.
//!
//! Shaped after the original tool-schema store's API (`open`/`temporary`,
//! one `store_*`/`load_*`/`list_*`/`remove_*` family per record kind,
//! explicit `flush`), ported from two sled trees onto three SQLite tables
//! plus a schema_version table.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::models::{Ioc, IocType, Policy, PolicyAction, ThreatHistoryEntry};
use crate::schema;

pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        schema::migrate(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// In-memory database for tests and one-shot CLI invocations.
    pub fn temporary() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::migrate(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn store_policy(&self, policy: &Policy) -> Result<()> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        conn.execute(
            "INSERT INTO policies (id, name, rule, action, enabled, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                rule = excluded.rule,
                action = excluded.action,
                enabled = excluded.enabled,
                updated_at = excluded.updated_at",
            params![
                policy.id,
                policy.name,
                serde_json::to_string(&policy.rule)?,
                action_to_str(policy.action),
                policy.enabled as i64,
                policy.created_at.to_rfc3339(),
                policy.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn load_policy(&self, id: &str) -> Result<Option<Policy>> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        conn.query_row(
            "SELECT id, name, rule, action, enabled, created_at, updated_at
             FROM policies WHERE id = ?1",
            params![id],
            row_to_policy,
        )
        .optional()
        .map_err(Into::into)
    }

    pub fn list_policies(&self) -> Result<Vec<Policy>> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, name, rule, action, enabled, created_at, updated_at FROM policies ORDER BY name",
        )?;
        let rows = stmt.query_map([], row_to_policy)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub fn remove_policy(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        let affected = conn.execute("DELETE FROM policies WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub fn policy_count(&self) -> Result<usize> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM policies", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn record_threat_history(&self, entry: &ThreatHistoryEntry) -> Result<()> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        conn.execute(
            "INSERT INTO threat_history (id, timestamp, subject, threat_type, confidence, action_taken)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.id,
                entry.timestamp.to_rfc3339(),
                entry.subject,
                entry.threat_type,
                entry.confidence,
                action_to_str(entry.action_taken),
            ],
        )?;
        Ok(())
    }

    pub fn recent_history_for_subject(&self, subject: &str, limit: usize) -> Result<Vec<ThreatHistoryEntry>> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, timestamp, subject, threat_type, confidence, action_taken
             FROM threat_history WHERE subject = ?1 ORDER BY timestamp DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![subject, limit as i64], row_to_history)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub fn store_ioc(&self, ioc: &Ioc) -> Result<()> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        conn.execute(
            "INSERT INTO iocs (id, ioc_type, value, source, confidence, first_seen, last_seen)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                confidence = excluded.confidence,
                last_seen = excluded.last_seen",
            params![
                ioc.id,
                ioc_type_to_str(ioc.ioc_type),
                ioc.value,
                ioc.source,
                ioc.confidence,
                ioc.first_seen.to_rfc3339(),
                ioc.last_seen.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn find_ioc_by_value(&self, value: &str) -> Result<Option<Ioc>> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        conn.query_row(
            "SELECT id, ioc_type, value, source, confidence, first_seen, last_seen
             FROM iocs WHERE value = ?1",
            params![value],
            row_to_ioc,
        )
        .optional()
        .map_err(Into::into)
    }

    pub fn list_iocs(&self) -> Result<Vec<Ioc>> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, ioc_type, value, source, confidence, first_seen, last_seen FROM iocs",
        )?;
        let rows = stmt.query_map([], row_to_ioc)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub fn flush(&self) -> Result<()> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        conn.pragma_update(None, "wal_checkpoint", "FULL")?;
        Ok(())
    }
}

fn action_to_str(action: PolicyAction) -> &'static str {
    match action {
        PolicyAction::Allow => "allow",
        PolicyAction::Flag => "flag",
        PolicyAction::Block => "block",
    }
}

fn str_to_action(s: &str) -> PolicyAction {
    match s {
        "block" => PolicyAction::Block,
        "flag" => PolicyAction::Flag,
        _ => PolicyAction::Allow,
    }
}

fn ioc_type_to_str(t: IocType) -> &'static str {
    match t {
        IocType::Domain => "domain",
        IocType::IpAddress => "ip_address",
        IocType::Url => "url",
        IocType::FileHashSha256 => "file_hash_sha256",
        IocType::FileHashMd5 => "file_hash_md5",
        IocType::Email => "email",
    }
}

fn str_to_ioc_type(s: &str) -> IocType {
    match s {
        "ip_address" => IocType::IpAddress,
        "url" => IocType::Url,
        "file_hash_sha256" => IocType::FileHashSha256,
        "file_hash_md5" => IocType::FileHashMd5,
        "email" => IocType::Email,
        _ => IocType::Domain,
    }
}

fn parse_time(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_policy(row: &rusqlite::Row) -> rusqlite::Result<Policy> {
    let rule_str: String = row.get(2)?;
    let action_str: String = row.get(3)?;
    Ok(Policy {
        id: row.get(0)?,
        name: row.get(1)?,
        rule: serde_json::from_str(&rule_str).unwrap_or(serde_json::Value::Null),
        action: str_to_action(&action_str),
        enabled: row.get::<_, i64>(4)? != 0,
        created_at: parse_time(row.get(5)?),
        updated_at: parse_time(row.get(6)?),
    })
}

fn row_to_history(row: &rusqlite::Row) -> rusqlite::Result<ThreatHistoryEntry> {
    let action_str: String = row.get(5)?;
    Ok(ThreatHistoryEntry {
        id: row.get(0)?,
        timestamp: parse_time(row.get(1)?),
        subject: row.get(2)?,
        threat_type: row.get(3)?,
        confidence: row.get(4)?,
        action_taken: str_to_action(&action_str),
    })
}

fn row_to_ioc(row: &rusqlite::Row) -> rusqlite::Result<Ioc> {
    let type_str: String = row.get(1)?;
    Ok(Ioc {
        id: row.get(0)?,
        ioc_type: str_to_ioc_type(&type_str),
        value: row.get(2)?,
        source: row.get(3)?,
        confidence: row.get(4)?,
        first_seen: parse_time(row.get(5)?),
        last_seen: parse_time(row.get(6)?),
    })
}
