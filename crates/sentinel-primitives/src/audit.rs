//! Append-only JSONL audit log with buffered writes and size-based rotation.
//!
//! One line per event, newest last. Writes are buffered and flushed either
//! on an explicit `flush()` call or once `flush_every` events have
//! accumulated, matching the original implementation's buffered-fsync
//! design: durability is traded for throughput between flush points, never
//! silently dropped.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;

use crate::error::Result;

/// Every distinct kind of event the system can produce across all crates.
/// Kept as one flat enum so a single audit stream can be greped/filtered by
/// `event_type` regardless of which component emitted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    ScanStarted,
    ScanBlocked,
    ScanFlagged,
    ScanAllowed,
    FileQuarantined,
    FileRestored,
    FileDeleted,
    PolicyCreated,
    PolicyUpdated,
    ThreatIntelIngested,
    NetworkIsolated,
    NetworkRestored,
    CredentialAlert,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: AuditEventType,
    pub subject: String,
    pub detail: serde_json::Value,
}

pub struct AuditLog {
    path: PathBuf,
    max_bytes: u64,
    flush_every: usize,
    writer: Mutex<AuditLogWriter>,
}

struct AuditLogWriter {
    file: BufWriter<File>,
    pending: usize,
    bytes_written: u64,
}

impl AuditLog {
    pub async fn open(path: impl AsRef<Path>, max_bytes: u64, flush_every: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        let bytes_written = file.metadata().await?.len();
        Ok(Self {
            path,
            max_bytes,
            flush_every,
            writer: Mutex::new(AuditLogWriter {
                file: BufWriter::new(file),
                pending: 0,
                bytes_written,
            }),
        })
    }

    pub async fn log(&self, event_type: AuditEventType, subject: impl Into<String>, detail: serde_json::Value) -> Result<()> {
        let event = AuditEvent {
            timestamp: Utc::now(),
            event_type,
            subject: subject.into(),
            detail,
        };
        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.file.write_all(&line).await?;
        writer.bytes_written += line.len() as u64;
        writer.pending += 1;

        if writer.pending >= self.flush_every {
            writer.file.flush().await?;
            writer.pending = 0;
        }

        if writer.bytes_written >= self.max_bytes {
            self.rotate(&mut writer).await?;
        }
        Ok(())
    }

    pub async fn flush(&self) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer.file.flush().await?;
        writer.pending = 0;
        Ok(())
    }

    async fn rotate(&self, writer: &mut AuditLogWriter) -> Result<()> {
        writer.file.flush().await?;
        let rotated = self.path.with_extension(format!("{}.1", Utc::now().timestamp()));
        tokio::fs::rename(&self.path, &rotated).await?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        writer.file = BufWriter::new(file);
        writer.bytes_written = 0;
        tracing::info!(rotated = %rotated.display(), "audit log rotated");
        Ok(())
    }

    pub async fn log_scan_blocked(&self, subject: impl Into<String>, reason: impl Into<String>) -> Result<()> {
        self.log(
            AuditEventType::ScanBlocked,
            subject,
            serde_json::json!({ "reason": reason.into() }),
        )
        .await
    }

    pub async fn log_file_quarantined(&self, quarantine_id: impl Into<String>, original_path: impl Into<String>) -> Result<()> {
        self.log(
            AuditEventType::FileQuarantined,
            quarantine_id,
            serde_json::json!({ "original_path": original_path.into() }),
        )
        .await
    }

    pub async fn log_network_isolated(&self, process: impl Into<String>, pid: u32) -> Result<()> {
        self.log(
            AuditEventType::NetworkIsolated,
            process,
            serde_json::json!({ "pid": pid }),
        )
        .await
    }
}
