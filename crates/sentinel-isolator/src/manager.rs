//! Top-level isolation manager: backend selection, process-tree isolation,
//! exit monitoring, and cleanup.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::backend::{FirewallBackend, FirewallRule, IptablesBackend, NftablesBackend};
use crate::error::{IsolatorError, Result};
use crate::process::{is_critical_process, process_tree, ProcFsTable, ProcessTable};

const EXIT_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Auto,
    NFTables,
    IPTables,
}

#[derive(Debug, Clone)]
pub struct IsolatedProcess {
    pub pid: i32,
    pub reason: String,
    pub isolated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IsolationStatistics {
    pub total_isolated_processes: u64,
    pub active_isolated_processes: u64,
    pub total_rules_applied: u64,
    pub total_cleanup_operations: u64,
}

struct Tracked {
    process: IsolatedProcess,
    rules: Vec<FirewallRule>,
    monitor: JoinHandle<()>,
}

struct Inner {
    isolated: HashMap<i32, Tracked>,
    stats: IsolationStatistics,
}

/// Detects and isolates processes from the network on request, via
/// whichever firewall CLI is available on the host, and reverses the
/// isolation automatically once the process exits.
pub struct NetworkIsolationManager {
    backend_kind: Backend,
    backend: Arc<dyn FirewallBackend>,
    process_table: Arc<dyn ProcessTable>,
    inner: Mutex<Inner>,
}

impl NetworkIsolationManager {
    pub async fn create(backend: Backend, dry_run: bool) -> Result<Self> {
        Self::create_with_table(backend, dry_run, Arc::new(ProcFsTable)).await
    }

    pub async fn create_with_table(backend: Backend, dry_run: bool, process_table: Arc<dyn ProcessTable>) -> Result<Self> {
        let resolved = match backend {
            Backend::Auto => detect_backend().await?,
            other => other,
        };

        let backend: Arc<dyn FirewallBackend> = match resolved {
            Backend::NFTables => Arc::new(NftablesBackend::new(dry_run)),
            Backend::IPTables => Arc::new(IptablesBackend::new(dry_run)),
            Backend::Auto => unreachable!("Auto is resolved above"),
        };

        Ok(Self {
            backend_kind: resolved,
            backend,
            process_table,
            inner: Mutex::new(Inner {
                isolated: HashMap::new(),
                stats: IsolationStatistics::default(),
            }),
        })
    }

    pub fn backend_kind(&self) -> Backend {
        self.backend_kind
    }

    pub async fn is_process_isolated(&self, pid: i32) -> bool {
        self.inner.lock().await.isolated.contains_key(&pid)
    }

    pub async fn statistics(&self) -> IsolationStatistics {
        self.inner.lock().await.stats
    }

    pub async fn list_isolated_processes(&self) -> Vec<IsolatedProcess> {
        self.inner.lock().await.isolated.values().map(|t| t.process.clone()).collect()
    }

    pub async fn isolate_process(self: &Arc<Self>, pid: i32, reason: &str) -> Result<()> {
        if is_critical_process(self.process_table.as_ref(), pid) {
            return Err(IsolatorError::CriticalProcess(pid));
        }

        {
            let inner = self.inner.lock().await;
            if inner.isolated.contains_key(&pid) {
                tracing::debug!(pid, "already isolated");
                return Ok(());
            }
        }

        tracing::info!(pid, reason, "isolating process");
        let rules = self.backend.apply_isolation(pid).await?;
        let rules_applied = rules.len() as u64;

        let this = Arc::clone(self);
        let monitor = tokio::spawn(async move {
            this.watch_for_exit(pid).await;
        });

        let mut inner = self.inner.lock().await;
        inner.isolated.insert(
            pid,
            Tracked {
                process: IsolatedProcess {
                    pid,
                    reason: reason.to_string(),
                    isolated_at: Utc::now(),
                },
                rules,
                monitor,
            },
        );
        inner.stats.total_isolated_processes += 1;
        inner.stats.active_isolated_processes += 1;
        inner.stats.total_rules_applied += rules_applied;

        Ok(())
    }

    /// Isolates `root_pid` and every descendant in its process tree,
    /// walking `/proc` breadth-first. Children that fail to isolate (e.g.
    /// already exited) are skipped rather than aborting the whole walk.
    pub async fn isolate_process_tree(self: &Arc<Self>, root_pid: i32) -> Result<()> {
        for pid in process_tree(self.process_table.as_ref(), root_pid) {
            let reason = if pid == root_pid { "process tree isolation" } else { "child of isolated process tree" };
            if let Err(e) = self.isolate_process(pid, reason).await {
                tracing::warn!(pid, error = %e, "failed to isolate process in tree");
            }
        }
        Ok(())
    }

    pub async fn restore_process(&self, pid: i32) -> Result<()> {
        let tracked = {
            let mut inner = self.inner.lock().await;
            inner.isolated.remove(&pid).ok_or(IsolatorError::NotIsolated(pid))?
        };

        tracing::info!(pid, "restoring network access");
        self.backend.remove_isolation(pid, &tracked.rules).await?;
        tracked.monitor.abort();

        let mut inner = self.inner.lock().await;
        inner.stats.active_isolated_processes = inner.stats.active_isolated_processes.saturating_sub(1);
        inner.stats.total_cleanup_operations += 1;
        Ok(())
    }

    pub async fn cleanup_all(&self) -> Result<()> {
        let pids: Vec<i32> = self.inner.lock().await.isolated.keys().copied().collect();
        for pid in pids {
            if let Err(e) = self.restore_process(pid).await {
                tracing::warn!(pid, error = %e, "failed to restore process during cleanup");
            }
        }
        self.backend.cleanup_all_rules().await
    }

    async fn watch_for_exit(self: Arc<Self>, pid: i32) {
        loop {
            tokio::time::sleep(EXIT_POLL_INTERVAL).await;
            if !pid_alive(pid) {
                tracing::debug!(pid, "isolated process exited, restoring");
                if let Err(e) = self.restore_process(pid).await {
                    tracing::warn!(pid, error = %e, "failed to auto-restore exited process");
                }
                return;
            }
        }
    }
}

impl Drop for NetworkIsolationManager {
    fn drop(&mut self) {
        // Best-effort: abort exit-monitor tasks so they don't outlive the
        // manager. Firewall rule removal on drop would need an async
        // context we don't have here; callers should call `cleanup_all`
        // explicitly before dropping when that matters.
        if let Ok(inner) = self.inner.try_lock() {
            for tracked in inner.isolated.values() {
                tracked.monitor.abort();
            }
        }
    }
}

fn pid_alive(pid: i32) -> bool {
    std::path::Path::new(&format!("/proc/{pid}")).exists()
}

async fn detect_backend() -> Result<Backend> {
    if NftablesBackend::is_available().await.unwrap_or(false) {
        return Ok(Backend::NFTables);
    }
    if IptablesBackend::is_available().await.unwrap_or(false) {
        return Ok(Backend::IPTables);
    }
    Err(IsolatorError::NoBackendAvailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::MockProcessTable;

    #[tokio::test]
    async fn refuses_to_isolate_critical_process() {
        let table: Arc<dyn ProcessTable> = Arc::new(MockProcessTable::new().with_process(1, "systemd", vec![]));
        let manager = Arc::new(
            NetworkIsolationManager::create_with_table(Backend::NFTables, true, table)
                .await
                .unwrap(),
        );
        let result = manager.isolate_process(1, "test").await;
        assert!(matches!(result, Err(IsolatorError::CriticalProcess(1))));
    }

    #[tokio::test]
    async fn isolate_tracks_statistics_and_restore_clears_them() {
        let table: Arc<dyn ProcessTable> = Arc::new(MockProcessTable::new().with_process(5000, "curl", vec![]));
        let manager = Arc::new(
            NetworkIsolationManager::create_with_table(Backend::NFTables, true, table)
                .await
                .unwrap(),
        );

        manager.isolate_process(5000, "test isolation").await.unwrap();
        assert!(manager.is_process_isolated(5000).await);
        let stats = manager.statistics().await;
        assert_eq!(stats.active_isolated_processes, 1);

        manager.restore_process(5000).await.unwrap();
        assert!(!manager.is_process_isolated(5000).await);
        let stats = manager.statistics().await;
        assert_eq!(stats.active_isolated_processes, 0);
        assert_eq!(stats.total_cleanup_operations, 1);
    }

    #[tokio::test]
    async fn restoring_unisolated_process_errors() {
        let table: Arc<dyn ProcessTable> = Arc::new(MockProcessTable::new());
        let manager = NetworkIsolationManager::create_with_table(Backend::NFTables, true, table)
            .await
            .unwrap();
        let result = manager.restore_process(9999).await;
        assert!(matches!(result, Err(IsolatorError::NotIsolated(9999))));
    }
}
