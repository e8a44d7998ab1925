//! Bounded worker pool that drains a [`ScanQueue`], running each job
//! through a caller-supplied handler with a per-scan timeout.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::queue::ScanQueue;

#[derive(Debug, Default)]
pub struct PoolTelemetry {
    pub completed: AtomicU64,
    pub timed_out: AtomicU64,
    pub failed: AtomicU64,
}

pub struct ScanWorkerPool<T> {
    queue: Arc<ScanQueue<T>>,
    telemetry: Arc<PoolTelemetry>,
    handles: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> ScanWorkerPool<T> {
    /// Spawns `workers` tasks, each looping on `queue.pop()` and invoking
    /// `handler` for every job with a `timeout` budget. `handler` errors
    /// are counted in telemetry but never stop the worker loop: one bad
    /// job should not take down the whole pool.
    pub fn spawn<F, Fut, E>(queue: Arc<ScanQueue<T>>, workers: usize, timeout: Duration, handler: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send,
        E: std::fmt::Display,
    {
        let telemetry = Arc::new(PoolTelemetry::default());
        let handler = Arc::new(handler);
        let mut handles = Vec::with_capacity(workers);

        for worker_id in 0..workers {
            let queue = queue.clone();
            let telemetry = telemetry.clone();
            let handler = handler.clone();
            handles.push(tokio::spawn(async move {
                while let Some(job) = queue.pop().await {
                    match tokio::time::timeout(timeout, handler(job)).await {
                        Ok(Ok(())) => {
                            telemetry.completed.fetch_add(1, Ordering::Relaxed);
                        }
                        Ok(Err(err)) => {
                            telemetry.failed.fetch_add(1, Ordering::Relaxed);
                            tracing::warn!(worker_id, error = %err, "scan job failed");
                        }
                        Err(_) => {
                            telemetry.timed_out.fetch_add(1, Ordering::Relaxed);
                            tracing::warn!(worker_id, ?timeout, "scan job timed out");
                        }
                    }
                }
            }));
        }

        Self { queue, telemetry, handles }
    }

    pub fn telemetry(&self) -> Arc<PoolTelemetry> {
        self.telemetry.clone()
    }

    /// Signals the queue to shut down and waits for every worker to drain
    /// remaining jobs and exit.
    pub async fn shutdown(self) {
        self.queue.shutdown();
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::ScanPriority;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    #[tokio::test]
    async fn processes_all_jobs_and_shuts_down_cleanly() {
        let queue = Arc::new(ScanQueue::<u32>::new(100));
        let processed = Arc::new(AtomicU32::new(0));
        let processed_clone = processed.clone();

        for i in 0..10 {
            queue.push(ScanPriority::Normal, i).unwrap();
        }

        let pool = ScanWorkerPool::spawn(queue.clone(), 4, Duration::from_secs(1), move |_job| {
            let processed = processed_clone.clone();
            async move {
                processed.fetch_add(1, Ordering::SeqCst);
                Ok::<(), String>(())
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        pool.shutdown().await;
        assert_eq!(processed.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn slow_job_counted_as_timed_out() {
        let queue = Arc::new(ScanQueue::<u32>::new(10));
        queue.push(ScanPriority::Normal, 1).unwrap();

        let pool = ScanWorkerPool::spawn(queue.clone(), 1, Duration::from_millis(10), |_job| async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<(), String>(())
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        let telemetry = pool.telemetry();
        pool.shutdown().await;
        assert_eq!(telemetry.timed_out.load(Ordering::SeqCst), 1);
    }
}
