//! Priority FIFO scan queue.
//!
//! Items are dequeued highest-priority-first; within the same priority,
//! insertion order is preserved. Bounded capacity rejects new work rather
//! than growing unboundedly under load. `pop` blocks via a
//! [`tokio::sync::Notify`] until either work arrives or the queue is shut
//! down, rather than spinning.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};
use std::sync::Mutex;

use tokio::sync::Notify;

use crate::error::{MonitorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScanPriority {
    Low,
    Normal,
    High,
}

struct Job<T> {
    priority: ScanPriority,
    sequence: u64,
    payload: T,
}

impl<T> PartialEq for Job<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}
impl<T> Eq for Job<T> {}

impl<T> PartialOrd for Job<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Job<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher priority sorts first; for equal priority, lower sequence
        // (earlier arrival) sorts first. BinaryHeap is a max-heap, so we
        // reverse the sequence comparison to get FIFO-within-priority.
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

pub struct ScanQueue<T> {
    capacity: usize,
    heap: Mutex<BinaryHeap<Job<T>>>,
    notify: Notify,
    next_sequence: AtomicU64,
    shutdown: AtomicBool,
}

impl<T> ScanQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: Mutex::new(BinaryHeap::new()),
            notify: Notify::new(),
            next_sequence: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        }
    }

    pub fn push(&self, priority: ScanPriority, payload: T) -> Result<()> {
        if self.shutdown.load(AtomicOrdering::SeqCst) {
            return Err(MonitorError::ShuttingDown);
        }
        let mut heap = self.heap.lock().expect("scan queue mutex poisoned");
        if heap.len() >= self.capacity {
            return Err(MonitorError::QueueFull(heap.len()));
        }
        let sequence = self.next_sequence.fetch_add(1, AtomicOrdering::SeqCst);
        heap.push(Job { priority, sequence, payload });
        drop(heap);
        self.notify.notify_one();
        Ok(())
    }

    /// Blocks until an item is available or the queue shuts down, in which
    /// case it drains whatever remains before finally returning `None`.
    pub async fn pop(&self) -> Option<T> {
        loop {
            {
                let mut heap = self.heap.lock().expect("scan queue mutex poisoned");
                if let Some(job) = heap.pop() {
                    return Some(job.payload);
                }
                if self.shutdown.load(AtomicOrdering::SeqCst) {
                    return None;
                }
            }
            self.notify.notified().await;
        }
    }

    pub fn shutdown(&self) {
        self.shutdown.store(true, AtomicOrdering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn len(&self) -> usize {
        self.heap.lock().expect("scan queue mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn high_priority_dequeues_before_low() {
        let queue: ScanQueue<&str> = ScanQueue::new(10);
        queue.push(ScanPriority::Low, "low").unwrap();
        queue.push(ScanPriority::High, "high").unwrap();
        queue.push(ScanPriority::Normal, "normal").unwrap();

        let first = queue.heap.lock().unwrap().pop().map(|job| job.payload);
        assert_eq!(first, Some("high"));
    }

    #[test]
    fn fifo_within_same_priority() {
        let queue: ScanQueue<u32> = ScanQueue::new(10);
        for i in 0..5 {
            queue.push(ScanPriority::Normal, i).unwrap();
        }
        let mut seen = Vec::new();
        while let Some(job) = queue.heap.lock().unwrap().pop() {
            seen.push(job.payload);
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn rejects_when_at_capacity() {
        let queue: ScanQueue<u32> = ScanQueue::new(2);
        queue.push(ScanPriority::Normal, 1).unwrap();
        queue.push(ScanPriority::Normal, 2).unwrap();
        assert!(matches!(queue.push(ScanPriority::Normal, 3), Err(MonitorError::QueueFull(2))));
    }

    #[tokio::test]
    async fn pop_blocks_until_push() {
        let queue = Arc::new(ScanQueue::<u32>::new(10));
        let consumer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.pop().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.push(ScanPriority::Normal, 42).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result, Some(42));
    }

    #[tokio::test]
    async fn shutdown_wakes_waiters_with_none() {
        let queue = Arc::new(ScanQueue::<u32>::new(10));
        let consumer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.pop().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.shutdown();
        let result = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn push_after_shutdown_errors() {
        let queue: ScanQueue<u32> = ScanQueue::new(10);
        queue.shutdown();
        assert!(matches!(queue.push(ScanPriority::Normal, 1), Err(MonitorError::ShuttingDown)));
    }
}
