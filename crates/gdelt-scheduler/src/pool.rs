//! Fixed-size worker pool over one FIFO queue.

use crate::RegistryError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

pub const DEFAULT_WORKERS: usize = 4;

pub type PoolJob = Pin<Box<dyn Future<Output = ()> + Send>>;

/// `size` workers pull jobs in submission order; at most `size` run at once.
/// Dropping the pool closes the queue and lets workers drain and exit.
pub struct WorkerPool {
    tx: mpsc::UnboundedSender<PoolJob>,
    size: usize,
}

impl WorkerPool {
    /// Spawn the workers. Must be called inside a tokio runtime.
    pub fn new(size: usize) -> Self {
        let size = if size == 0 {
            tracing::warn!("worker pool size 0 requested, using 1");
            1
        } else {
            size
        };
        let (tx, rx) = mpsc::unbounded_channel::<PoolJob>();
        let rx = Arc::new(Mutex::new(rx));
        for worker in 0..size {
            let rx = Arc::clone(&rx);
            tokio::spawn(async move {
                loop {
                    let job = rx.lock().await.recv().await;
                    let Some(job) = job else { break };
                    if let Err(err) = tokio::spawn(job).await {
                        tracing::error!(worker, error = %err, "pool job aborted");
                    }
                }
                tracing::debug!(worker, "worker stopped");
            });
        }
        tracing::info!(workers = size, "worker pool started");
        Self { tx, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Queue a job; never waits for a free worker.
    pub fn execute(&self, job: PoolJob) -> Result<(), RegistryError> {
        self.tx
            .send(job)
            .map_err(|_| RegistryError::Other("worker pool closed".to_string()))
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn zero_size_is_clamped() {
        assert_eq!(WorkerPool::new(0).size(), 1);
    }

    #[tokio::test]
    async fn runs_at_most_size_jobs_at_once() {
        let pool = WorkerPool::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut done = Vec::new();
        for _ in 0..6 {
            let (tx, rx) = oneshot::channel();
            done.push(rx);
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            pool.execute(Box::pin(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                let _ = tx.send(());
            }))
            .unwrap();
        }
        for rx in done {
            rx.await.unwrap();
        }
        assert_eq!(peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn starts_jobs_in_submission_order() {
        let pool = WorkerPool::new(1);
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let (tx, rx) = oneshot::channel();
        for i in 0..5 {
            let order = Arc::clone(&order);
            pool.execute(Box::pin(async move {
                order.lock().unwrap().push(i);
            }))
            .unwrap();
        }
        pool.execute(Box::pin(async move {
            let _ = tx.send(());
        }))
        .unwrap();
        rx.await.unwrap();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn worker_survives_a_panicking_job() {
        let pool = WorkerPool::new(1);
        pool.execute(Box::pin(async {
            panic!("boom");
        }))
        .unwrap();
        let (tx, rx) = oneshot::channel();
        pool.execute(Box::pin(async move {
            let _ = tx.send(7);
        }))
        .unwrap();
        assert_eq!(rx.await.unwrap(), 7);
    }
}
