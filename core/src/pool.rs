//! Bounded-parallelism worker pool for connection handling.
//!
//! Grounded on `server/server.rs`'s `Runtime`/`Server` split and
//! `pool/pool.rs`'s general shape of tracking in-flight work through a
//! shared primitive rather than joining threads by hand — adapted here
//! to `tokio::sync::Semaphore` (bounds concurrent handlers at
//! `MAX_WORKERS`, and the accept loop naturally queues by blocking on
//! `acquire` when saturated, matching spec §4.5/§9's "unbounded
//! internal queue feeding bounded workers") plus a `JoinSet` so shutdown
//! can force-abort stragglers after the grace period.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;

/// Default fixed worker-pool parallelism (spec §4.5).
pub const DEFAULT_MAX_WORKERS: usize = 400;

pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    tasks: Mutex<JoinSet<()>>,
}

impl WorkerPool {
    pub fn new(max_workers: usize) -> Self {
        WorkerPool {
            semaphore: Arc::new(Semaphore::new(max_workers)),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Submit a job for a worker to run. Blocks (queueing the caller,
    /// typically the accept loop) until a worker slot is free.
    pub async fn submit<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("worker pool semaphore never closes while the pool is alive");

        let mut tasks = self.tasks.lock().await;
        tasks.spawn(async move {
            job.await;
            drop(permit);
        });
    }

    /// Ask every in-flight worker to finish within `grace`. Workers
    /// still running past the deadline are forcibly aborted.
    pub async fn shutdown(&self, grace: Duration) {
        let deadline = tokio::time::Instant::now() + grace;
        let mut tasks = self.tasks.lock().await;

        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(_)) => continue,
                Ok(None) => {
                    tracing::info!("worker pool drained within the grace period");
                    break;
                }
                Err(_) => {
                    let remaining = tasks.len();
                    tracing::warn!(remaining, "grace period elapsed, forcing worker termination");
                    tasks.abort_all();
                    while tasks.join_next().await.is_some() {}
                    break;
                }
            }
        }
    }
}
