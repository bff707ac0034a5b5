//! The connection dispatcher: accept loop, state machine, graceful
//! shutdown (spec §4.5).
//!
//! Grounded on `server/server.rs`'s `Server`/`Runtime` split — that
//! server owned a `Vec<Service<A>>`, each run on its own runtime; this
//! dispatcher owns exactly one listening socket and drives its accept
//! loop directly on the ambient runtime, since the spec describes a
//! single listener, not a fan-out of services.

use crate::config::{Config, SHUTDOWN_GRACE};
use crate::error::Result;
use crate::listener;
use crate::pool::WorkerPool;
use crate::session::{self, Shared};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, Notify};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running = 0,
    Draining = 1,
    Stopped = 2,
}

/// Accepts connections, hands each to the worker pool, and tracks the
/// `RUNNING -> DRAINING -> STOPPED` lifecycle.
pub struct Dispatcher {
    listener: Mutex<Option<TcpListener>>,
    pool: WorkerPool,
    shared: Shared,
    state: AtomicU8,
    shutdown: Notify,
}

impl Dispatcher {
    pub async fn bind(config: &Config, shared: Shared) -> Result<Arc<Self>> {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = listener::bind(addr).await?;
        tracing::info!(%addr, "listening");

        Ok(Arc::new(Dispatcher {
            listener: Mutex::new(Some(listener)),
            pool: WorkerPool::new(config.max_workers),
            shared,
            state: AtomicU8::new(State::Running as u8),
            shutdown: Notify::new(),
        }))
    }

    pub fn state(&self) -> State {
        match self.state.load(Ordering::SeqCst) {
            0 => State::Running,
            1 => State::Draining,
            _ => State::Stopped,
        }
    }

    /// Flip to `DRAINING`, close the listening socket (the accept loop's
    /// shutdown signal per spec §4.5), and wake the accept loop. Uses
    /// `notify_one` rather than `notify_waiters`: that stores a permit
    /// when nobody is currently parked on `notified()`, so a signal
    /// raised while the loop is blocked inside `pool.submit(...).await`
    /// (all workers busy) is not lost — the loop's next `notified()`
    /// call resolves immediately instead of waiting for another
    /// connection to arrive.
    pub async fn request_shutdown(&self) {
        self.state.store(State::Draining as u8, Ordering::SeqCst);
        self.listener.lock().await.take();
        self.shutdown.notify_one();
    }

    /// Run the accept loop until shutdown is requested, then drain the
    /// worker pool and transition to `STOPPED`.
    pub async fn run(self: Arc<Self>) {
        loop {
            if self.state() == State::Draining {
                break;
            }

            tokio::select! {
                _ = self.shutdown.notified() => break,
                accepted = self.accept_once() => {
                    match accepted {
                        Some(Ok((stream, peer))) => {
                            tracing::debug!(%peer, "accepted connection");
                            let shared = self.shared.clone();
                            self.pool.submit(async move {
                                session::handle(stream, shared).await;
                            }).await;
                        }
                        Some(Err(e)) => {
                            if self.state() == State::Running {
                                tracing::warn!(error = %e, "accept failed");
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        tracing::info!("draining in-flight workers");
        self.pool.shutdown(SHUTDOWN_GRACE).await;
        self.state.store(State::Stopped as u8, Ordering::SeqCst);
        tracing::info!("stopped");
    }

    /// Accept on the listening socket if it is still open. Returns
    /// `None` once the socket has been closed by [`request_shutdown`],
    /// which ends the accept loop without racing a fresh `accept` call
    /// against a dropped listener.
    async fn accept_once(&self) -> Option<std::io::Result<(TcpStream, std::net::SocketAddr)>> {
        let guard = self.listener.lock().await;
        match guard.as_ref() {
            Some(listener) => Some(listener::accept(listener).await),
            None => None,
        }
    }
}
