//! Runtime configuration, shared between the binary's CLI parsing and
//! the library's server/pool/cache wiring.

use crate::cache::DEFAULT_CAPACITY;
use crate::pool::DEFAULT_MAX_WORKERS;
use std::time::Duration;

/// Grace period the dispatcher waits for in-flight workers to finish
/// before forcibly aborting them (spec §4.5).
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub max_workers: usize,
    pub cache_capacity: usize,
}

impl Config {
    pub fn new(port: u16) -> Self {
        Config {
            port,
            max_workers: DEFAULT_MAX_WORKERS,
            cache_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(8080)
    }
}
