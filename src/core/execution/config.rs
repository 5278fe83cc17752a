//! Configuration for running independent replications of a simulation
//!
//! A single run is always sequential; these settings only decide whether
//! several seeded replications share one thread or a rayon pool.

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Replications run one after another on the calling thread
    #[default]
    Sequential,
    /// Replications run in parallel on a rayon pool
    Rayon,
}

#[derive(Debug, Clone, Default)]
pub struct ReplicationConfig {
    pub concurrency_mode: ConcurrencyMode,
    /// Size of a dedicated rayon pool. `None` uses the global pool.
    /// Ignored in `Sequential` mode.
    pub thread_pool_size: Option<usize>,
}

impl ReplicationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }
}
