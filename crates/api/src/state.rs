//! Application state for the API server.

use alchemy_coordinator::{Coordinator, CoordinatorConfig};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for the API server.
///
/// The coordinator is immutable after construction, so requests share it
/// without locking.
pub struct AppState {
    pub coordinator: Arc<Coordinator>,

    /// Server start time (for health checks)
    pub start_time: Instant,
}

impl AppState {
    /// Build the coordinator described by `config`.
    pub fn new(config: &CoordinatorConfig) -> alchemy_common::Result<Self> {
        Ok(Self::with_coordinator(Coordinator::from_config(config)?))
    }

    pub fn with_coordinator(coordinator: Coordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
