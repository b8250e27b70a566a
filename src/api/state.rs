//! Application State
//!
//! Shared state accessible by all handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::analytics::SnapshotBuilder;
use crate::auth::SessionGate;
use crate::config::{AuthConfig, ServerConfig};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Analytics snapshot builder over the content store
    pub builder: Arc<SnapshotBuilder>,
    /// Server configuration (bind address, CORS)
    pub server: Arc<ServerConfig>,
    /// Identity provider settings used by the sign-up page
    pub auth: Arc<AuthConfig>,
    /// Session verification for protected routes
    pub session: SessionGate,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        builder: Arc<SnapshotBuilder>,
        server: ServerConfig,
        auth: AuthConfig,
        session: SessionGate,
    ) -> Self {
        Self {
            builder,
            server: Arc::new(server),
            auth: Arc::new(auth),
            session,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
