//! Data Transfer Objects
//!
//! Response types for the JSON endpoints.

use serde::Serialize;

use crate::analytics::AnalyticsSnapshot;

/// GET /api/v1/analytics response
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub analytics: AnalyticsSnapshot,
    /// RFC 3339 timestamp of when the counts were read
    pub generated_at: String,
}

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Content store status: ok, error
    pub content_store: String,
    /// Session verification: enabled, disabled
    pub auth: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
