//! # Realty Desk
//!
//! Agent-facing pages of a real-estate web application: an analytics
//! dashboard over a headless content store, and a sign-up page hosting the
//! identity provider's widget.
//!
//! ## Modules
//!
//! - [`content`]: Content-store client and GROQ query catalogue
//! - [`analytics`]: Snapshot model and the concurrent snapshot builder
//! - [`auth`]: Session token verification and middleware
//! - [`pages`]: HTML views
//! - [`api`]: HTTP server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use realty_desk::analytics::SnapshotBuilder;
//! use realty_desk::config::ContentConfig;
//! use realty_desk::content::SanityClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SanityClient::new(ContentConfig {
//!         project_id: "abc123".to_string(),
//!         ..Default::default()
//!     })?;
//!     let builder = SnapshotBuilder::new(Arc::new(store));
//!
//!     let snapshot = builder.build("user_2abc").await?;
//!     println!(
//!         "{} listings, {} leads",
//!         snapshot.listings.total, snapshot.leads.total
//!     );
//!
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod auth;
pub mod config;
pub mod content;
pub mod pages;

// Re-export top-level types for convenience
pub use analytics::{
    display_name, AnalyticsSnapshot, LeadCounts, ListingCounts, PropertyLeads, SnapshotBuilder,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use auth::{AuthError, ClerkVerifier, SessionGate, SessionUser, SessionVerifier};

pub use config::{
    generate_default_config, AuthConfig, Config, ConfigError, ContentConfig, LoadedConfig,
    LoggingConfig, ServerConfig,
};

pub use content::{AnalyticsQuery, ContentError, ContentStore, QueryParams, SanityClient};
