//! Content Store Integration
//!
//! Read-only access to the headless content store that owns agents,
//! listings and leads.
//!
//! ## Architecture
//!
//! - **ContentStore**: async seam the analytics builder depends on
//! - **SanityClient**: HTTP implementation against the GROQ query API
//! - **queries**: catalogue of the GROQ queries the dashboard issues

mod client;
mod error;
pub mod queries;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use client::SanityClient;
pub use error::ContentError;
pub use queries::AnalyticsQuery;
pub use store::{fetch_as, ContentStore, QueryParams};
