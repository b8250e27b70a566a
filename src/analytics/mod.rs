//! Agent Analytics
//!
//! Listing and lead counts for the signed-in agent, gathered from the
//! content store per request and shaped for the dashboard.

mod builder;
mod snapshot;

pub use builder::SnapshotBuilder;
pub use snapshot::{
    display_name, AnalyticsSnapshot, LeadCounts, ListingCounts, PropertyLeadCount,
    PropertyLeads, MAX_PROPERTY_NAME_CHARS, UNKNOWN_PROPERTY_NAME,
};
