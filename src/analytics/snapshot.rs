//! Analytics snapshot data model.

use serde::{Deserialize, Serialize};

/// Longest property title shown before truncation
pub const MAX_PROPERTY_NAME_CHARS: usize = 20;

/// Name shown when a listing has no title
pub const UNKNOWN_PROPERTY_NAME: &str = "Unknown";

/// Aggregated analytics for one agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub listings: ListingCounts,
    pub leads: LeadCounts,
    pub leads_by_property: Vec<PropertyLeads>,
}

/// Listing counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingCounts {
    pub total: u64,
    pub active: u64,
    pub pending: u64,
    pub sold: u64,
}

/// Lead counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadCounts {
    pub total: u64,
    pub new: u64,
    pub contacted: u64,
    pub closed: u64,
}

/// One row of the leads-by-property chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyLeads {
    pub name: String,
    pub leads: u64,
}

/// Raw row as returned by the leads-by-property query
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyLeadCount {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub lead_count: u64,
}

impl AnalyticsSnapshot {
    /// All-zero snapshot for users without an agent record
    pub fn empty() -> Self {
        Self::default()
    }
}

impl From<PropertyLeadCount> for PropertyLeads {
    fn from(row: PropertyLeadCount) -> Self {
        Self {
            name: display_name(row.title.as_deref()),
            leads: row.lead_count,
        }
    }
}

/// Chart label for a property title.
///
/// Titles longer than [`MAX_PROPERTY_NAME_CHARS`] characters keep their first
/// 20 characters followed by `...`. A missing title becomes `"Unknown"`; an
/// empty title stays empty.
pub fn display_name(title: Option<&str>) -> String {
    match title {
        None => UNKNOWN_PROPERTY_NAME.to_string(),
        Some(title) => match title.char_indices().nth(MAX_PROPERTY_NAME_CHARS) {
            Some((cut, _)) => format!("{}...", &title[..cut]),
            None => title.to_string(),
        },
    }
}
