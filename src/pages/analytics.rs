use askama::Template;

use super::{script_json, PageMeta};
use crate::analytics::{AnalyticsSnapshot, LeadCounts, ListingCounts};
use crate::api::ApiResult;

/// One bar in the leads-by-property chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyBar {
    pub name: String,
    pub leads: u64,
    /// Width relative to the busiest property, 0-100
    pub percent: u64,
}

/// Analytics dashboard page
#[derive(Template)]
#[template(path = "analytics.html")]
pub struct AnalyticsPage {
    pub meta: PageMeta,
    pub listings: ListingCounts,
    pub leads: LeadCounts,
    pub bars: Vec<PropertyBar>,
    /// Snapshot as JSON for client-side charts
    pub data_json: String,
}

impl AnalyticsPage {
    pub const META: PageMeta = PageMeta {
        title: "Analytics",
        description: "View your performance metrics and insights.",
    };

    pub fn new(snapshot: &AnalyticsSnapshot) -> ApiResult<Self> {
        let busiest = snapshot
            .leads_by_property
            .iter()
            .map(|p| p.leads)
            .max()
            .unwrap_or(0);

        let bars = snapshot
            .leads_by_property
            .iter()
            .map(|p| PropertyBar {
                name: p.name.clone(),
                leads: p.leads,
                percent: bar_percent(p.leads, busiest),
            })
            .collect();

        Ok(Self {
            meta: Self::META,
            listings: snapshot.listings,
            leads: snapshot.leads,
            bars,
            data_json: script_json(snapshot)?,
        })
    }
}

/// Share of `busiest` as a whole percentage; widened so huge counts cannot overflow
fn bar_percent(leads: u64, busiest: u64) -> u64 {
    if busiest == 0 {
        return 0;
    }
    (u128::from(leads) * 100 / u128::from(busiest)) as u64
}
