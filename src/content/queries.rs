//! GROQ query catalogue
//!
//! Every analytics query takes a single `$agentId` parameter. Listings and
//! leads reference their agent through `agent._ref`; leads reference the
//! listing they enquired about through `property._ref`.

/// Resolve a user id to the agent document owned by that user
pub const AGENT_ID_BY_USER_QUERY: &str =
    r#"*[_type == "agent" && userId == $userId][0]{ _id }"#;

pub const ANALYTICS_LISTINGS_TOTAL_QUERY: &str =
    r#"count(*[_type == "listing" && agent._ref == $agentId])"#;

pub const ANALYTICS_LISTINGS_ACTIVE_QUERY: &str =
    r#"count(*[_type == "listing" && agent._ref == $agentId && status == "active"])"#;

pub const ANALYTICS_LISTINGS_PENDING_QUERY: &str =
    r#"count(*[_type == "listing" && agent._ref == $agentId && status == "pending"])"#;

pub const ANALYTICS_LISTINGS_SOLD_QUERY: &str =
    r#"count(*[_type == "listing" && agent._ref == $agentId && status == "sold"])"#;

pub const ANALYTICS_LEADS_TOTAL_QUERY: &str =
    r#"count(*[_type == "lead" && agent._ref == $agentId])"#;

pub const ANALYTICS_LEADS_NEW_QUERY: &str =
    r#"count(*[_type == "lead" && agent._ref == $agentId && status == "new"])"#;

pub const ANALYTICS_LEADS_CONTACTED_QUERY: &str =
    r#"count(*[_type == "lead" && agent._ref == $agentId && status == "contacted"])"#;

pub const ANALYTICS_LEADS_CLOSED_QUERY: &str =
    r#"count(*[_type == "lead" && agent._ref == $agentId && status == "closed"])"#;

/// Top five listings by lead count
pub const ANALYTICS_LEADS_BY_PROPERTY_QUERY: &str = r#"*[_type == "listing" && agent._ref == $agentId]{
  title,
  "leadCount": count(*[_type == "lead" && property._ref == ^._id])
} | order(leadCount desc)[0...5]"#;

/// The nine agent-scoped analytics queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyticsQuery {
    ListingsTotal,
    ListingsActive,
    ListingsPending,
    ListingsSold,
    LeadsTotal,
    LeadsNew,
    LeadsContacted,
    LeadsClosed,
    LeadsByProperty,
}

impl AnalyticsQuery {
    pub const ALL: [AnalyticsQuery; 9] = [
        AnalyticsQuery::ListingsTotal,
        AnalyticsQuery::ListingsActive,
        AnalyticsQuery::ListingsPending,
        AnalyticsQuery::ListingsSold,
        AnalyticsQuery::LeadsTotal,
        AnalyticsQuery::LeadsNew,
        AnalyticsQuery::LeadsContacted,
        AnalyticsQuery::LeadsClosed,
        AnalyticsQuery::LeadsByProperty,
    ];

    /// GROQ text for this query
    pub fn groq(&self) -> &'static str {
        match self {
            AnalyticsQuery::ListingsTotal => ANALYTICS_LISTINGS_TOTAL_QUERY,
            AnalyticsQuery::ListingsActive => ANALYTICS_LISTINGS_ACTIVE_QUERY,
            AnalyticsQuery::ListingsPending => ANALYTICS_LISTINGS_PENDING_QUERY,
            AnalyticsQuery::ListingsSold => ANALYTICS_LISTINGS_SOLD_QUERY,
            AnalyticsQuery::LeadsTotal => ANALYTICS_LEADS_TOTAL_QUERY,
            AnalyticsQuery::LeadsNew => ANALYTICS_LEADS_NEW_QUERY,
            AnalyticsQuery::LeadsContacted => ANALYTICS_LEADS_CONTACTED_QUERY,
            AnalyticsQuery::LeadsClosed => ANALYTICS_LEADS_CLOSED_QUERY,
            AnalyticsQuery::LeadsByProperty => ANALYTICS_LEADS_BY_PROPERTY_QUERY,
        }
    }

    /// Stable name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsQuery::ListingsTotal => "listings_total",
            AnalyticsQuery::ListingsActive => "listings_active",
            AnalyticsQuery::ListingsPending => "listings_pending",
            AnalyticsQuery::ListingsSold => "listings_sold",
            AnalyticsQuery::LeadsTotal => "leads_total",
            AnalyticsQuery::LeadsNew => "leads_new",
            AnalyticsQuery::LeadsContacted => "leads_contacted",
            AnalyticsQuery::LeadsClosed => "leads_closed",
            AnalyticsQuery::LeadsByProperty => "leads_by_property",
        }
    }
}

impl std::fmt::Display for AnalyticsQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
