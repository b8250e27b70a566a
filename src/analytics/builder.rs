//! Snapshot Builder
//!
//! Resolves the signed-in user's agent record and gathers the nine
//! agent-scoped analytics queries concurrently.

use serde::Deserialize;
use std::sync::Arc;

use super::snapshot::{
    AnalyticsSnapshot, LeadCounts, ListingCounts, PropertyLeadCount, PropertyLeads,
};
use crate::content::queries::AGENT_ID_BY_USER_QUERY;
use crate::content::{fetch_as, AnalyticsQuery, ContentError, ContentStore, QueryParams};

/// Builds analytics snapshots from the content store
pub struct SnapshotBuilder {
    store: Arc<dyn ContentStore>,
}

/// Projection returned by the agent lookup
#[derive(Debug, Deserialize)]
struct AgentRef {
    #[serde(rename = "_id", default)]
    id: Option<String>,
}

impl SnapshotBuilder {
    /// Create a new snapshot builder
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Access the underlying content store
    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// Resolve a user id to its agent id, if the user has an agent record
    pub async fn resolve_agent(&self, user_id: &str) -> Result<Option<String>, ContentError> {
        let params = QueryParams::new().with("userId", user_id);
        let agent: Option<AgentRef> =
            fetch_as(self.store.as_ref(), AGENT_ID_BY_USER_QUERY, &params).await?;

        Ok(agent
            .and_then(|a| a.id)
            .filter(|id| !id.is_empty()))
    }

    /// Build the analytics snapshot for a user.
    ///
    /// Users without an agent record get [`AnalyticsSnapshot::empty`]. If any
    /// of the scoped queries fails, the whole build fails.
    pub async fn build(&self, user_id: &str) -> Result<AnalyticsSnapshot, ContentError> {
        let Some(agent_id) = self.resolve_agent(user_id).await? else {
            tracing::debug!(user_id = %user_id, "No agent record, returning empty analytics");
            return Ok(AnalyticsSnapshot::empty());
        };

        let snapshot = self.build_for_agent(&agent_id).await?;

        tracing::debug!(
            user_id = %user_id,
            agent_id = %agent_id,
            listings = snapshot.listings.total,
            leads = snapshot.leads.total,
            properties = snapshot.leads_by_property.len(),
            "Built analytics snapshot"
        );

        Ok(snapshot)
    }

    /// Gather all scoped queries for a known agent id
    pub async fn build_for_agent(&self, agent_id: &str) -> Result<AnalyticsSnapshot, ContentError> {
        let params = QueryParams::new().with("agentId", agent_id);

        let (
            listings_total,
            listings_active,
            listings_pending,
            listings_sold,
            leads_total,
            leads_new,
            leads_contacted,
            leads_closed,
            leads_by_property,
        ) = tokio::try_join!(
            self.count(AnalyticsQuery::ListingsTotal, &params),
            self.count(AnalyticsQuery::ListingsActive, &params),
            self.count(AnalyticsQuery::ListingsPending, &params),
            self.count(AnalyticsQuery::ListingsSold, &params),
            self.count(AnalyticsQuery::LeadsTotal, &params),
            self.count(AnalyticsQuery::LeadsNew, &params),
            self.count(AnalyticsQuery::LeadsContacted, &params),
            self.count(AnalyticsQuery::LeadsClosed, &params),
            self.leads_by_property(&params),
        )?;

        Ok(AnalyticsSnapshot {
            listings: ListingCounts {
                total: listings_total,
                active: listings_active,
                pending: listings_pending,
                sold: listings_sold,
            },
            leads: LeadCounts {
                total: leads_total,
                new: leads_new,
                contacted: leads_contacted,
                closed: leads_closed,
            },
            leads_by_property: leads_by_property
                .into_iter()
                .map(PropertyLeads::from)
                .collect(),
        })
    }

    async fn count(&self, query: AnalyticsQuery, params: &QueryParams) -> Result<u64, ContentError> {
        fetch_as(self.store.as_ref(), query.groq(), params)
            .await
            .map_err(|e| {
                tracing::warn!(query = %query, error = %e, "Analytics query failed");
                e
            })
    }

    async fn leads_by_property(
        &self,
        params: &QueryParams,
    ) -> Result<Vec<PropertyLeadCount>, ContentError> {
        let query = AnalyticsQuery::LeadsByProperty;
        let rows: Option<Vec<PropertyLeadCount>> =
            fetch_as(self.store.as_ref(), query.groq(), params)
                .await
                .map_err(|e| {
                    tracing::warn!(query = %query, error = %e, "Analytics query failed");
                    e
                })?;
        Ok(rows.unwrap_or_default())
    }
}
