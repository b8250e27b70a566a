//! Analytics Routes
//!
//! - GET /dashboard/analytics - Analytics dashboard page
//! - GET /api/v1/analytics - Analytics snapshot as JSON

use axum::{extract::State, response::Html, Extension, Json};
use std::sync::Arc;

use crate::analytics::AnalyticsSnapshot;
use crate::api::dto::AnalyticsResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::auth::SessionUser;
use crate::pages::{render, AnalyticsPage};

/// GET /dashboard/analytics
///
/// Renders the dashboard for the signed-in agent.
pub async fn analytics_page(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<SessionUser>>,
) -> ApiResult<Html<String>> {
    let snapshot = snapshot_for(&state, user.as_ref().map(|Extension(u)| u)).await?;
    render(&AnalyticsPage::new(&snapshot)?)
}

/// GET /api/v1/analytics
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<SessionUser>>,
) -> ApiResult<Json<AnalyticsResponse>> {
    let snapshot = snapshot_for(&state, user.as_ref().map(|Extension(u)| u)).await?;

    Ok(Json(AnalyticsResponse {
        analytics: snapshot,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }))
}

/// Without a session (auth disabled) there is no agent to look up
async fn snapshot_for(
    state: &AppState,
    user: Option<&SessionUser>,
) -> ApiResult<AnalyticsSnapshot> {
    match user {
        Some(user) => Ok(state.builder.build(&user.user_id).await?),
        None => Ok(AnalyticsSnapshot::empty()),
    }
}
