//! Realty Desk HTTP Server
//!
//! Pages and JSON API, built with Axum.
//!
//! # Endpoints
//!
//! ## Pages
//! - `GET /dashboard/analytics` - Analytics dashboard (session required)
//! - `GET /sign-up`, `GET /sign-up/*` - Hosted sign-up widget
//!
//! ## API
//! - `GET /api/v1/analytics` - Analytics snapshot (session required)
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use realty_desk::analytics::SnapshotBuilder;
//! use realty_desk::api::{serve, AppState};
//! use realty_desk::auth::SessionGate;
//! use realty_desk::config::Config;
//! use realty_desk::content::SanityClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default().config;
//!     let store = Arc::new(SanityClient::new(config.content.clone())?);
//!     let builder = Arc::new(SnapshotBuilder::new(store));
//!
//!     let state = AppState::new(builder, config.server, config.auth, SessionGate::disabled());
//!     serve(state).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{require_page_session, require_session};

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let gate = state.session.clone();

    let api_routes = Router::new()
        .route("/analytics", get(routes::analytics::get_analytics))
        .route_layer(middleware::from_fn_with_state(gate.clone(), require_session));

    let dashboard_routes = Router::new()
        .route("/analytics", get(routes::analytics::analytics_page))
        .route_layer(middleware::from_fn_with_state(gate, require_page_session));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.server.cors_origins);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .route("/sign-up", get(routes::sign_up::sign_up_page))
        .route("/sign-up/*rest", get(routes::sign_up::sign_up_page))
        .nest("/dashboard", dashboard_routes)
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Explicit origins when configured, permissive otherwise
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Start the HTTP server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.server.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Realty Desk listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Realty Desk shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::SnapshotBuilder;
    use crate::auth::SessionGate;
    use crate::config::{AuthConfig, ServerConfig};
    use crate::content::testing::MemoryStore;
    use crate::content::AnalyticsQuery;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn sample_store() -> MemoryStore {
        MemoryStore::with_agent("agent-7")
            .set(AnalyticsQuery::ListingsTotal, json!(5))
            .set(AnalyticsQuery::ListingsActive, json!(3))
            .set(AnalyticsQuery::ListingsPending, json!(1))
            .set(AnalyticsQuery::ListingsSold, json!(1))
            .set(AnalyticsQuery::LeadsTotal, json!(8))
            .set(AnalyticsQuery::LeadsNew, json!(4))
            .set(AnalyticsQuery::LeadsContacted, json!(3))
            .set(AnalyticsQuery::LeadsClosed, json!(1))
            .set(
                AnalyticsQuery::LeadsByProperty,
                json!([{ "title": "Waterfront Penthouse Suite 12B", "leadCount": 5 }]),
            )
    }

    fn create_test_app(store: MemoryStore, auth_enabled: bool) -> Router {
        let builder = Arc::new(SnapshotBuilder::new(Arc::new(store)));
        let auth = AuthConfig {
            publishable_key: "pk_test_realty".to_string(),
            ..crate::auth::clerk_test_support::test_auth_config()
        };
        let gate = if auth_enabled {
            SessionGate::new(
                Arc::new(crate::auth::clerk_test_support::test_verifier()),
                auth.resolved_sign_in_url(),
            )
        } else {
            SessionGate::disabled()
        };

        let state = AppState::new(builder, ServerConfig::default(), auth, gate);
        build_router(state)
    }

    async fn send_get(app: Router, uri: &str, token: Option<&str>) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        app.oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app(MemoryStore::default(), true);
        let response = send_get(app, "/health/live", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let app = create_test_app(MemoryStore::default(), true);
        let response = send_get(app, "/health/ready", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = create_test_app(MemoryStore::default(), false);
        let response = send_get(app, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["auth"], "disabled");
    }

    #[tokio::test]
    async fn test_analytics_requires_session() {
        let app = create_test_app(sample_store(), true);
        let response = send_get(app, "/api/v1/analytics", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_analytics_rejects_bad_token() {
        let app = create_test_app(sample_store(), true);
        let response = send_get(app, "/api/v1/analytics", Some("garbage")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_analytics_json() {
        let app = create_test_app(sample_store(), true);
        let token = crate::auth::clerk_test_support::session_token_for("user_abc");
        let response = send_get(app, "/api/v1/analytics", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let analytics = &body["analytics"];
        assert_eq!(analytics["listings"]["total"], 5);
        assert_eq!(analytics["leads"]["contacted"], 3);
        assert_eq!(
            analytics["leadsByProperty"][0]["name"],
            "Waterfront Penthouse..."
        );
        assert!(body["generated_at"].is_string());
    }

    #[tokio::test]
    async fn test_analytics_uses_session_user() {
        let store = Arc::new(sample_store());
        let builder = Arc::new(SnapshotBuilder::new(store.clone()));
        let auth = crate::auth::clerk_test_support::test_auth_config();
        let gate = SessionGate::new(
            Arc::new(crate::auth::clerk_test_support::test_verifier()),
            "/sign-in",
        );
        let app = build_router(AppState::new(builder, ServerConfig::default(), auth, gate));

        let token = crate::auth::clerk_test_support::session_token_for("user_xyz");
        let response = send_get(app, "/api/v1/analytics", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let calls = store.calls();
        assert_eq!(calls[0].1.get("userId"), Some(&json!("user_xyz")));
    }

    #[tokio::test]
    async fn test_analytics_query_failure_is_bad_gateway() {
        let store = sample_store().fail(AnalyticsQuery::LeadsClosed);
        let app = create_test_app(store, true);
        let token = crate::auth::clerk_test_support::session_token_for("user_abc");

        let response = send_get(app, "/api/v1/analytics", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "CONTENT_STORE_ERROR");
        assert!(body.get("analytics").is_none());
    }

    #[tokio::test]
    async fn test_dashboard_redirects_anonymous() {
        let app = create_test_app(sample_store(), true);
        let response = send_get(app, "/dashboard/analytics", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()["location"],
            "https://accounts.example.com/sign-in"
        );
    }

    #[tokio::test]
    async fn test_dashboard_page_renders() {
        let app = create_test_app(sample_store(), true);
        let token = crate::auth::clerk_test_support::session_token_for("user_abc");
        let response = send_get(app, "/dashboard/analytics", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("<title>Analytics</title>"));
        assert!(html.contains("Waterfront Penthouse..."));
    }

    #[tokio::test]
    async fn test_analytics_without_auth_is_empty() {
        let store = Arc::new(sample_store());
        let builder = Arc::new(SnapshotBuilder::new(store.clone()));
        let app = build_router(AppState::new(
            builder,
            ServerConfig::default(),
            AuthConfig::default(),
            SessionGate::disabled(),
        ));

        let response = send_get(app, "/api/v1/analytics", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["analytics"]["listings"]["total"], 0);
        assert_eq!(body["analytics"]["leadsByProperty"], json!([]));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sign_up_is_public() {
        let app = create_test_app(MemoryStore::default(), true);
        let response = send_get(app, "/sign-up", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains(r#"data-clerk-publishable-key="pk_test_realty""#));
    }

    #[tokio::test]
    async fn test_sign_up_catch_all() {
        let app = create_test_app(MemoryStore::default(), true);
        let response = send_get(app, "/sign-up/verify-email-address", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
