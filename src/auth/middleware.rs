//! Session middleware.
//!
//! Reads the session token from `Authorization: Bearer` or the `__session`
//! cookie, verifies it, and stores the [`SessionUser`] in request extensions.
//! With auth disabled every request passes through without a user.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use super::{AuthError, SessionUser, SessionVerifier};
use crate::api::ApiError;

/// Session cookie set by the identity provider's browser SDK
const SESSION_COOKIE: &str = "__session";

/// Verifier plus what to do with anonymous page requests
#[derive(Clone)]
pub struct SessionGate {
    verifier: Option<Arc<dyn SessionVerifier>>,
    sign_in_url: String,
}

impl SessionGate {
    pub fn new(verifier: Arc<dyn SessionVerifier>, sign_in_url: impl Into<String>) -> Self {
        Self {
            verifier: Some(verifier),
            sign_in_url: sign_in_url.into(),
        }
    }

    /// Dev mode: no verification, no user
    pub fn disabled() -> Self {
        Self {
            verifier: None,
            sign_in_url: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.verifier.is_some()
    }

    /// `Ok(None)` only when auth is disabled
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<SessionUser>, AuthError> {
        let Some(verifier) = &self.verifier else {
            return Ok(None);
        };
        let token = session_token(headers).ok_or(AuthError::MissingToken)?;
        verifier.verify(token).await.map(Some)
    }
}

/// Extract the session token from the request headers
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value)
}

/// API routes: anonymous requests get 401
pub async fn require_session(
    State(gate): State<SessionGate>,
    mut req: Request,
    next: Next,
) -> Response {
    let headers = req.headers().clone();
    match gate.authenticate(&headers).await {
        Ok(user) => {
            if let Some(user) = user {
                req.extensions_mut().insert(user);
            }
            next.run(req).await
        }
        Err(e) => {
            tracing::warn!(path = %req.uri().path(), "Authentication failed: {}", e);
            ApiError::Unauthorized(e.to_string()).into_response()
        }
    }
}

/// Page routes: anonymous requests are sent to sign-in
pub async fn require_page_session(
    State(gate): State<SessionGate>,
    mut req: Request,
    next: Next,
) -> Response {
    let headers = req.headers().clone();
    match gate.authenticate(&headers).await {
        Ok(user) => {
            if let Some(user) = user {
                req.extensions_mut().insert(user);
            }
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(path = %req.uri().path(), "Redirecting to sign-in: {}", e);
            Redirect::to(&gate.sign_in_url).into_response()
        }
    }
}
