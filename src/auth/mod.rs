//! Session Authentication
//!
//! The identity provider owns sign-in; this module only verifies the session
//! token it issues and exposes the signed-in user to handlers.
//!
//! - [`SessionVerifier`]: async seam, one implementation per provider
//! - [`ClerkVerifier`]: RS256 session JWTs checked against the provider's JWKS
//! - [`require_session`] / [`require_page_session`]: axum middleware

mod clerk;
mod error;
mod middleware;

pub use clerk::{ClerkVerifier, Jwk};
pub use error::AuthError;
pub use middleware::{require_page_session, require_session, session_token, SessionGate};

#[cfg(test)]
pub(crate) use clerk::tests as clerk_test_support;

use async_trait::async_trait;

/// The signed-in user, inserted into request extensions by the middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    /// Provider user id (the `sub` claim)
    pub user_id: String,
    /// Provider session id (the `sid` claim), when present
    pub session_id: Option<String>,
}

/// Verifies a session token and returns the user it belongs to
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<SessionUser, AuthError>;
}
