//! Clerk session token verification.
//!
//! Session tokens are short-lived RS256 JWTs. Signing keys come from the
//! instance JWKS endpoint and are cached for an hour; an unknown `kid`
//! forces one refresh so key rotation is picked up immediately.

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::{AuthError, SessionUser, SessionVerifier};
use crate::config::AuthConfig;

/// TTL for cached JWKS keys (1 hour).
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Minimum age of the cache before an unknown `kid` may trigger a refetch.
const JWKS_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// A single RSA JSON Web Key.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kid: String,
    /// RSA modulus (base64url-encoded).
    pub n: String,
    /// RSA exponent (base64url-encoded).
    pub e: String,
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

struct CachedKeys {
    keys: Vec<Jwk>,
    fetched_at: Instant,
}

enum CacheLookup {
    Hit(Jwk),
    Refetch,
    /// Key not cached and the cache is too young (or static) to refetch
    Unknown,
}

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
    #[serde(default)]
    sid: Option<String>,
    #[serde(default)]
    azp: Option<String>,
}

/// Session verifier for Clerk-issued tokens
pub struct ClerkVerifier {
    cached: RwLock<Option<CachedKeys>>,
    jwks_url: String,
    issuer: Option<String>,
    authorized_parties: Vec<String>,
    http_client: Option<reqwest::Client>,
}

impl ClerkVerifier {
    /// Create a verifier from the auth configuration
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            cached: RwLock::new(None),
            jwks_url: config.resolved_jwks_url(),
            issuer: issuer_for(config),
            authorized_parties: config.authorized_parties.clone(),
            http_client: Some(reqwest::Client::new()),
        }
    }

    /// Create a verifier with pre-loaded keys and no network access
    pub fn with_static_keys(config: &AuthConfig, keys: Vec<Jwk>) -> Self {
        Self {
            cached: RwLock::new(Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            })),
            jwks_url: String::new(),
            issuer: issuer_for(config),
            authorized_parties: config.authorized_parties.clone(),
            http_client: None,
        }
    }

    fn lookup_cached(&self, kid: &str) -> CacheLookup {
        let Ok(guard) = self.cached.read() else {
            return CacheLookup::Refetch;
        };
        let Some(cached) = guard.as_ref() else {
            return CacheLookup::Refetch;
        };

        let age = cached.fetched_at.elapsed();
        let expired = self.http_client.is_some() && age > JWKS_CACHE_TTL;
        if !expired {
            if let Some(key) = cached.keys.iter().find(|k| k.kid == kid) {
                return CacheLookup::Hit(key.clone());
            }
        }

        if self.http_client.is_none() || age < JWKS_MIN_REFRESH_INTERVAL {
            CacheLookup::Unknown
        } else {
            CacheLookup::Refetch
        }
    }

    async fn find_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        match self.lookup_cached(kid) {
            CacheLookup::Hit(key) => return Ok(key),
            CacheLookup::Unknown => return Err(AuthError::UnknownKey(kid.to_string())),
            CacheLookup::Refetch => {}
        }

        let keys = self.fetch_keys().await?;
        let key = keys.iter().find(|k| k.kid == kid).cloned();

        if let Ok(mut guard) = self.cached.write() {
            *guard = Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            });
        }

        key.ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
    }

    async fn fetch_keys(&self) -> Result<Vec<Jwk>, AuthError> {
        let client = self
            .http_client
            .as_ref()
            .ok_or_else(|| AuthError::JwksFetch("no HTTP client configured".to_string()))?;

        tracing::debug!(url = %self.jwks_url, "Fetching JWKS");

        let response = client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::JwksFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::JwksFetch(format!(
                "JWKS endpoint returned {}",
                response.status()
            )));
        }

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| AuthError::JwksFetch(e.to_string()))?;
        Ok(jwks.keys)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }
}

fn issuer_for(config: &AuthConfig) -> Option<String> {
    (!config.frontend_api.is_empty()).then(|| format!("https://{}", config.frontend_api))
}

#[async_trait]
impl SessionVerifier for ClerkVerifier {
    async fn verify(&self, token: &str) -> Result<SessionUser, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::InvalidFormat(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidFormat("missing kid in JWT header".to_string()))?;

        let key = self.find_key(&kid).await?;
        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e)
            .map_err(|e| AuthError::InvalidSignature(e.to_string()))?;

        let claims = decode::<SessionClaims>(token, &decoding_key, &self.validation())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidIssuer => AuthError::InvalidFormat("invalid issuer".to_string()),
                ErrorKind::ImmatureSignature => {
                    AuthError::InvalidFormat("token not yet valid".to_string())
                }
                _ => AuthError::InvalidSignature(e.to_string()),
            })?
            .claims;

        if !self.authorized_parties.is_empty() {
            let azp = claims.azp.unwrap_or_default();
            if !self.authorized_parties.iter().any(|p| *p == azp) {
                return Err(AuthError::UnauthorizedParty(azp));
            }
        }

        Ok(SessionUser {
            user_id: claims.sub,
            session_id: claims.sid,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    pub(crate) const TEST_KID: &str = "ins_test_key";
    const TEST_MODULUS: &str = "xnqKXnUdTXfrUkt7YDYCzAdNAT40FuJimcLMI6KQiFmuJK6Bhs0UAVv5YdODt_X4OH_YkH0iQhIJNNGWOspudVunBxszeJIOMlK3DIWruSSE0wZFNoQirv55GRNqtCzzPZ1DcOdc6yBRAX40FHxWb60-eovW_O_vNE21GQcLOaIdqwtcS-ERp0WTdsT9c9lCX0OD3H0sLDNUn-QWN44TkJjjFztmvKBqmuJr8bExVIPrTo9JuD54b7SbsgvoQgNy5hA5MYsusGzkmOP4OxUoJ7Sy9IDOUg0KIdLJk8Gph2-pgGmsrK_CtA7RuWzp1rf_czppEX8Qqrl-bpNEh6nb0Q";
    const SIGNING_KEY_PEM: &str = include_str!("../../testdata/session_signing_key.pem");

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        sid: &'a str,
        iss: &'a str,
        azp: &'a str,
        exp: i64,
        iat: i64,
    }

    pub(crate) fn test_auth_config() -> AuthConfig {
        AuthConfig {
            frontend_api: "clerk.example.com".to_string(),
            authorized_parties: vec!["https://app.example.com".to_string()],
            ..Default::default()
        }
    }

    pub(crate) fn test_verifier() -> ClerkVerifier {
        ClerkVerifier::with_static_keys(
            &test_auth_config(),
            vec![Jwk {
                kid: TEST_KID.to_string(),
                n: TEST_MODULUS.to_string(),
                e: "AQAB".to_string(),
            }],
        )
    }

    fn sign(kid: &str, sub: &str, iss: &str, azp: &str, ttl_secs: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid.to_string());
        let claims = TestClaims {
            sub,
            sid: "sess_1",
            iss,
            azp,
            exp: now + ttl_secs,
            iat: now,
        };
        let key = EncodingKey::from_rsa_pem(SIGNING_KEY_PEM.as_bytes()).unwrap();
        encode(&header, &claims, &key).unwrap()
    }

    /// A valid session token for `sub`
    pub(crate) fn session_token_for(sub: &str) -> String {
        sign(
            TEST_KID,
            sub,
            "https://clerk.example.com",
            "https://app.example.com",
            300,
        )
    }

    #[tokio::test]
    async fn test_valid_token() {
        let user = test_verifier()
            .verify(&session_token_for("user_123"))
            .await
            .unwrap();
        assert_eq!(user.user_id, "user_123");
        assert_eq!(user.session_id.as_deref(), Some("sess_1"));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let token = sign(
            TEST_KID,
            "user_123",
            "https://clerk.example.com",
            "https://app.example.com",
            -3600,
        );
        let err = test_verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::Expired));
    }

    #[tokio::test]
    async fn test_wrong_issuer() {
        let token = sign(
            TEST_KID,
            "user_123",
            "https://evil.example.com",
            "https://app.example.com",
            300,
        );
        let err = test_verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidFormat(_)));
    }

    #[tokio::test]
    async fn test_unauthorized_party() {
        let token = sign(
            TEST_KID,
            "user_123",
            "https://clerk.example.com",
            "https://phishing.example.com",
            300,
        );
        let err = test_verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::UnauthorizedParty(_)));
    }

    #[tokio::test]
    async fn test_unknown_kid_with_static_keys() {
        let token = sign(
            "rotated_key",
            "user_123",
            "https://clerk.example.com",
            "https://app.example.com",
            300,
        );
        let err = test_verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownKey(_)));
    }

    /// JWKS endpoint serving the test key and counting requests
    async fn jwks_server(hits: Arc<AtomicUsize>) -> String {
        let router = Router::new().route(
            "/.well-known/jwks.json",
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(serde_json::json!({
                        "keys": [{ "kid": TEST_KID, "kty": "RSA", "n": TEST_MODULUS, "e": "AQAB" }]
                    }))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/.well-known/jwks.json", addr)
    }

    #[tokio::test]
    async fn test_unknown_kid_does_not_refetch_fresh_keys() {
        let hits = Arc::new(AtomicUsize::new(0));
        let config = AuthConfig {
            jwks_url: jwks_server(hits.clone()).await,
            ..test_auth_config()
        };
        let verifier = ClerkVerifier::new(&config);

        let user = verifier.verify(&session_token_for("user_1")).await.unwrap();
        assert_eq!(user.user_id, "user_1");
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let unknown = sign(
            "rotated_key",
            "user_1",
            "https://clerk.example.com",
            "https://app.example.com",
            300,
        );
        for _ in 0..3 {
            let err = verifier.verify(&unknown).await.unwrap_err();
            assert!(matches!(err, AuthError::UnknownKey(_)));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // Known keys keep verifying from the cache
        verifier.verify(&session_token_for("user_2")).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let err = test_verifier().verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidFormat(_)));
    }
}
