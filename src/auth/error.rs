use thiserror::Error;

/// Session verification errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing session token")]
    MissingToken,

    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    #[error("invalid token signature: {0}")]
    InvalidSignature(String),

    #[error("session expired")]
    Expired,

    #[error("token issued for unauthorized party: {0}")]
    UnauthorizedParty(String),

    #[error("no signing key matches kid {0}")]
    UnknownKey(String),

    #[error("failed to fetch JWKS: {0}")]
    JwksFetch(String),
}
