//! Session resolution: access token -> principal.

use async_trait::async_trait;
use thiserror::Error;

use brandkit_auth::Principal;

pub mod jwt;

pub use jwt::JwtSessionResolver;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid session: {0}")]
    Invalid(String),

    #[error("session expired")]
    Expired,

    #[error("session revoked")]
    Revoked,

    /// The provider could not be asked; says nothing about the token.
    #[error("auth provider unavailable: {0}")]
    Unavailable(String),
}

impl SessionError {
    /// `true` when the caller simply has no valid session (as opposed to us
    /// failing to find out).
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, SessionError::Unavailable(_))
    }
}

/// Resolves the principal that owns an access token.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, access_token: &str) -> Result<Principal, SessionError>;
}
