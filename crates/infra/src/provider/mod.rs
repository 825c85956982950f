//! Hosted auth provider boundary: password sign-in and sign-out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use brandkit_auth::Principal;

pub mod hosted;
pub mod in_memory;

pub use hosted::HostedAuthClient;
pub use in_memory::InMemoryAuthProvider;

/// Tokens handed out by the provider on sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
    /// Unix seconds.
    pub expires_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub principal: Principal,
    pub session: AuthSession,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Credentials (or token) refused by the provider.
    #[error("rejected by auth provider: {0}")]
    Rejected(String),

    /// Network failure, timeout, throttling or provider 5xx.
    #[error("auth provider unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected auth provider response: {0}")]
    Unexpected(String),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<SignedIn, ProviderError>;

    /// Revoke the session behind `access_token`. Revoking an unknown or
    /// already-revoked session succeeds.
    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError>;
}
