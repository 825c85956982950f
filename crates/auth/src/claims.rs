use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use brandkit_core::PrincipalId;

use crate::Principal;

/// Audience the hosted provider stamps on end-user access tokens.
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// `aud` claim: a single audience or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::One(aud) => aud == audience,
            Audience::Many(auds) => auds.iter().any(|a| a == audience),
        }
    }
}

impl From<&str> for Audience {
    fn from(value: &str) -> Self {
        Audience::One(value.to_string())
    }
}

/// Access-token claims issued by the hosted auth provider.
///
/// Signature checking happens in the adapter that decodes the token; this
/// type only models the claims we rely on. Timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject / principal identifier.
    pub sub: PrincipalId,

    #[serde(default)]
    pub email: String,

    pub aud: Audience,

    /// Provider-side role (`authenticated` for end users). Not an app role.
    #[serde(default)]
    pub role: String,

    pub iat: i64,

    pub exp: i64,
}

impl SessionClaims {
    pub fn principal(&self) -> Principal {
        Principal::new(self.sub.clone(), self.email.clone())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("token has no subject")]
    MissingSubject,
}

/// Leeway applied to `iat` for clock skew between us and the provider.
const CLOCK_SKEW_SECS: i64 = 30;

/// Deterministically validate session claims against `now`.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.sub.as_str().trim().is_empty() {
        return Err(TokenValidationError::MissingSubject);
    }
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    let now = now.timestamp();
    if now + CLOCK_SKEW_SECS < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
