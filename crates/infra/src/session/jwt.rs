//! Local verification of provider-issued HS256 access tokens.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use brandkit_auth::{Principal, SessionClaims, TokenValidationError, validate_claims};
use brandkit_auth::claims::AUTHENTICATED_AUDIENCE;

use super::{SessionError, SessionResolver};

/// Verifies access tokens with the project's shared JWT secret, without a
/// round trip to the provider. Also issues tokens for the in-memory provider.
#[derive(Clone)]
pub struct JwtSessionResolver {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtSessionResolver {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();

        let mut validation = Validation::new(Algorithm::HS256);
        // Time window is checked by `validate_claims` so skew handling lives in one place.
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::from(["sub".to_string(), "exp".to_string()]);
        validation.set_audience(&[AUTHENTICATED_AUDIENCE]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Decode and validate a token against `now`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| SessionError::Invalid(e.to_string()))?;

        validate_claims(&data.claims, now).map_err(|e| match e {
            TokenValidationError::Expired => SessionError::Expired,
            other => SessionError::Invalid(other.to_string()),
        })?;

        Ok(data.claims)
    }

    /// Sign an access token for `principal`, valid for `ttl` from `now`.
    pub fn issue(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = SessionClaims {
            sub: principal.id.clone(),
            email: principal.email.clone(),
            aud: AUTHENTICATED_AUDIENCE.into(),
            role: "authenticated".to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }
}

impl core::fmt::Debug for JwtSessionResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JwtSessionResolver").finish_non_exhaustive()
    }
}

#[async_trait]
impl SessionResolver for JwtSessionResolver {
    async fn resolve(&self, access_token: &str) -> Result<Principal, SessionError> {
        let claims = self.verify(access_token, Utc::now())?;
        Ok(claims.principal())
    }
}
