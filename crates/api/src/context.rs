use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use brandkit_auth::{Principal, PrincipalId};

/// Authenticated identity for the current request, plus the token it was
/// resolved from (needed for sign-out).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
    access_token: String,
}

impl PrincipalContext {
    pub fn new(principal: Principal, access_token: String) -> Self {
        Self {
            principal,
            access_token,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn principal_id(&self) -> &PrincipalId {
        &self.principal.id
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

/// Outcome of session resolution, recorded by the session middleware.
///
/// `Failed` means we could not find out who the caller is (provider down,
/// provisioning failed). Each handler turns that into its own error shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestSession {
    #[default]
    Anonymous,
    Authenticated(PrincipalContext),
    Failed(String),
}

/// Reads the middleware's verdict; requests it never saw are anonymous.
#[async_trait]
impl<S> FromRequestParts<S> for RequestSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestSession>()
            .cloned()
            .unwrap_or_default())
    }
}
