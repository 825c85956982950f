//! HTTP client for the hosted auth API.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, Response};
use serde::Deserialize;

use brandkit_auth::{Principal, PrincipalId};

use crate::hosted::{HostedClient, StatusClass, classify_status, error_message, is_unreachable};
use crate::session::{SessionError, SessionResolver};

use super::{AuthProvider, AuthSession, ProviderError, SignedIn};

const DEFAULT_REJECTION: &str = "Invalid login credentials";

#[derive(Debug, Clone)]
pub struct HostedAuthClient {
    client: HostedClient,
}

impl HostedAuthClient {
    pub fn new(client: HostedClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct HostedUser {
    id: PrincipalId,
    #[serde(default)]
    email: Option<String>,
}

impl HostedUser {
    fn into_principal(self) -> Principal {
        Principal::new(self.id, self.email.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    token_type: Option<String>,
    expires_in: i64,
    #[serde(default)]
    expires_at: Option<i64>,
    user: HostedUser,
}

impl TokenResponse {
    fn into_signed_in(self) -> SignedIn {
        let expires_at = self
            .expires_at
            .unwrap_or_else(|| Utc::now().timestamp() + self.expires_in);

        SignedIn {
            principal: self.user.into_principal(),
            session: AuthSession {
                access_token: self.access_token,
                refresh_token: self.refresh_token,
                token_type: self.token_type.unwrap_or_else(|| "bearer".to_string()),
                expires_in: self.expires_in,
                expires_at,
            },
        }
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if is_unreachable(&err) {
        ProviderError::Unavailable(err.to_string())
    } else {
        ProviderError::Unexpected(err.to_string())
    }
}

async fn failure(resp: Response) -> ProviderError {
    let status = resp.status();
    let class = classify_status(status);
    let message = error_message(resp).await;

    match class {
        StatusClass::Rejected => {
            ProviderError::Rejected(message.unwrap_or_else(|| DEFAULT_REJECTION.to_string()))
        }
        StatusClass::Unavailable => ProviderError::Unavailable(format!("status {status}")),
        _ => ProviderError::Unexpected(format!(
            "status {status}: {}",
            message.unwrap_or_default()
        )),
    }
}

#[async_trait]
impl AuthProvider for HostedAuthClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<SignedIn, ProviderError> {
        let resp = self
            .client
            .auth(Method::POST, "/auth/v1/token")
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(transport_error)?;

        if classify_status(resp.status()) != StatusClass::Success {
            return Err(failure(resp).await);
        }

        let body: TokenResponse = resp.json().await.map_err(transport_error)?;
        Ok(body.into_signed_in())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        let resp = self
            .client
            .auth(Method::POST, "/auth/v1/logout")
            .query(&[("scope", "local")])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport_error)?;

        match classify_status(resp.status()) {
            StatusClass::Success => Ok(()),
            StatusClass::Rejected => {
                tracing::debug!(status = %resp.status(), "sign-out of unknown session treated as done");
                Ok(())
            }
            _ => Err(failure(resp).await),
        }
    }
}

#[async_trait]
impl SessionResolver for HostedAuthClient {
    async fn resolve(&self, access_token: &str) -> Result<Principal, SessionError> {
        let resp = self
            .client
            .auth(Method::GET, "/auth/v1/user")
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;

        match classify_status(resp.status()) {
            StatusClass::Success => {
                let user: HostedUser = resp
                    .json()
                    .await
                    .map_err(|e| SessionError::Unavailable(e.to_string()))?;
                Ok(user.into_principal())
            }
            StatusClass::Rejected => Err(SessionError::Invalid(
                error_message(resp)
                    .await
                    .unwrap_or_else(|| "token rejected by provider".to_string()),
            )),
            _ => Err(SessionError::Unavailable(format!("status {}", resp.status()))),
        }
    }
}
