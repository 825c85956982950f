//! User directory backed by the hosted database's REST table API.
//!
//! Tables: `users(id, email, display_name)`, `user_roles(user_id, role_id)`
//! joined to `roles(name)`, and `brand_users(user_id, brand_id, created_at)`.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use brandkit_auth::{BrandId, Principal, PrincipalId, UserRecord};

use crate::hosted::{HostedClient, StatusClass, classify_status, error_message, is_unreachable};

use super::{DirectoryError, UserDirectory};

#[derive(Debug, Clone)]
pub struct HostedUserDirectory {
    client: HostedClient,
}

impl HostedUserDirectory {
    pub fn new(client: HostedClient) -> Self {
        Self { client }
    }

    fn eq_filter(id: &PrincipalId) -> String {
        format!("eq.{id}")
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Vec<T>, DirectoryError> {
        let resp = req.send().await.map_err(transport_error)?;
        let resp = check(resp).await?;
        resp.json::<Vec<T>>().await.map_err(transport_error)
    }
}

#[derive(Debug, Deserialize)]
struct RoleRow {
    role: Option<RoleRef>,
}

#[derive(Debug, Deserialize)]
struct RoleRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct BrandRow {
    brand_id: BrandId,
}

fn transport_error(err: reqwest::Error) -> DirectoryError {
    if is_unreachable(&err) {
        DirectoryError::Unavailable(err.to_string())
    } else {
        DirectoryError::Unexpected(err.to_string())
    }
}

async fn check(resp: Response) -> Result<Response, DirectoryError> {
    let status = resp.status();
    match classify_status(status) {
        StatusClass::Success => Ok(resp),
        StatusClass::Unavailable => Err(DirectoryError::Unavailable(format!("status {status}"))),
        _ => {
            let message = error_message(resp).await.unwrap_or_default();
            Err(DirectoryError::Unexpected(format!("status {status}: {message}")))
        }
    }
}

#[async_trait]
impl UserDirectory for HostedUserDirectory {
    async fn ensure_user_exists(&self, principal: &Principal) -> Result<UserRecord, DirectoryError> {
        if let Some(existing) = self.get_user(&principal.id).await? {
            return Ok(existing);
        }

        let req = self
            .client
            .rest(Method::POST, "/rest/v1/users")
            .query(&[("on_conflict", "id")])
            .header("Prefer", "resolution=ignore-duplicates,return=representation")
            .json(&UserRecord::provision(principal));

        let inserted: Vec<UserRecord> = self.fetch_rows(req).await?;
        if let Some(record) = inserted.into_iter().next() {
            tracing::info!(principal_id = %principal.id, "provisioned local user record");
            return Ok(record);
        }

        // Lost a race with a concurrent insert: the row exists now.
        self.get_user(&principal.id).await?.ok_or_else(|| {
            DirectoryError::Unexpected(format!("user {} missing after upsert", principal.id))
        })
    }

    async fn get_user(&self, id: &PrincipalId) -> Result<Option<UserRecord>, DirectoryError> {
        let req = self
            .client
            .rest(Method::GET, "/rest/v1/users")
            .query(&[
                ("id", Self::eq_filter(id).as_str()),
                ("select", "id,email,display_name"),
                ("limit", "1"),
            ]);

        let rows: Vec<UserRecord> = self.fetch_rows(req).await?;
        Ok(rows.into_iter().next())
    }

    async fn role_names(&self, id: &PrincipalId) -> Result<Vec<String>, DirectoryError> {
        let req = self
            .client
            .rest(Method::GET, "/rest/v1/user_roles")
            .query(&[
                ("user_id", Self::eq_filter(id).as_str()),
                ("select", "role:roles(name)"),
            ]);

        let rows: Vec<RoleRow> = self.fetch_rows(req).await?;
        Ok(rows.into_iter().filter_map(|r| r.role.map(|r| r.name)).collect())
    }

    async fn brands_for(&self, id: &PrincipalId) -> Result<Vec<BrandId>, DirectoryError> {
        let req = self
            .client
            .rest(Method::GET, "/rest/v1/brand_users")
            .query(&[
                ("user_id", Self::eq_filter(id).as_str()),
                ("select", "brand_id"),
                ("order", "created_at.asc"),
            ]);

        let rows: Vec<BrandRow> = self.fetch_rows(req).await?;
        Ok(rows.into_iter().map(|r| r.brand_id).collect())
    }
}
