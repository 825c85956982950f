//! Permission service: principal id -> grants -> capability snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use brandkit_auth::{PermissionGrants, PermissionSnapshot, PrincipalId, Role};

use crate::directory::{DirectoryError, UserDirectory};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("permission lookup failed: {0}")]
    Lookup(#[from] DirectoryError),
}

#[async_trait]
pub trait PermissionService: Send + Sync {
    /// Resolved roles and brand associations; `None` when there is nothing
    /// to build a snapshot from.
    async fn fetch_grants(&self, principal_id: &PrincipalId) -> Result<Option<PermissionGrants>, ServiceError>;

    async fn fetch_permissions(
        &self,
        principal_id: &PrincipalId,
    ) -> Result<Option<PermissionSnapshot>, ServiceError> {
        Ok(self
            .fetch_grants(principal_id)
            .await?
            .map(|grants| grants.snapshot()))
    }
}

/// Builds grants from the user directory. A principal without a local user
/// record has no grants at all (`None`), which callers surface as an error.
pub struct DirectoryPermissionService<D: ?Sized> {
    directory: Arc<D>,
}

impl<D: ?Sized> DirectoryPermissionService<D> {
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl<D> PermissionService for DirectoryPermissionService<D>
where
    D: UserDirectory + ?Sized,
{
    async fn fetch_grants(&self, principal_id: &PrincipalId) -> Result<Option<PermissionGrants>, ServiceError> {
        if self.directory.get_user(principal_id).await?.is_none() {
            tracing::warn!(%principal_id, "no user record; permissions unavailable");
            return Ok(None);
        }

        let roles: Vec<Role> = self
            .directory
            .role_names(principal_id)
            .await?
            .iter()
            .map(|name| Role::from_name(name))
            .collect();
        let brands = self.directory.brands_for(principal_id).await?;

        tracing::debug!(
            %principal_id,
            roles = ?roles,
            brand_count = brands.len(),
            "resolved permission grants"
        );

        Ok(Some(PermissionGrants::new(roles, brands)))
    }
}
