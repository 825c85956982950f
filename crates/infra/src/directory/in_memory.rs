use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use brandkit_auth::{BrandId, Principal, PrincipalId, UserRecord};

use super::{DirectoryError, UserDirectory};

/// In-memory user directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<PrincipalId, UserRecord>>,
    roles: RwLock<HashMap<PrincipalId, Vec<String>>>,
    brands: RwLock<HashMap<PrincipalId, Vec<BrandId>>>,
}

fn poisoned<T>(_: T) -> DirectoryError {
    DirectoryError::Unexpected("directory lock poisoned".to_string())
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a role by name. Duplicate grants are ignored.
    pub fn assign_role(&self, id: &PrincipalId, role_name: &str) {
        if let Ok(mut roles) = self.roles.write() {
            let names = roles.entry(id.clone()).or_default();
            if !names.iter().any(|n| n == role_name) {
                names.push(role_name.to_string());
            }
        }
    }

    /// Associate a brand; association order is preserved.
    pub fn associate_brand(&self, id: &PrincipalId, brand: BrandId) {
        if let Ok(mut brands) = self.brands.write() {
            let list = brands.entry(id.clone()).or_default();
            if !list.contains(&brand) {
                list.push(brand);
            }
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.read().map(|u| u.len()).unwrap_or(0)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn ensure_user_exists(&self, principal: &Principal) -> Result<UserRecord, DirectoryError> {
        let mut users = self.users.write().map_err(poisoned)?;
        let record = users
            .entry(principal.id.clone())
            .or_insert_with(|| {
                tracing::info!(principal_id = %principal.id, "provisioned local user record");
                UserRecord::provision(principal)
            })
            .clone();
        Ok(record)
    }

    async fn get_user(&self, id: &PrincipalId) -> Result<Option<UserRecord>, DirectoryError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(id).cloned())
    }

    async fn role_names(&self, id: &PrincipalId) -> Result<Vec<String>, DirectoryError> {
        let roles = self.roles.read().map_err(poisoned)?;
        Ok(roles.get(id).cloned().unwrap_or_default())
    }

    async fn brands_for(&self, id: &PrincipalId) -> Result<Vec<BrandId>, DirectoryError> {
        let brands = self.brands.read().map_err(poisoned)?;
        Ok(brands.get(id).cloned().unwrap_or_default())
    }
}
