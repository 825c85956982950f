//! Application user directory: local user records, role names and brand
//! associations held in the hosted database.

use async_trait::async_trait;
use thiserror::Error;

use brandkit_auth::{BrandId, Principal, PrincipalId, UserRecord};

pub mod hosted;
pub mod in_memory;

pub use hosted::HostedUserDirectory;
pub use in_memory::InMemoryUserDirectory;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected directory response: {0}")]
    Unexpected(String),
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Idempotent upsert keyed by the provider principal id. Returns the
    /// stored record (existing one if present).
    async fn ensure_user_exists(&self, principal: &Principal) -> Result<UserRecord, DirectoryError>;

    async fn get_user(&self, id: &PrincipalId) -> Result<Option<UserRecord>, DirectoryError>;

    /// Raw role names as stored; resolution into `Role` happens in the
    /// permission service.
    async fn role_names(&self, id: &PrincipalId) -> Result<Vec<String>, DirectoryError>;

    /// Associated brands in storage order.
    async fn brands_for(&self, id: &PrincipalId) -> Result<Vec<BrandId>, DirectoryError>;
}
