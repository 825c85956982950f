use serde::{Deserialize, Serialize};

use brandkit_core::BrandId;

use crate::Role;

/// Everything the permission service knows about a principal: resolved
/// roles plus the ordered list of associated brands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionGrants {
    pub roles: Vec<Role>,
    pub brands: Vec<BrandId>,
}

impl PermissionGrants {
    pub fn new(roles: Vec<Role>, brands: Vec<BrandId>) -> Self {
        Self { roles, brands }
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// Collapse grants into the coarse capability flags handed to clients.
    pub fn snapshot(&self) -> PermissionSnapshot {
        let platform_admin = self.has_role(&Role::PlatformAdmin);
        let brand_admin = self.has_role(&Role::BrandAdmin);

        PermissionSnapshot {
            can_create_ip_kits: platform_admin || brand_admin || !self.brands.is_empty(),
            can_create_campaigns: platform_admin
                || brand_admin
                || self.has_role(&Role::CampaignManager),
            can_review_submissions: platform_admin || self.has_role(&Role::Reviewer),
            is_platform_admin: platform_admin,
            user_brands: self.brands.clone(),
        }
    }
}

/// Point-in-time capability snapshot.
///
/// Plain data only: this is serialized straight into API responses and
/// page payloads, and must produce exactly these five keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PermissionSnapshot {
    pub can_create_ip_kits: bool,
    pub can_create_campaigns: bool,
    pub can_review_submissions: bool,
    pub is_platform_admin: bool,
    pub user_brands: Vec<BrandId>,
}
