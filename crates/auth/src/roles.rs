use core::convert::Infallible;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Role granted to a principal.
///
/// Role names coming from the backend are resolved into this enum once, at
/// the permission-service boundary. Unknown names are kept verbatim in
/// `Other` so they survive a round trip but grant nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    PlatformAdmin,
    BrandAdmin,
    CampaignManager,
    Reviewer,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::PlatformAdmin => "platform_admin",
            Role::BrandAdmin => "brand_admin",
            Role::CampaignManager => "campaign_manager",
            Role::Reviewer => "reviewer",
            Role::Other(name) => name,
        }
    }

    /// Resolve a backend role name. Matching ignores case and surrounding
    /// whitespace.
    pub fn from_name(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "platform_admin" => Role::PlatformAdmin,
            "brand_admin" => Role::BrandAdmin,
            "campaign_manager" => Role::CampaignManager,
            "reviewer" => Role::Reviewer,
            _ => Role::Other(name.trim().to_string()),
        }
    }
}

impl FromStr for Role {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::from_name(s))
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Role::from_name(&name))
    }
}
