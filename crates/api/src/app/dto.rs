use serde::{Deserialize, Serialize};

use brandkit_auth::{BrandId, Principal, PrincipalId, UserRecord};
use brandkit_core::{ValidationErrors, is_valid_email};
use brandkit_infra::AuthSession;

// -------------------------
// Request DTOs
// -------------------------

/// Raw login body. Fields are optional so a missing field becomes a field
/// error instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Login input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = self.email.unwrap_or_default().trim().to_string();
        if email.is_empty() {
            errors.push("email", "Email is required");
        } else if !is_valid_email(&email) {
            errors.push("email", "Invalid email address");
        }

        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            errors.push("password", "Password is required");
        }

        errors.into_result()?;
        Ok(Credentials { email, password })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MeQuery {
    /// `permissions` selects the permission-snapshot variant of `/me`.
    #[serde(default)]
    pub view: Option<String>,
}

impl MeQuery {
    pub fn wants_permissions(&self) -> bool {
        self.view.as_deref() == Some("permissions")
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: PrincipalId,
    pub email: String,
}

impl From<Principal> for UserDto {
    fn from(value: Principal) -> Self {
        Self {
            id: value.id,
            email: value.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserDto,
    pub session: AuthSession,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BrandsResponse {
    pub brands: Vec<BrandId>,
    pub count: usize,
}

impl From<Vec<BrandId>> for BrandsResponse {
    fn from(brands: Vec<BrandId>) -> Self {
        Self {
            count: brands.len(),
            brands,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub id: PrincipalId,
    pub email: String,
    pub display_name: String,
}

impl From<UserRecord> for IdentityResponse {
    fn from(value: UserRecord) -> Self {
        Self {
            id: value.id,
            email: value.email,
            display_name: value.display_name,
        }
    }
}
