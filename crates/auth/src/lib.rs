//! `brandkit-auth`: pure authentication/authorization boundary.
//!
//! This crate is decoupled from HTTP and from the hosted backend: it only
//! knows principals, roles, permission snapshots and the access gate.

pub mod authorize;
pub mod claims;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod user;

pub use authorize::{AccessDecision, GateExplanation, decide, decide_for, explain};
pub use claims::{Audience, SessionClaims, TokenValidationError, validate_claims};
pub use permissions::{PermissionGrants, PermissionSnapshot};
pub use principal::Principal;
pub use roles::Role;
pub use user::{UserRecord, derive_display_name};

pub use brandkit_core::{BrandId, PrincipalId};
