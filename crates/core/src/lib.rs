//! `brandkit-core`: shared building blocks (identifiers, validation).
//!
//! This crate has no knowledge of HTTP, sessions or the hosted backend.

pub mod email;
pub mod error;
pub mod id;

pub use email::is_valid_email;
pub use error::{DomainError, FieldError, ValidationErrors};
pub use id::{BrandId, PrincipalId};
