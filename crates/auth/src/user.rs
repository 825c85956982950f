//! Local user record, lazily provisioned the first time a valid session is seen.

use serde::{Deserialize, Serialize};

use brandkit_core::PrincipalId;

use crate::Principal;

/// Application-side record for a principal, keyed by the provider id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: PrincipalId,
    pub email: String,
    pub display_name: String,
}

impl UserRecord {
    /// Fresh record for a principal seen for the first time.
    pub fn provision(principal: &Principal) -> Self {
        Self {
            id: principal.id.clone(),
            email: principal.email.clone(),
            display_name: derive_display_name(&principal.email),
        }
    }
}

/// Display name for a new user: the local part of the e-mail address with
/// separators turned into spaces and each word capitalised
/// (`jane.doe@x.io` -> `Jane Doe`). Falls back to the raw address.
pub fn derive_display_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();

    let words: Vec<String> = local
        .split(['.', '_', '-', '+'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        email.to_string()
    } else {
        words.join(" ")
    }
}
