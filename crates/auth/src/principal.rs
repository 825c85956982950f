use serde::{Deserialize, Serialize};

use brandkit_core::PrincipalId;

/// An authenticated identity resolved from a session.
///
/// Owned by the auth provider; we only ever hold a request-scoped copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub email: String,
}

impl Principal {
    pub fn new(id: PrincipalId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}
