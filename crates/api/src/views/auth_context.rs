//! Explicit auth context handed to every rendering function.
//!
//! Lifecycle: `Init` (unauthenticated, nothing asked yet) -> `Loading` ->
//! `Authenticated` | `Unauthenticated`. A new lookup can start from any
//! state; a result only lands while a lookup is in flight.

use serde::{Serialize, Serializer, ser::SerializeStruct};

use brandkit_auth::Principal;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthPhase {
    #[default]
    Init,
    Loading,
    Authenticated(Principal),
    Unauthenticated,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    phase: AuthPhase,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a request whose session was already resolved server-side.
    pub fn resolved(principal: Option<Principal>) -> Self {
        Self::new().begin_loading().finish(principal)
    }

    pub fn begin_loading(self) -> Self {
        Self {
            phase: AuthPhase::Loading,
        }
    }

    /// Land a lookup result. Ignored unless a lookup is in flight, so a late
    /// answer cannot overwrite a newer state.
    pub fn finish(self, principal: Option<Principal>) -> Self {
        if self.phase != AuthPhase::Loading {
            return self;
        }
        let phase = match principal {
            Some(p) => AuthPhase::Authenticated(p),
            None => AuthPhase::Unauthenticated,
        };
        Self { phase }
    }

    pub fn phase(&self) -> &AuthPhase {
        &self.phase
    }

    pub fn user(&self) -> Option<&Principal> {
        match &self.phase {
            AuthPhase::Authenticated(p) => Some(p),
            _ => None,
        }
    }

    pub fn loading(&self) -> bool {
        self.phase == AuthPhase::Loading
    }
}

/// Serialized as `{ "user": ..., "loading": ... }` for the client bundle.
impl Serialize for AuthContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AuthContext", 2)?;
        state.serialize_field("user", &self.user())?;
        state.serialize_field("loading", &self.loading())?;
        state.end()
    }
}
