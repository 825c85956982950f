//! Infrastructure layer: adapters for the hosted auth/database backend.
//!
//! Every boundary is an async trait with two implementations: one that
//! talks to the hosted backend over HTTP, and an in-memory one for dev and
//! tests.

pub mod directory;
pub mod hosted;
pub mod permissions;
pub mod provider;
pub mod session;

pub use directory::{DirectoryError, HostedUserDirectory, InMemoryUserDirectory, UserDirectory};
pub use hosted::{HostedClient, HostedConfig};
pub use permissions::{DirectoryPermissionService, PermissionService, ServiceError};
pub use provider::{AuthProvider, AuthSession, HostedAuthClient, InMemoryAuthProvider, ProviderError, SignedIn};
pub use session::{JwtSessionResolver, SessionError, SessionResolver};
