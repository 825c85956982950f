//! Backend adapter wiring: hosted backend in production, in-memory in dev/tests.

use std::sync::Arc;

use brandkit_infra::{
    AuthProvider, DirectoryPermissionService, HostedAuthClient, HostedClient, HostedUserDirectory,
    InMemoryAuthProvider, InMemoryUserDirectory, JwtSessionResolver, PermissionService,
    SessionResolver, UserDirectory,
};

use crate::config::{AppConfig, BackendMode, CookieSettings, DevAccount};

/// Everything a handler may talk to. Shared read-only across requests.
#[derive(Clone)]
pub struct AppServices {
    pub auth: Arc<dyn AuthProvider>,
    pub sessions: Arc<dyn SessionResolver>,
    pub directory: Arc<dyn UserDirectory>,
    pub permissions: Arc<dyn PermissionService>,
    pub cookies: CookieSettings,
}

impl AppServices {
    /// Permission service derived from the directory (the usual setup).
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        sessions: Arc<dyn SessionResolver>,
        directory: Arc<dyn UserDirectory>,
        cookies: CookieSettings,
    ) -> Self {
        let permissions: Arc<dyn PermissionService> =
            Arc::new(DirectoryPermissionService::new(directory.clone()));
        Self {
            auth,
            sessions,
            directory,
            permissions,
            cookies,
        }
    }

    pub fn with_permissions(mut self, permissions: Arc<dyn PermissionService>) -> Self {
        self.permissions = permissions;
        self
    }
}

/// In-memory provider + directory, kept typed so callers can seed them.
#[derive(Clone)]
pub struct InMemoryBackend {
    pub auth: Arc<InMemoryAuthProvider>,
    pub directory: Arc<InMemoryUserDirectory>,
}

impl InMemoryBackend {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            auth: Arc::new(InMemoryAuthProvider::new(jwt_secret)),
            directory: Arc::new(InMemoryUserDirectory::new()),
        }
    }

    /// Register a login and grant it the given role names.
    pub fn seed_user(&self, email: &str, password: &str, roles: &[&str]) -> brandkit_auth::PrincipalId {
        let id = self.auth.register(email, password);
        for role in roles {
            self.directory.assign_role(&id, role);
        }
        id
    }

    pub fn services(&self, cookies: CookieSettings) -> AppServices {
        AppServices::new(
            self.auth.clone(),
            self.auth.clone(),
            self.directory.clone(),
            cookies,
        )
    }
}

pub fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.backend {
        BackendMode::Hosted {
            hosted,
            verify_remotely,
        } => {
            let client = HostedClient::new(hosted.clone())?;
            let auth = Arc::new(HostedAuthClient::new(client.clone()));

            let sessions: Arc<dyn SessionResolver> = if *verify_remotely {
                auth.clone()
            } else {
                Arc::new(JwtSessionResolver::new(&config.jwt_secret))
            };

            tracing::info!(
                base_url = client.base_url(),
                verify_remotely = *verify_remotely,
                "using hosted auth backend"
            );

            Ok(AppServices::new(
                auth,
                sessions,
                Arc::new(HostedUserDirectory::new(client)),
                config.cookies.clone(),
            ))
        }
        BackendMode::InMemory { dev_admin } => {
            let backend = InMemoryBackend::new(&config.jwt_secret);
            if let Some(DevAccount { email, password }) = dev_admin {
                backend.seed_user(email, password, &["brand_admin"]);
                tracing::info!(%email, "seeded in-memory brand admin");
            }
            Ok(backend.services(config.cookies.clone()))
        }
    }
}
