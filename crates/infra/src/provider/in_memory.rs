use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use brandkit_auth::{Principal, PrincipalId};

use crate::session::{JwtSessionResolver, SessionError, SessionResolver};

use super::{AuthProvider, AuthSession, ProviderError, SignedIn};

#[derive(Debug, Clone)]
struct Account {
    id: PrincipalId,
    email: String,
    password: String,
}

/// In-memory stand-in for the hosted auth provider.
///
/// Intended for tests/dev. Issues real HS256 tokens, so a
/// `JwtSessionResolver` built with the same secret accepts them too.
#[derive(Debug)]
pub struct InMemoryAuthProvider {
    jwt: JwtSessionResolver,
    ttl: Duration,
    accounts: RwLock<HashMap<String, Account>>,
    /// Revoked access tokens with their `exp`; pruned once expired.
    revoked: RwLock<HashMap<String, i64>>,
}

impl InMemoryAuthProvider {
    pub fn new(jwt_secret: impl AsRef<[u8]>) -> Self {
        Self {
            jwt: JwtSessionResolver::new(jwt_secret),
            ttl: Duration::hours(1),
            accounts: RwLock::new(HashMap::new()),
            revoked: RwLock::new(HashMap::new()),
        }
    }

    /// Register an account and return its principal id. Re-registering an
    /// e-mail replaces the password but keeps the id.
    pub fn register(&self, email: &str, password: &str) -> PrincipalId {
        let key = email.trim().to_ascii_lowercase();
        let mut accounts = match self.accounts.write() {
            Ok(a) => a,
            Err(poisoned) => poisoned.into_inner(),
        };

        let account = accounts.entry(key).or_insert_with(|| Account {
            id: PrincipalId::generate(),
            email: email.trim().to_string(),
            password: String::new(),
        });
        account.password = password.to_string();
        account.id.clone()
    }

    fn lookup(&self, email: &str) -> Result<Option<Account>, ProviderError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| ProviderError::Unexpected("account store poisoned".to_string()))?;
        Ok(accounts.get(&email.trim().to_ascii_lowercase()).cloned())
    }

    fn is_revoked(&self, token: &str) -> bool {
        self.revoked.read().map(|r| r.contains_key(token)).unwrap_or(true)
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<SignedIn, ProviderError> {
        let account = match self.lookup(email)? {
            Some(a) if a.password == password => a,
            _ => return Err(ProviderError::Rejected("Invalid login credentials".to_string())),
        };

        let principal = Principal::new(account.id, account.email);
        let now = Utc::now();
        let access_token = self
            .jwt
            .issue(&principal, now, self.ttl)
            .map_err(|e| ProviderError::Unexpected(e.to_string()))?;

        Ok(SignedIn {
            principal,
            session: AuthSession {
                access_token,
                refresh_token: Uuid::now_v7().simple().to_string(),
                token_type: "bearer".to_string(),
                expires_in: self.ttl.num_seconds(),
                expires_at: (now + self.ttl).timestamp(),
            },
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        let now = Utc::now();
        // An expired or foreign token already fails resolution.
        let Ok(claims) = self.jwt.verify(access_token, now) else {
            return Ok(());
        };

        let mut revoked = self
            .revoked
            .write()
            .map_err(|_| ProviderError::Unexpected("revocation list poisoned".to_string()))?;
        let now = now.timestamp();
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(access_token.to_string(), claims.exp);
        Ok(())
    }
}

#[async_trait]
impl SessionResolver for InMemoryAuthProvider {
    async fn resolve(&self, access_token: &str) -> Result<Principal, SessionError> {
        if self.is_revoked(access_token) {
            return Err(SessionError::Revoked);
        }
        self.jwt.resolve(access_token).await
    }
}
