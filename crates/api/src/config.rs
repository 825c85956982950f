//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use brandkit_infra::HostedConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Names and flags for the session cookies we set and read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    pub access_name: String,
    pub refresh_name: String,
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            access_name: "sb-access-token".to_string(),
            refresh_name: "sb-refresh-token".to_string(),
            secure: false,
        }
    }
}

/// Account seeded into the in-memory backend so dev mode is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevAccount {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub enum BackendMode {
    Hosted {
        hosted: HostedConfig,
        /// Ask the provider about every token instead of verifying locally.
        verify_remotely: bool,
    },
    InMemory {
        dev_admin: Option<DevAccount>,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub cookies: CookieSettings,
    pub backend: BackendMode,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            var: "BIND_ADDR",
            value: bind_addr_raw.clone(),
            reason: e.to_string(),
        })?;

        let jwt_secret = get("HOSTED_JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("HOSTED_JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let defaults = CookieSettings::default();
        let cookies = CookieSettings {
            access_name: get("SESSION_COOKIE_NAME").unwrap_or(defaults.access_name),
            refresh_name: get("REFRESH_COOKIE_NAME").unwrap_or(defaults.refresh_name),
            secure: parse_bool("SECURE_COOKIES", get("SECURE_COOKIES"))?.unwrap_or(false),
        };

        let backend = match get("HOSTED_BACKEND_URL") {
            Some(base_url) => {
                let timeout_secs = match get("HOSTED_TIMEOUT_SECS") {
                    Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                        var: "HOSTED_TIMEOUT_SECS",
                        value: raw.clone(),
                        reason: e.to_string(),
                    })?,
                    None => 10,
                };

                BackendMode::Hosted {
                    hosted: HostedConfig {
                        base_url,
                        anon_key: get("HOSTED_ANON_KEY").unwrap_or_default(),
                        service_key: get("HOSTED_SERVICE_KEY"),
                        timeout: Duration::from_secs(timeout_secs),
                    },
                    verify_remotely: parse_bool(
                        "VERIFY_SESSIONS_REMOTELY",
                        get("VERIFY_SESSIONS_REMOTELY"),
                    )?
                    .unwrap_or(false),
                }
            }
            None => {
                tracing::warn!("HOSTED_BACKEND_URL not set; using in-memory auth and directory");
                let dev_admin = get("DEV_ADMIN_PASSWORD").map(|password| DevAccount {
                    email: get("DEV_ADMIN_EMAIL").unwrap_or_else(|| "admin@brandkit.local".to_string()),
                    password,
                });
                BackendMode::InMemory { dev_admin }
            }
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            cookies,
            backend,
        })
    }
}

fn parse_bool(var: &'static str, raw: Option<String>) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_to_in_memory_backend() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(cfg.cookies, CookieSettings::default());
        assert!(matches!(cfg.backend, BackendMode::InMemory { dev_admin: None }));
    }

    #[test]
    fn hosted_backend_from_url() {
        let cfg = config(&[
            ("HOSTED_BACKEND_URL", "https://backend.example.com"),
            ("HOSTED_ANON_KEY", "anon"),
            ("HOSTED_TIMEOUT_SECS", "3"),
            ("VERIFY_SESSIONS_REMOTELY", "yes"),
            ("SECURE_COOKIES", "true"),
        ])
        .unwrap();

        assert!(cfg.cookies.secure);
        match cfg.backend {
            BackendMode::Hosted { hosted, verify_remotely } => {
                assert_eq!(hosted.base_url, "https://backend.example.com");
                assert_eq!(hosted.anon_key, "anon");
                assert_eq!(hosted.service_key, None);
                assert_eq!(hosted.timeout, Duration::from_secs(3));
                assert!(verify_remotely);
            }
            other => panic!("expected hosted backend, got {other:?}"),
        }
    }

    #[test]
    fn dev_admin_is_seeded_only_with_a_password() {
        let cfg = config(&[("DEV_ADMIN_PASSWORD", "pw")]).unwrap();
        let BackendMode::InMemory { dev_admin: Some(admin) } = cfg.backend else {
            panic!("expected seeded dev admin");
        };
        assert_eq!(admin.email, "admin@brandkit.local");
    }

    #[test]
    fn rejects_bad_values() {
        let err = config(&[("BIND_ADDR", "nope")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "BIND_ADDR", .. }));

        let err = config(&[("SECURE_COOKIES", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SECURE_COOKIES", .. }));
    }
}
