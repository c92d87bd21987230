// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup into an
//! immutable [`AppConfig`] that is shared read-only by every request.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` | PEM certificate chain (requires `TLS_KEY_PATH`) | plain HTTP |
//! | `TLS_KEY_PATH` | PEM private key (requires `TLS_CERT_PATH`) | plain HTTP |
//! | `TOKEN_SIGNING_SECRET` | HS256 secret for session tokens | Required |
//! | `TOKEN_TTL_SECS` | Session token lifetime, at most 10 years; unset or `0` disables expiry | unset |
//! | `ALLOWED_STEAM_IDS` | Comma-separated SteamID64 allow-list; empty allows all | empty |
//! | `STEAM_OPENID_URL` | Steam OpenID endpoint | `https://steamcommunity.com/openid/login` |
//! | `OPENID_RELAY_TIMEOUT_MS` | Timeout for the verification round trip | `6000` |
//! | `ROOT_LOGIN_ENABLED` | Enable `POST /v1/login/root` | `false` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::auth::relay::DEFAULT_RELAY_TIMEOUT;
use crate::auth::strategy::steam::STEAM_OPENID_URL;
use crate::auth::AllowList;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const TOKEN_SIGNING_SECRET_ENV: &str = "TOKEN_SIGNING_SECRET";
pub const TOKEN_TTL_SECS_ENV: &str = "TOKEN_TTL_SECS";
pub const ALLOWED_STEAM_IDS_ENV: &str = "ALLOWED_STEAM_IDS";
pub const STEAM_OPENID_URL_ENV: &str = "STEAM_OPENID_URL";
pub const OPENID_RELAY_TIMEOUT_MS_ENV: &str = "OPENID_RELAY_TIMEOUT_MS";
pub const ROOT_LOGIN_ENABLED_ENV: &str = "ROOT_LOGIN_ENABLED";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Longest accepted session lifetime (10 years).
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            name,
            reason: reason.into(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// PEM files for serving HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Process-wide configuration, immutable after startup.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub tls: Option<TlsPaths>,
    pub token_secret: String,
    pub token_ttl: Option<Duration>,
    pub allowed_steam_ids: AllowList,
    pub steam_openid_url: Url,
    pub relay_timeout: Duration,
    pub root_login_enabled: bool,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("tls", &self.tls)
            .field("token_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("allowed_steam_ids", &self.allowed_steam_ids.len())
            .field("steam_openid_url", &self.steam_openid_url.as_str())
            .field("relay_timeout", &self.relay_timeout)
            .field("root_login_enabled", &self.root_login_enabled)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host: IpAddr = get(HOST_ENV)
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
            .parse()
            .map_err(|e| ConfigError::invalid(HOST_ENV, format!("{e}")))?;
        let port = match get(PORT_ENV) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid(PORT_ENV, format!("{e}")))?,
            None => DEFAULT_PORT,
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert_path: cert.into(),
                key_path: key.into(),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
        };

        let token_secret =
            get(TOKEN_SIGNING_SECRET_ENV).ok_or(ConfigError::Missing(TOKEN_SIGNING_SECRET_ENV))?;

        let token_ttl = match get(TOKEN_TTL_SECS_ENV) {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|e| ConfigError::invalid(TOKEN_TTL_SECS_ENV, format!("{e}")))?;
                if secs > MAX_TOKEN_TTL_SECS {
                    return Err(ConfigError::invalid(
                        TOKEN_TTL_SECS_ENV,
                        format!("must be at most {MAX_TOKEN_TTL_SECS} seconds"),
                    ));
                }
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        let allowed_steam_ids = match get(ALLOWED_STEAM_IDS_ENV) {
            Some(raw) => AllowList::parse(&raw)
                .map_err(|reason| ConfigError::invalid(ALLOWED_STEAM_IDS_ENV, reason))?,
            None => AllowList::default(),
        };

        let steam_openid_url = Url::parse(
            &get(STEAM_OPENID_URL_ENV).unwrap_or_else(|| STEAM_OPENID_URL.to_string()),
        )
        .map_err(|e| ConfigError::invalid(STEAM_OPENID_URL_ENV, format!("{e}")))?;

        let relay_timeout = match get(OPENID_RELAY_TIMEOUT_MS_ENV) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or_else(|| {
                    ConfigError::invalid(OPENID_RELAY_TIMEOUT_MS_ENV, "expected a positive integer")
                })?,
            None => DEFAULT_RELAY_TIMEOUT,
        };

        let root_login_enabled = match get(ROOT_LOGIN_ENABLED_ENV) {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::invalid(ROOT_LOGIN_ENABLED_ENV, "expected true or false"))?,
            None => false,
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref().map(str::to_ascii_lowercase) {
            None => LogFormat::Pretty,
            Some(raw) => match raw.as_str() {
                "pretty" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                other => {
                    return Err(ConfigError::invalid(
                        LOG_FORMAT_ENV,
                        format!("'{other}' is not json or pretty"),
                    ))
                }
            },
        };

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            tls,
            token_secret,
            token_ttl,
            allowed_steam_ids,
            steam_openid_url,
            relay_timeout,
            root_login_enabled,
            log_format,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_with_only_secret() {
        let config = load(&[(TOKEN_SIGNING_SECRET_ENV, "secret")]).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert!(config.tls.is_none());
        assert!(config.token_ttl.is_none());
        assert!(config.allowed_steam_ids.is_empty());
        assert_eq!(config.steam_openid_url.as_str(), STEAM_OPENID_URL);
        assert_eq!(config.relay_timeout, Duration::from_millis(6000));
        assert!(!config.root_login_enabled);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn secret_is_required() {
        assert!(matches!(
            load(&[]),
            Err(ConfigError::Missing(TOKEN_SIGNING_SECRET_ENV))
        ));
        assert!(matches!(
            load(&[(TOKEN_SIGNING_SECRET_ENV, "   ")]),
            Err(ConfigError::Missing(TOKEN_SIGNING_SECRET_ENV))
        ));
    }

    #[test]
    fn parses_all_settings() {
        let config = load(&[
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9443"),
            (TLS_CERT_PATH_ENV, "/etc/tls/cert.pem"),
            (TLS_KEY_PATH_ENV, "/etc/tls/key.pem"),
            (TOKEN_SIGNING_SECRET_ENV, "secret"),
            (TOKEN_TTL_SECS_ENV, "86400"),
            (ALLOWED_STEAM_IDS_ENV, "76561197960287930,76561197960287931"),
            (STEAM_OPENID_URL_ENV, "https://openid.example/login"),
            (OPENID_RELAY_TIMEOUT_MS_ENV, "2500"),
            (ROOT_LOGIN_ENABLED_ENV, "true"),
            (LOG_FORMAT_ENV, "JSON"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9443".parse().unwrap());
        assert_eq!(
            config.tls.as_ref().map(|t| t.key_path.clone()),
            Some(PathBuf::from("/etc/tls/key.pem"))
        );
        assert_eq!(config.token_ttl, Some(Duration::from_secs(86400)));
        assert_eq!(config.allowed_steam_ids.len(), 2);
        assert_eq!(config.steam_openid_url.host_str(), Some("openid.example"));
        assert_eq!(config.relay_timeout, Duration::from_millis(2500));
        assert!(config.root_login_enabled);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn zero_ttl_disables_expiry() {
        let config = load(&[(TOKEN_SIGNING_SECRET_ENV, "s"), (TOKEN_TTL_SECS_ENV, "0")]).unwrap();
        assert!(config.token_ttl.is_none());
    }

    #[test]
    fn ttl_above_ten_years_is_rejected() {
        let max = MAX_TOKEN_TTL_SECS.to_string();
        let config = load(&[(TOKEN_SIGNING_SECRET_ENV, "s"), (TOKEN_TTL_SECS_ENV, &max)]).unwrap();
        assert_eq!(config.token_ttl, Some(Duration::from_secs(MAX_TOKEN_TTL_SECS)));

        for value in ["315360001", "9223372036854775807", "18446744073709551615"] {
            let result = load(&[(TOKEN_SIGNING_SECRET_ENV, "s"), (TOKEN_TTL_SECS_ENV, value)]);
            assert!(
                matches!(result, Err(ConfigError::Invalid { name: TOKEN_TTL_SECS_ENV, .. })),
                "TOKEN_TTL_SECS={value} should be rejected"
            );
        }
    }

    #[test]
    fn tls_needs_both_paths() {
        assert!(matches!(
            load(&[(TOKEN_SIGNING_SECRET_ENV, "s"), (TLS_CERT_PATH_ENV, "/c.pem")]),
            Err(ConfigError::Missing(TLS_KEY_PATH_ENV))
        ));
    }

    #[test]
    fn rejects_malformed_values() {
        for (name, value) in [
            (PORT_ENV, "eighty"),
            (ALLOWED_STEAM_IDS_ENV, "1,two"),
            (OPENID_RELAY_TIMEOUT_MS_ENV, "0"),
            (ROOT_LOGIN_ENABLED_ENV, "maybe"),
            (LOG_FORMAT_ENV, "xml"),
            (STEAM_OPENID_URL_ENV, "not a url"),
        ] {
            let result = load(&[(TOKEN_SIGNING_SECRET_ENV, "s"), (name, value)]);
            assert!(
                matches!(result, Err(ConfigError::Invalid { name: n, .. }) if n == name),
                "{name}={value} should be rejected"
            );
        }
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = load(&[(TOKEN_SIGNING_SECRET_ENV, "super-secret-value")]).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("<redacted>"));
    }
}
