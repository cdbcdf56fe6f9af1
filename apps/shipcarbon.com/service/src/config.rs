use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use shipcarbon_client_core::access_request::{AccessRequestInputError, normalize_email};
use shipcarbon_client_core::config::{
    DEFAULT_ANALYTICS_DASHBOARD_URL, DEFAULT_DOCS_URL, EmailPrefill, ShellConfig,
    ShellConfigError, normalize_external_url,
};
use shipcarbon_client_core::routes::RouteGuard;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_STATIC_DIR: &str = "apps/shipcarbon.com/service/static";

pub const ENV_BIND_ADDR: &str = "SHIPCARBON_BIND_ADDR";
pub const ENV_LOG_FILTER: &str = "SHIPCARBON_LOG_FILTER";
pub const ENV_LOG_FORMAT: &str = "SHIPCARBON_LOG_FORMAT";
pub const ENV_STATIC_DIR: &str = "SHIPCARBON_STATIC_DIR";
pub const ENV_GOOGLE_CLIENT_ID: &str = "SHIPCARBON_GOOGLE_CLIENT_ID";
pub const ENV_DOCS_URL: &str = "SHIPCARBON_DOCS_URL";
pub const ENV_ANALYTICS_DASHBOARD_URL: &str = "SHIPCARBON_ANALYTICS_DASHBOARD_URL";
pub const ENV_PREFILL_EMAIL: &str = "SHIPCARBON_PREFILL_EMAIL";
pub const ENV_PREFILL_FROM_CREDENTIAL: &str = "SHIPCARBON_PREFILL_FROM_CREDENTIAL";
pub const ENV_REQUIRE_CREDENTIAL: &str = "SHIPCARBON_REQUIRE_CREDENTIAL";
pub const ENV_ACCESS_REQUEST_STORE_PATH: &str = "SHIPCARBON_ACCESS_REQUEST_STORE_PATH";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub log_filter: String,
    pub log_json: bool,
    pub static_dir: PathBuf,
    pub google_client_id: Option<String>,
    pub docs_url: String,
    pub analytics_dashboard_url: String,
    pub email_prefill: EmailPrefill,
    pub route_guard: RouteGuard,
    pub access_request_store_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid SHIPCARBON_BIND_ADDR value '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("invalid {name} value: {source}")]
    InvalidUrl {
        name: &'static str,
        source: ShellConfigError,
    },
    #[error("invalid SHIPCARBON_PREFILL_EMAIL value '{value}': {source}")]
    InvalidPrefillEmail {
        value: String,
        source: AccessRequestInputError,
    },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let flag = |key: &str| {
            non_empty(key)
                .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false)
        };

        let bind_addr_raw =
            non_empty(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr_raw
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_addr_raw,
                source,
            })?;

        let log_filter =
            non_empty(ENV_LOG_FILTER).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let log_json = non_empty(ENV_LOG_FORMAT)
            .is_some_and(|value| value.eq_ignore_ascii_case("json"));

        let static_dir = non_empty(ENV_STATIC_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let google_client_id = non_empty(ENV_GOOGLE_CLIENT_ID);

        let docs_url = external_url(
            ENV_DOCS_URL,
            non_empty(ENV_DOCS_URL).as_deref(),
            DEFAULT_DOCS_URL,
        )?;
        let analytics_dashboard_url = external_url(
            ENV_ANALYTICS_DASHBOARD_URL,
            non_empty(ENV_ANALYTICS_DASHBOARD_URL).as_deref(),
            DEFAULT_ANALYTICS_DASHBOARD_URL,
        )?;

        let email_prefill = if flag(ENV_PREFILL_FROM_CREDENTIAL) {
            EmailPrefill::FromCredential
        } else if let Some(value) = non_empty(ENV_PREFILL_EMAIL) {
            let email = normalize_email(&value)
                .map_err(|source| ConfigError::InvalidPrefillEmail { value, source })?;
            EmailPrefill::Fixed { email }
        } else {
            EmailPrefill::Blank
        };

        let route_guard = if flag(ENV_REQUIRE_CREDENTIAL) {
            RouteGuard::RequireCredential
        } else {
            RouteGuard::Open
        };

        let access_request_store_path = non_empty(ENV_ACCESS_REQUEST_STORE_PATH).map(PathBuf::from);

        Ok(Self {
            bind_addr,
            log_filter,
            log_json,
            static_dir,
            google_client_id,
            docs_url,
            analytics_dashboard_url,
            email_prefill,
            route_guard,
            access_request_store_path,
        })
    }

    #[must_use]
    pub fn for_tests(static_dir: PathBuf) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            log_filter: "debug".to_string(),
            log_json: false,
            static_dir,
            google_client_id: Some("test-client.apps.googleusercontent.com".to_string()),
            docs_url: DEFAULT_DOCS_URL.to_string(),
            analytics_dashboard_url: DEFAULT_ANALYTICS_DASHBOARD_URL.to_string(),
            email_prefill: EmailPrefill::Blank,
            route_guard: RouteGuard::Open,
            access_request_store_path: None,
        }
    }

    /// Subset handed to the browser shell.
    #[must_use]
    pub fn shell_config(&self) -> ShellConfig {
        ShellConfig {
            google_client_id: self.google_client_id.clone(),
            docs_url: self.docs_url.clone(),
            analytics_dashboard_url: self.analytics_dashboard_url.clone(),
            email_prefill: self.email_prefill.clone(),
            route_guard: self.route_guard,
        }
    }
}

fn external_url(
    name: &'static str,
    value: Option<&str>,
    default: &str,
) -> Result<String, ConfigError> {
    normalize_external_url(value.unwrap_or(default))
        .map_err(|source| ConfigError::InvalidUrl { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config_from(&[]).expect("config");

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8787");
        assert_eq!(config.log_filter, "info");
        assert!(!config.log_json);
        assert_eq!(config.email_prefill, EmailPrefill::Blank);
        assert_eq!(config.route_guard, RouteGuard::Open);
        assert_eq!(config.google_client_id, None);
        assert_eq!(config.access_request_store_path, None);
        assert_eq!(config.docs_url, DEFAULT_DOCS_URL);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[(ENV_BIND_ADDR, "   "), (ENV_LOG_FILTER, "")]).expect("config");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8787");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn invalid_bind_addr_is_reported() {
        let error = config_from(&[(ENV_BIND_ADDR, "not-an-addr")]).expect_err("invalid");
        assert!(matches!(error, ConfigError::InvalidBindAddr { .. }));
    }

    #[test]
    fn prefill_and_guard_flags_are_read() {
        let config = config_from(&[
            (ENV_PREFILL_EMAIL, "user@example.com"),
            (ENV_REQUIRE_CREDENTIAL, "true"),
            (ENV_LOG_FORMAT, "JSON"),
        ])
        .expect("config");
        assert_eq!(
            config.email_prefill,
            EmailPrefill::Fixed {
                email: "user@example.com".to_string()
            }
        );
        assert_eq!(config.route_guard, RouteGuard::RequireCredential);
        assert!(config.log_json);

        let from_credential = config_from(&[
            (ENV_PREFILL_EMAIL, "user@example.com"),
            (ENV_PREFILL_FROM_CREDENTIAL, "1"),
        ])
        .expect("config");
        assert_eq!(from_credential.email_prefill, EmailPrefill::FromCredential);
    }

    #[test]
    fn malformed_prefill_email_and_urls_are_rejected() {
        assert!(matches!(
            config_from(&[(ENV_PREFILL_EMAIL, "nobody")]),
            Err(ConfigError::InvalidPrefillEmail { .. })
        ));
        assert!(matches!(
            config_from(&[(ENV_DOCS_URL, "docs.example")]),
            Err(ConfigError::InvalidUrl {
                name: ENV_DOCS_URL,
                ..
            })
        ));
    }

    #[test]
    fn shell_config_mirrors_service_settings() {
        let config = Config::for_tests(PathBuf::from("."));
        let shell = config.shell_config();
        assert_eq!(shell.google_client_id, config.google_client_id);
        assert_eq!(shell.route_guard, RouteGuard::Open);
        assert_eq!(shell.analytics_dashboard_url, config.analytics_dashboard_url);
    }
}
