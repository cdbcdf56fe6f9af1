use serde::{Deserialize, Serialize};

use crate::identity::{IdentityConfig, IdentityError};
use crate::routes::RouteGuard;
use crate::session::Credential;

/// Id of the `<script type="application/json">` element carrying [`ShellConfig`].
pub const SHELL_CONFIG_ELEMENT_ID: &str = "shipcarbon-shell-config";
pub const DEFAULT_DOCS_URL: &str = "https://maritime-emissions.readme.io/reference/get_";
pub const DEFAULT_ANALYTICS_DASHBOARD_URL: &str =
    "http://localhost:8088/superset/dashboard/p/XRGL1P2kjmJ/";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShellConfigError {
    #[error("url must not be empty")]
    EmptyUrl,
    #[error("url must use http:// or https:// and include a host: {0}")]
    InvalidUrl(String),
    #[error("shell config is not valid json: {0}")]
    Json(String),
}

/// Initial email of the access-request form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EmailPrefill {
    #[default]
    Blank,
    Fixed {
        email: String,
    },
    /// Unverified `email` claim of the stored credential, blank when absent.
    FromCredential,
}

impl EmailPrefill {
    #[must_use]
    pub fn resolve(&self, credential: Option<&Credential>) -> String {
        match self {
            Self::Blank => String::new(),
            Self::Fixed { email } => email.clone(),
            Self::FromCredential => credential
                .and_then(Credential::unverified_email)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_client_id: Option<String>,
    pub docs_url: String,
    pub analytics_dashboard_url: String,
    pub email_prefill: EmailPrefill,
    pub route_guard: RouteGuard,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            google_client_id: None,
            docs_url: DEFAULT_DOCS_URL.to_string(),
            analytics_dashboard_url: DEFAULT_ANALYTICS_DASHBOARD_URL.to_string(),
            email_prefill: EmailPrefill::Blank,
            route_guard: RouteGuard::Open,
        }
    }
}

impl ShellConfig {
    pub fn from_json(raw: &str) -> Result<Self, ShellConfigError> {
        serde_json::from_str(raw).map_err(|error| ShellConfigError::Json(error.to_string()))
    }

    /// Falls back to defaults when the element is missing or unreadable.
    #[must_use]
    pub fn from_json_or_default(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
            return Self::default();
        };
        Self::from_json(raw).unwrap_or_else(|error| {
            tracing::warn!(error = %error, "shell config unreadable; using defaults");
            Self::default()
        })
    }

    /// JSON safe to place inside a `<script>` element.
    pub fn to_embedded_json(&self) -> Result<String, ShellConfigError> {
        let json =
            serde_json::to_string(self).map_err(|error| ShellConfigError::Json(error.to_string()))?;
        Ok(json.replace('<', "\\u003c"))
    }

    pub fn identity_config(&self) -> Result<IdentityConfig, IdentityError> {
        IdentityConfig::new(self.google_client_id.as_deref().unwrap_or_default())
    }
}

pub fn normalize_external_url(raw: &str) -> Result<String, ShellConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ShellConfigError::EmptyUrl);
    }
    let Some((scheme, remainder)) = trimmed.split_once("://") else {
        return Err(ShellConfigError::InvalidUrl(trimmed.to_string()));
    };
    if !matches!(scheme, "http" | "https") || remainder.is_empty() || remainder.starts_with('/') {
        return Err(ShellConfigError::InvalidUrl(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    #[test]
    fn defaults_match_shipped_behavior() {
        let config = ShellConfig::default();
        assert_eq!(config.route_guard, RouteGuard::Open);
        assert_eq!(config.email_prefill, EmailPrefill::Blank);
        assert_eq!(config.docs_url, DEFAULT_DOCS_URL);
        assert_eq!(
            config.identity_config(),
            Err(IdentityError::MissingClientId)
        );
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config = ShellConfig::from_json(
            r#"{"google_client_id":"abc","email_prefill":{"mode":"fixed","email":"user@example.com"}}"#,
        )
        .expect("parse");
        assert_eq!(config.google_client_id.as_deref(), Some("abc"));
        assert_eq!(config.analytics_dashboard_url, DEFAULT_ANALYTICS_DASHBOARD_URL);
        assert_eq!(config.email_prefill.resolve(None), "user@example.com");
    }

    #[test]
    fn unreadable_json_falls_back_to_defaults() {
        assert_eq!(
            ShellConfig::from_json_or_default(Some("{not json")),
            ShellConfig::default()
        );
        assert_eq!(ShellConfig::from_json_or_default(None), ShellConfig::default());
    }

    #[test]
    fn embedded_json_cannot_close_script_element() {
        let config = ShellConfig {
            docs_url: "https://docs.example/</script>".to_string(),
            ..ShellConfig::default()
        };
        let json = config.to_embedded_json().expect("serialize");
        assert!(!json.contains("</script>"));
        assert_eq!(ShellConfig::from_json(&json).expect("parse"), config);
    }

    #[test]
    fn prefill_from_credential_reads_email_claim() {
        let token = format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#),
            URL_SAFE_NO_PAD.encode(br#"{"email":"mate@fleet.example"}"#)
        );
        let credential = Credential::from_token(&token).expect("credential");

        assert_eq!(
            EmailPrefill::FromCredential.resolve(Some(&credential)),
            "mate@fleet.example"
        );
        assert_eq!(EmailPrefill::FromCredential.resolve(None), "");
        assert_eq!(EmailPrefill::Blank.resolve(Some(&credential)), "");
    }

    #[test]
    fn external_urls_need_scheme_and_host() {
        assert_eq!(
            normalize_external_url(" https://docs.example/ref "),
            Ok("https://docs.example/ref".to_string())
        );
        assert_eq!(normalize_external_url(""), Err(ShellConfigError::EmptyUrl));
        assert!(normalize_external_url("ftp://docs.example").is_err());
        assert!(normalize_external_url("https:///path").is_err());
        assert!(normalize_external_url("docs.example").is_err());
    }
}
