use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::routes::AppRoute;
use crate::session::{
    Credential, CredentialError, SessionStorage, SessionStorageError, SessionStore,
};

pub const GOOGLE_IDENTITY_SCRIPT_SRC: &str = "https://accounts.google.com/gsi/client";
pub const SIGN_IN_CONTAINER_ID: &str = "googleSignInDiv";
pub const SIGN_IN_FAILED_MESSAGE: &str = "Failed to sign in with Google";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("identity client id is not configured")]
    MissingClientId,
    #[error("identity script failed to load: {0}")]
    ScriptLoad(String),
    #[error("identity widget is unavailable: {0}")]
    WidgetUnavailable(String),
    #[error("sign-in container '{0}' is missing")]
    ContainerMissing(String),
    #[error("identity callback carried no credential")]
    MissingCredential,
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Storage(#[from] SessionStorageError),
}

/// Options passed verbatim to `google.accounts.id.renderButton`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonOptions {
    #[serde(rename = "type")]
    pub kind: String,
    pub theme: String,
    pub size: String,
    pub text: String,
    pub width: String,
}

impl Default for ButtonOptions {
    fn default() -> Self {
        Self {
            kind: "standard".to_string(),
            theme: "outline".to_string(),
            size: "large".to_string(),
            text: "continue_with".to_string(),
            width: "100%".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub client_id: String,
    pub container_id: String,
    #[serde(default)]
    pub button: ButtonOptions,
}

impl IdentityConfig {
    pub fn new(client_id: &str) -> Result<Self, IdentityError> {
        let client_id = client_id.trim();
        if client_id.is_empty() {
            return Err(IdentityError::MissingClientId);
        }
        Ok(Self {
            client_id: client_id.to_string(),
            container_id: SIGN_IN_CONTAINER_ID.to_string(),
            button: ButtonOptions::default(),
        })
    }
}

/// Payload handed to the widget callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialResponse {
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_by: Option<String>,
}

impl CredentialResponse {
    #[must_use]
    pub fn with_credential(token: &str) -> Self {
        Self {
            credential: Some(token.to_string()),
            select_by: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLoad {
    AlreadyLoaded,
    Injected,
}

/// Process-wide record of injected scripts. An existing `<script>` with the same `src`
/// counts as loaded.
pub trait ScriptRegistry {
    fn is_loaded(&self, src: &str) -> bool;
    fn inject(&self, src: &str) -> Result<(), IdentityError>;
}

pub fn ensure_script_loaded<R: ScriptRegistry + ?Sized>(
    registry: &R,
    src: &str,
) -> Result<ScriptLoad, IdentityError> {
    if registry.is_loaded(src) {
        return Ok(ScriptLoad::AlreadyLoaded);
    }
    registry.inject(src)?;
    Ok(ScriptLoad::Injected)
}

#[derive(Debug, Default)]
pub struct MemoryScriptRegistry {
    injected: Mutex<Vec<String>>,
}

impl MemoryScriptRegistry {
    pub fn injection_count(&self, src: &str) -> usize {
        self.injected
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|loaded| loaded.as_str() == src)
            .count()
    }
}

impl ScriptRegistry for MemoryScriptRegistry {
    fn is_loaded(&self, src: &str) -> bool {
        self.injection_count(src) > 0
    }

    fn inject(&self, src: &str) -> Result<(), IdentityError> {
        self.injected
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(src.to_string());
        Ok(())
    }
}

/// The third-party widget. `initiate` resolves once the user completes the provider's
/// prompt, with whatever the callback received.
#[async_trait(?Send)]
pub trait IdentityDelegate {
    async fn initiate(&self, config: &IdentityConfig) -> Result<CredentialResponse, IdentityError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignInModalState {
    pub open: bool,
    pub error: Option<String>,
    pub attempt: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    Navigate(AppRoute),
    Failed { message: String },
}

/// Sign-in modal lifecycle: open (load the script once), receive the widget callback,
/// store the credential, and move to the dashboard.
#[derive(Debug)]
pub struct SignInFlow<S> {
    session: SessionStore<S>,
    config: IdentityConfig,
    modal: SignInModalState,
}

impl<S: SessionStorage> SignInFlow<S> {
    pub fn new(session: SessionStore<S>, config: IdentityConfig) -> Self {
        Self {
            session,
            config,
            modal: SignInModalState::default(),
        }
    }

    pub fn modal(&self) -> &SignInModalState {
        &self.modal
    }

    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn open_modal<R: ScriptRegistry + ?Sized>(
        &mut self,
        registry: &R,
    ) -> Result<ScriptLoad, IdentityError> {
        self.modal.open = true;
        self.modal.error = None;
        self.modal.attempt = self.modal.attempt.saturating_add(1);
        ensure_script_loaded(registry, GOOGLE_IDENTITY_SCRIPT_SRC).inspect_err(|error| {
            self.fail(error);
        })
    }

    pub fn close_modal(&mut self) {
        self.modal.open = false;
        self.modal.error = None;
    }

    pub fn complete(
        &mut self,
        result: Result<CredentialResponse, IdentityError>,
        received_at: DateTime<Utc>,
    ) -> SignInOutcome {
        match self.store_credential(result, received_at) {
            Ok(()) => {
                self.close_modal();
                tracing::info!(attempt = self.modal.attempt, "sign-in credential stored");
                SignInOutcome::Navigate(AppRoute::DashboardHome)
            }
            Err(error) => self.fail(&error),
        }
    }

    pub async fn sign_in<R, D>(
        &mut self,
        registry: &R,
        delegate: &D,
        received_at: DateTime<Utc>,
    ) -> SignInOutcome
    where
        R: ScriptRegistry + ?Sized,
        D: IdentityDelegate + ?Sized,
    {
        if self.open_modal(registry).is_err() {
            return SignInOutcome::Failed {
                message: SIGN_IN_FAILED_MESSAGE.to_string(),
            };
        }
        let result = delegate.initiate(&self.config).await;
        self.complete(result, received_at)
    }

    fn store_credential(
        &self,
        result: Result<CredentialResponse, IdentityError>,
        received_at: DateTime<Utc>,
    ) -> Result<(), IdentityError> {
        let token = result?.credential.ok_or(IdentityError::MissingCredential)?;
        let credential = Credential::received(&token, received_at)?;
        self.session.set(&credential)?;
        Ok(())
    }

    fn fail(&mut self, error: &IdentityError) -> SignInOutcome {
        tracing::warn!(error = %error, attempt = self.modal.attempt, "sign-in failed");
        self.modal.error = Some(SIGN_IN_FAILED_MESSAGE.to_string());
        SignInOutcome::Failed {
            message: SIGN_IN_FAILED_MESSAGE.to_string(),
        }
    }
}
