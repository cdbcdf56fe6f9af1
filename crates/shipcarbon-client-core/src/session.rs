use std::collections::HashMap;
use std::sync::Mutex;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Browser-local key holding the last credential issued by the identity provider.
pub const CREDENTIAL_STORAGE_KEY: &str = "googleToken";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("credential token must not be empty")]
    EmptyToken,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStorageError {
    #[error("session storage is unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read session storage key '{key}': {message}")]
    Read { key: String, message: String },
    #[error("failed to write session storage key '{key}': {message}")]
    Write { key: String, message: String },
}

/// Opaque token issued by the identity provider. Never validated or refreshed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
}

/// Claims read from the token payload without any signature check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UnverifiedClaims {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl Credential {
    pub fn from_token(raw: &str) -> Result<Self, CredentialError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(CredentialError::EmptyToken);
        }
        Ok(Self {
            token: token.to_string(),
            issued_at: None,
        })
    }

    pub fn received(raw: &str, received_at: DateTime<Utc>) -> Result<Self, CredentialError> {
        let mut credential = Self::from_token(raw)?;
        credential.issued_at = Some(received_at);
        Ok(credential)
    }

    /// Decodes the middle segment of a JWT-shaped token. Returns `None` for anything else.
    pub fn unverified_claims(&self) -> Option<UnverifiedClaims> {
        let mut segments = self.token.split('.');
        let (_header, payload) = (segments.next()?, segments.next()?);
        segments.next()?;
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn unverified_email(&self) -> Option<String> {
        self.unverified_claims()?
            .email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty())
    }
}

/// Key-value persistence with the `localStorage` call shape.
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionStorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionStorageError>;
    fn remove_item(&self, key: &str) -> Result<(), SessionStorageError>;
}

impl<T: SessionStorage + ?Sized> SessionStorage for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionStorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionStorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionStorageError> {
        (**self).remove_item(key)
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn len(&self) -> usize {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionStorageError> {
        let items = self
            .items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionStorageError> {
        let mut items = self
            .items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionStorageError> {
        let mut items = self
            .items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        items.remove(key);
        Ok(())
    }
}

/// Holds at most one credential under [`CREDENTIAL_STORAGE_KEY`]. Each `set` overwrites
/// the previous token; nothing expires it.
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn set(&self, credential: &Credential) -> Result<(), SessionStorageError> {
        self.storage.set_item(CREDENTIAL_STORAGE_KEY, &credential.token)
    }

    pub fn get(&self) -> Result<Option<Credential>, SessionStorageError> {
        let raw = self.storage.get_item(CREDENTIAL_STORAGE_KEY)?;
        Ok(raw.and_then(|token| Credential::from_token(&token).ok()))
    }

    pub fn has_credential(&self) -> bool {
        matches!(self.get(), Ok(Some(_)))
    }

    pub fn clear(&self) -> Result<(), SessionStorageError> {
        self.storage.remove_item(CREDENTIAL_STORAGE_KEY)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload.as_bytes())
        )
    }

    #[test]
    fn credential_rejects_blank_token() {
        let error = Credential::from_token("   ").expect_err("blank token");
        assert_eq!(error, CredentialError::EmptyToken);
    }

    #[test]
    fn set_overwrites_previous_token() {
        let store = SessionStore::new(MemorySessionStorage::default());
        store
            .set(&Credential::from_token("first").expect("credential"))
            .expect("persist first");
        store
            .set(&Credential::from_token("second").expect("credential"))
            .expect("persist second");

        assert_eq!(store.storage().len(), 1);
        assert_eq!(
            store.storage().get_item(CREDENTIAL_STORAGE_KEY).expect("read"),
            Some("second".to_string())
        );
        let loaded = store.get().expect("load").expect("credential present");
        assert_eq!(loaded.token, "second");
    }

    #[test]
    fn clear_removes_the_only_key() {
        let store = SessionStore::new(MemorySessionStorage::default());
        store
            .set(&Credential::from_token("token").expect("credential"))
            .expect("persist");
        assert!(store.has_credential());

        store.clear().expect("clear");
        assert!(!store.has_credential());
        assert!(store.storage().is_empty());
    }

    #[test]
    fn stored_blank_value_reads_as_no_credential() {
        let storage = MemorySessionStorage::default();
        storage
            .set_item(CREDENTIAL_STORAGE_KEY, "  ")
            .expect("seed");
        let store = SessionStore::new(&storage);
        assert_eq!(store.get().expect("load"), None);
    }

    #[test]
    fn unverified_email_reads_jwt_payload() {
        let token =
            jwt_with_payload(r#"{"email":" captain@shipcarbon.io ","email_verified":true}"#);
        let credential = Credential::from_token(&token).expect("credential");

        assert_eq!(
            credential.unverified_email(),
            Some("captain@shipcarbon.io".to_string())
        );
        assert_eq!(
            credential
                .unverified_claims()
                .and_then(|claims| claims.email_verified),
            Some(true)
        );
    }

    #[test]
    fn unverified_claims_ignore_opaque_tokens() {
        let credential = Credential::from_token("opaque-token").expect("credential");
        assert_eq!(credential.unverified_claims(), None);

        let garbage = Credential::from_token("a.%%%.c").expect("credential");
        assert_eq!(garbage.unverified_email(), None);
    }
}
