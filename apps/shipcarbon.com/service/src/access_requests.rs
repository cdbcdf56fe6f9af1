use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shipcarbon_client_core::access_request::AccessRequest;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;

/// Received access requests, kept in memory and mirrored to a JSON snapshot when a store
/// path is configured.
#[derive(Clone)]
pub struct AccessRequestLedger {
    state: Arc<RwLock<LedgerState>>,
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct LedgerState {
    requests: Vec<AccessRequestRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRequestStatus {
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequestRecord {
    pub request_id: String,
    pub email: String,
    pub purpose: String,
    pub status: AccessRequestStatus,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessRequestReceipt {
    pub request_id: String,
    pub status: AccessRequestStatus,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("{message}")]
    Persistence { message: String },
}

impl AccessRequestLedger {
    pub fn from_config(config: &Config) -> Self {
        let path = config.access_request_store_path.clone();
        let state = Self::load_state(path.as_ref());

        Self {
            state: Arc::new(RwLock::new(state)),
            path,
        }
    }

    pub async fn record(
        &self,
        request: AccessRequest,
    ) -> Result<AccessRequestReceipt, LedgerError> {
        let record = AccessRequestRecord {
            request_id: format!("areq_{}", Uuid::new_v4().simple()),
            email: request.email,
            purpose: request.purpose,
            status: AccessRequestStatus::Pending,
            received_at: Utc::now(),
        };
        let receipt = AccessRequestReceipt {
            request_id: record.request_id.clone(),
            status: record.status,
            received_at: record.received_at,
        };

        let mut state = self.state.write().await;
        state.requests.push(record);
        if let Err(error) = self.persist_state(&state).await {
            state
                .requests
                .retain(|existing| existing.request_id != receipt.request_id);
            return Err(error);
        }
        drop(state);

        tracing::info!(
            target: "shipcarbon.access_requests",
            request_id = %receipt.request_id,
            "access request recorded",
        );
        Ok(receipt)
    }

    pub async fn list(&self) -> Vec<AccessRequestRecord> {
        self.state.read().await.requests.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.requests.len()
    }

    fn load_state(path: Option<&PathBuf>) -> LedgerState {
        let Some(path) = path else {
            return LedgerState::default();
        };

        let raw = match std::fs::read_to_string(path) {
            Ok(value) => value,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return LedgerState::default();
            }
            Err(error) => {
                tracing::warn!(
                    target: "shipcarbon.access_requests",
                    path = %path.display(),
                    error = %error,
                    "failed to read access request store; booting with an empty ledger",
                );
                return LedgerState::default();
            }
        };

        match serde_json::from_str::<LedgerState>(&raw) {
            Ok(state) => state,
            Err(error) => {
                tracing::warn!(
                    target: "shipcarbon.access_requests",
                    path = %path.display(),
                    error = %error,
                    "failed to parse access request store; booting with an empty ledger",
                );
                LedgerState::default()
            }
        }
    }

    async fn persist_state(&self, snapshot: &LedgerState) -> Result<(), LedgerError> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|error| LedgerError::Persistence {
                    message: format!("failed to prepare access request store directory: {error}"),
                })?;
        }

        let payload = serde_json::to_vec(snapshot).map_err(|error| LedgerError::Persistence {
            message: format!("failed to encode access request store payload: {error}"),
        })?;
        let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

        tokio::fs::write(&temp_path, payload)
            .await
            .map_err(|error| LedgerError::Persistence {
                message: format!("failed to write access request store payload: {error}"),
            })?;

        if let Err(error) = tokio::fs::rename(&temp_path, path).await {
            if let Err(cleanup_error) = tokio::fs::remove_file(&temp_path).await {
                tracing::warn!(
                    target: "shipcarbon.access_requests",
                    path = %temp_path.display(),
                    error = %cleanup_error,
                    "failed to remove temporary access request store payload",
                );
            }
            return Err(LedgerError::Persistence {
                message: format!("failed to finalize access request store payload: {error}"),
            });
        }

        Ok(())
    }
}
