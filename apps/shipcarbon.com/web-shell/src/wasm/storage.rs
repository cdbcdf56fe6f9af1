use super::*;

/// `window.localStorage`, looked up on every call.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct BrowserLocalStorage;

impl BrowserLocalStorage {
    fn storage() -> Result<web_sys::Storage, SessionStorageError> {
        let window = web_sys::window()
            .ok_or_else(|| SessionStorageError::Unavailable("window is unavailable".to_string()))?;
        window
            .local_storage()
            .map_err(|_| {
                SessionStorageError::Unavailable("failed to access local storage".to_string())
            })?
            .ok_or_else(|| {
                SessionStorageError::Unavailable("local storage is unavailable".to_string())
            })
    }
}

impl SessionStorage for BrowserLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionStorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| SessionStorageError::Read {
                key: key.to_string(),
                message: "local storage read was rejected".to_string(),
            })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionStorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| SessionStorageError::Write {
                key: key.to_string(),
                message: "local storage write was rejected".to_string(),
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionStorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|_| SessionStorageError::Write {
                key: key.to_string(),
                message: "local storage removal was rejected".to_string(),
            })
    }
}
