use std::sync::Arc;
use log::{debug, info, warn};
use serde_json::json;
use crate::error::{Result, VaultKeyError};
use crate::http::request::dispatch;
use crate::http::transport::{HttpRequest, Transport};
use crate::storage::{keys, Storage};

pub const SESSION_SET_HEADER: &str = "X-Session-Set";

/// Obtains and caches the vendor session id.
///
/// Two callers racing past an expired session will each log in; the later
/// write simply wins.
pub struct SessionManager {
    storage: Arc<Storage>,
    transport: Arc<dyn Transport>,
    authenticate_url: String,
}

impl SessionManager {
    pub fn new(storage: Arc<Storage>, transport: Arc<dyn Transport>, base_url: &str) -> Self {
        Self {
            storage,
            transport,
            authenticate_url: format!("{}/users/authenticate", base_url),
        }
    }

    pub async fn login(&self) -> Result<String> {
        let username: String = self
            .storage
            .get(keys::USERNAME)
            .await
            .map_err(|e| missing_credential(e, "username"))?;
        let password: String = self
            .storage
            .get(keys::PASSWORD)
            .await
            .map_err(|e| missing_credential(e, "password"))?;

        let request = HttpRequest::post(&self.authenticate_url)
            .json(&json!({ "username": username, "password": password }));

        let response = dispatch(self.transport.as_ref(), request).await.map_err(|e| {
            warn!("Authentication request failed: {}", e);
            VaultKeyError::AuthServer(e.to_string())
        })?;

        let session_id = response
            .header(SESSION_SET_HEADER)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| VaultKeyError::AuthServer("Could not retrieve session ID from server.".to_string()))?
            .to_string();

        self.storage.set_temporary(keys::SESSION_ID, session_id.clone()).await?;
        info!("Logged in as {}", username);
        Ok(session_id)
    }

    /// The cached session id, logging in first when there is none or it has expired.
    pub async fn session_id(&self) -> Result<String> {
        match self.storage.get_temporary::<String>(keys::SESSION_ID).await {
            Ok(session_id) => Ok(session_id),
            Err(e) if e.is_absent() => {
                debug!("No usable session ({}), logging in", e);
                self.login().await
            }
            Err(e) => Err(e),
        }
    }
}

fn missing_credential(error: VaultKeyError, what: &str) -> VaultKeyError {
    if error.is_absent() {
        VaultKeyError::CredentialsMissing(what.to_string())
    } else {
        error
    }
}
