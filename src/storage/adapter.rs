use std::sync::Arc;
use chrono::Duration;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use crate::clock::Clock;
use crate::error::{Result, VaultKeyError};
use crate::storage::backend::KeyValueBackend;
use crate::storage::models::TemporaryValue;
use crate::storage::mutex::MutexQueue;

/// Lifetime of anything written with `set_temporary`.
pub const TEMPORARY_LIFETIME_HOURS: i64 = 24;

/// Serialized access to the key-value backend.
///
/// Every get and set goes through one `MutexQueue`, so concurrent callers observe
/// storage operations in arrival order.
pub struct Storage {
    backend: Arc<dyn KeyValueBackend>,
    lock: MutexQueue,
    clock: Arc<dyn Clock>,
}

impl Storage {
    pub fn new(backend: Arc<dyn KeyValueBackend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            lock: MutexQueue::new(),
            clock,
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let raw = {
            let _release = self.lock.acquire().await;
            self.backend.load(key).await?
        };
        match raw {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Err(VaultKeyError::NotFound(key.to_string())),
        }
    }

    pub async fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        match self.get(key).await {
            Err(e) if e.is_absent() => Ok(default),
            other => other,
        }
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        let _release = self.lock.acquire().await;
        self.backend.store(key, value).await
    }

    pub async fn get_temporary<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let raw: serde_json::Value = self.get(key).await?;
        let envelope: TemporaryValue<T> = match serde_json::from_value(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!("Ignoring malformed temporary value for {}: {}", key, e);
                return Err(VaultKeyError::Expired(key.to_string()));
            }
        };
        if envelope.is_expired(self.clock.now()) {
            debug!("Temporary value for {} expired at {}", key, envelope.expiry);
            return Err(VaultKeyError::Expired(key.to_string()));
        }
        Ok(envelope.value)
    }

    pub async fn get_temporary_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        match self.get_temporary(key).await {
            Err(e) if e.is_absent() => Ok(default),
            other => other,
        }
    }

    pub async fn set_temporary<T: Serialize>(&self, key: &str, value: T) -> Result<()> {
        let envelope = TemporaryValue {
            value,
            expiry: self.clock.now() + Duration::hours(TEMPORARY_LIFETIME_HOURS),
        };
        self.set(key, &envelope).await
    }
}
