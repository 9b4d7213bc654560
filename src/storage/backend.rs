use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use crate::error::{Result, VaultKeyError};

/// The external key-value store. Only get/set of whole JSON values is assumed.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<Value>>;
    async fn store(&self, key: &str, value: Value) -> Result<()>;
}

pub struct MemoryBackend {
    values: RwLock<HashMap<String, Value>>,
    available: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulates the store going away; every call fails with `StoreUnavailable` until re-enabled.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn raw(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(VaultKeyError::StoreUnavailable("memory store disabled".to_string()))
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn load(&self, key: &str) -> Result<Option<Value>> {
        self.check_available()?;
        Ok(self.values.read().get(key).cloned())
    }

    async fn store(&self, key: &str, value: Value) -> Result<()> {
        self.check_available()?;
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }
}
