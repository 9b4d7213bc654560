use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope for values stored through `Storage::set_temporary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporaryValue<T> {
    pub value: T,
    pub expiry: DateTime<Utc>,
}

impl<T> TemporaryValue<T> {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry <= now
    }
}

pub mod keys {
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const SESSION_ID: &str = "sessionId";
    pub const AUTO_SHIFT_PLATFORM: &str = "auto_shift_platform";
    pub const AUTO_SHIFT_SOURCE: &str = "auto_shift_source";
    pub const AUTO_VIP_SOURCE: &str = "auto_vip_source";

    /// Keys the preference commands must not touch.
    pub const RESERVED: [&str; 6] = ["shift", "vip", "bad_shift", "bad_vip", SESSION_ID, PASSWORD];

    pub fn is_reserved(key: &str) -> bool {
        RESERVED.contains(&key)
    }
}
