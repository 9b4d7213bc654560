pub mod api;
pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod logging;
pub mod redemption;
pub mod sources;
pub mod storage;
pub mod test_utils;

pub use app::VaultKey;
pub use config::Config;
pub use error::{Result, VaultKeyError};
pub use events::AppEvent;
