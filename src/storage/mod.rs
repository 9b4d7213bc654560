pub mod adapter;
pub mod backend;
pub mod client;
pub mod models;
pub mod mutex;

pub use adapter::Storage;
pub use backend::{KeyValueBackend, MemoryBackend};
pub use client::SqliteBackend;
pub use models::{keys, TemporaryValue};
pub use mutex::{MutexQueue, ReleaseHandle};
