#![forbid(unsafe_code)]

pub mod kv;
pub mod progress;

pub use kv::{InMemoryStore, JsonFileStore, KeyValueStore, StorageError};
pub use progress::{ProgressStore, ProgressSummary};
