#![forbid(unsafe_code)]

mod mapping;
pub mod repository;
pub mod session_store;
pub mod sqlite;

pub use repository::{InMemoryRepository, KeyValueStore, SessionPersistence, StorageError};
pub use session_store::SessionStore;
