use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use recall_core::model::{DeckProgress, SessionResult};

use crate::mapping::{
    ProgressRecord, decode_or_absent, encode, progress_from_record, progress_to_record,
};
use crate::repository::{InMemoryRepository, KeyValueStore, SessionPersistence, StorageError};
use crate::sqlite::{SqliteInitError, SqliteRepository};

/// Prefix shared by every key this crate writes.
pub const KEY_PREFIX: &str = "recall_";

const LAST_SESSION_PREFIX: &str = "recall_last_session_";
const SESSION_RESULTS_KEY: &str = "recall_session_results";
const DECK_PROGRESS_PREFIX: &str = "recall_deck_progress_";

/// Key of the last-session record for a deck title.
///
/// Decks sharing a title share this key.
#[must_use]
pub fn last_session_key(deck_title: &str) -> String {
    format!("{LAST_SESSION_PREFIX}{deck_title}")
}

/// Key of the progress record for a deck title.
#[must_use]
pub fn deck_progress_key(deck_title: &str) -> String {
    format!("{DECK_PROGRESS_PREFIX}{deck_title}")
}

/// Session results and deck progress encoded as JSON on top of a key/value backend.
///
/// Reads never fail on bad payloads: missing or malformed data comes back as
/// `None` (or an empty history). Backend errors are still returned.
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }

    /// Build a store backed by `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::open(database_url).await?;
        Ok(Self::new(Arc::new(repo)))
    }

    /// Last finished session for a deck title.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the backend itself fails.
    pub async fn get_last_session(
        &self,
        deck_title: &str,
    ) -> Result<Option<SessionResult>, StorageError> {
        let key = last_session_key(deck_title);
        let raw = self.kv.get(&key).await?;
        Ok(decode_or_absent(&key, raw))
    }

    /// Every appended session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the backend itself fails.
    pub async fn get_all_session_results(&self) -> Result<Vec<SessionResult>, StorageError> {
        let raw = self.kv.get(SESSION_RESULTS_KEY).await?;
        Ok(decode_or_absent(SESSION_RESULTS_KEY, raw).unwrap_or_default())
    }

    /// Per-card completion flags for a deck title.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the backend itself fails.
    pub async fn get_deck_progress(
        &self,
        deck_title: &str,
    ) -> Result<Option<DeckProgress>, StorageError> {
        let key = deck_progress_key(deck_title);
        let raw = self.kv.get(&key).await?;
        let record: Option<ProgressRecord> = decode_or_absent(&key, raw);
        Ok(record.and_then(|r| progress_from_record(&key, r)))
    }

    /// Remove everything this store has written. Keys outside the prefix are kept.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub async fn clear_all(&self) -> Result<u64, StorageError> {
        let removed = self.kv.remove_prefix(KEY_PREFIX).await?;
        debug!("cleared {removed} stored entries");
        Ok(removed)
    }
}

#[async_trait]
impl SessionPersistence for SessionStore {
    async fn save_last_session(
        &self,
        deck_title: &str,
        result: &SessionResult,
    ) -> Result<(), StorageError> {
        self.kv
            .set(&last_session_key(deck_title), &encode(result)?)
            .await
    }

    /// Read-modify-write over two backend calls. Concurrent appends from
    /// separate processes can drop one entry; the store assumes one user.
    async fn append_session_result(&self, result: &SessionResult) -> Result<(), StorageError> {
        let mut history = self.get_all_session_results().await?;
        history.push(result.clone());
        self.kv.set(SESSION_RESULTS_KEY, &encode(&history)?).await
    }

    async fn save_deck_progress(
        &self,
        deck_title: &str,
        progress: &DeckProgress,
    ) -> Result<(), StorageError> {
        let record = progress_to_record(progress);
        self.kv
            .set(&deck_progress_key(deck_title), &encode(&record)?)
            .await
    }
}
