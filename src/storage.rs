use crate::model::{PersonalTendencies, PlayerHistory, PersonalizationUpdate};
use async_trait::async_trait;
use std::error::Error;
use std::fmt;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Clone)]
pub struct StorageError {
    message: String,
    timed_out: bool,
}

impl StorageError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    /// The call was abandoned, not refused; a write may still have landed.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.timed_out
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for StorageError {}

impl From<String> for StorageError {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for StorageError {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::new(format!("sqlite: {value}"))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::new(format!("json: {value}"))
    }
}

impl From<chrono::ParseError> for StorageError {
    fn from(value: chrono::ParseError) -> Self {
        Self::new(format!("bad timestamp: {value}"))
    }
}

impl From<tokio::task::JoinError> for StorageError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::new(format!("store task failed: {value}"))
    }
}

/// Persistence for a player's raw history and the tendencies derived from it.
///
/// The advice pipeline only reads through this trait; any error it returns is
/// treated as "no personalization" rather than a failed request.
#[async_trait]
pub trait TendencyStore: Send + Sync {
    async fn load_history(&self, user_id: &str) -> Result<Option<PlayerHistory>, StorageError>;
    async fn append_history(
        &self,
        user_id: &str,
        update: &PersonalizationUpdate,
    ) -> Result<(), StorageError>;
    async fn load_tendencies(
        &self,
        user_id: &str,
    ) -> Result<Option<PersonalTendencies>, StorageError>;
    async fn save_tendencies(
        &self,
        user_id: &str,
        tendencies: &PersonalTendencies,
    ) -> Result<(), StorageError>;
}
