//! Persistent key-value storage for JSON blobs.
//!
//! Every piece of state (accounts, session, question bank, history,
//! settings) lives under a fixed key. Reads distinguish an absent key
//! (`Ok(None)`) from a value that no longer parses (`Err(Corrupt)`).

mod file;
mod memory;

use std::borrow::Cow;
use std::io;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("failed to access '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("stored value for '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Fixed storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Users,
    Session,
    Questions,
    Stats,
    /// Score list for one user.
    UserScores(String),
    Games,
    Settings,
    ApiUrl,
}

impl StorageKey {
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            StorageKey::Users => Cow::Borrowed("f1_trivia_users"),
            StorageKey::Session => Cow::Borrowed("f1_trivia_session"),
            StorageKey::Questions => Cow::Borrowed("f1_trivia_questions"),
            StorageKey::Stats => Cow::Borrowed("f1_trivia_stats"),
            StorageKey::UserScores(user) => Cow::Owned(format!("{user}_scores")),
            StorageKey::Games => Cow::Borrowed("f1trivia_games"),
            StorageKey::Settings => Cow::Borrowed("quizSettings"),
            StorageKey::ApiUrl => Cow::Borrowed("quizApiUrl"),
        }
    }
}

/// Raw string storage under string keys.
pub trait Store: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed JSON access on top of any [`Store`].
pub trait StoreExt: Store {
    fn load<T: DeserializeOwned>(&self, key: &StorageKey) -> Result<Option<T>, StorageError> {
        let name = key.name();
        let Some(raw) = self.read(&name)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: name.into_owned(),
                source,
            })
    }

    /// Like [`StoreExt::load`], but an absent key yields `T::default()`.
    fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        key: &StorageKey,
    ) -> Result<T, StorageError> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    fn save<T: Serialize + ?Sized>(&self, key: &StorageKey, value: &T) -> Result<(), StorageError> {
        let name = key.name();
        let json = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: name.to_string(),
            source,
        })?;
        self.write(&name, &json)
    }

    fn delete(&self, key: &StorageKey) -> Result<(), StorageError> {
        self.remove(&key.name())
    }

    /// Append one item to a stored JSON array.
    fn push<T: Serialize + DeserializeOwned>(
        &self,
        key: &StorageKey,
        item: T,
    ) -> Result<(), StorageError> {
        let mut items: Vec<T> = self.load_or_default(key)?;
        items.push(item);
        self.save(key, &items)
    }
}

impl<S: Store + ?Sized> StoreExt for S {}
