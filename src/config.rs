use std::path::PathBuf;
use std::sync::Arc;

use log::LevelFilter;

use crate::engine::DEFAULT_QUESTION_SECONDS;
use crate::storage::{FileStore, StorageError, Store};

pub const DEFAULT_DATA_DIR: &str = ".f1-trivia";
pub const LOG_FILE_NAME: &str = "f1-trivia.log";

/// Runtime configuration shared by every command.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub question_seconds: u32,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            question_seconds: DEFAULT_QUESTION_SECONDS,
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    pub fn open_store(&self) -> Result<Arc<dyn Store>, StorageError> {
        Ok(Arc::new(FileStore::open(&self.data_dir)?))
    }
}
