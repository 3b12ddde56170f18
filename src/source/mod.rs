//! Where quiz questions come from.
//!
//! Local questions are either the stored question bank or a JSON file;
//! remote questions are fetched from OpenTDB. Every source yields the same
//! validated [`Question`](crate::models::Question) shape.

pub mod local;
pub mod opentdb;
pub mod setup;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::ValidationError;
use crate::storage::StorageError;

pub use local::{default_questions, load_questions_from_json};
pub use opentdb::{Category, OpenTdbClient};
pub use setup::{quiz_url, save_setup};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} must contain at least one question", .0.display())]
    Empty(PathBuf),
    #[error("question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: ValidationError,
    },
    #[error("no questions found for those options (response code {code}), try different settings")]
    NoResults { code: u8 },
    #[error("trivia service returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
