//! Question bank maintenance.
//!
//! Every mutation writes the whole list back to storage straight away.

use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{Question, QuestionDraft, ValidationError};
use crate::source::default_questions;
use crate::storage::{StorageError, StorageKey, Store, StoreExt};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ManagerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no question with id {0}")]
    NotFound(Uuid),
    #[error("stored question {id} is corrupt: {source}")]
    Corrupt {
        id: Uuid,
        #[source]
        source: ValidationError,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Recency,
    /// Alphabetical by question text.
    Text,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recency" | "recent" | "newest" => Ok(SortOrder::Recency),
            "text" | "alpha" => Ok(SortOrder::Text),
            other => Err(format!("unknown sort order '{other}' (use text or recency)")),
        }
    }
}

pub struct QuestionManager {
    store: Arc<dyn Store>,
}

impl QuestionManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// All stored questions in storage order (newest first). Every question
    /// is checked again; one that breaks the rules fails the whole load.
    pub fn all(&self) -> Result<Vec<Question>, ManagerError> {
        let questions: Vec<Question> = self.store.load_or_default(&StorageKey::Questions)?;
        for question in &questions {
            question.check().map_err(|source| ManagerError::Corrupt {
                id: question.id,
                source,
            })?;
        }
        Ok(questions)
    }

    pub fn get(&self, id: Uuid) -> Result<Question, ManagerError> {
        self.all()?
            .into_iter()
            .find(|q| q.id == id)
            .ok_or(ManagerError::NotFound(id))
    }

    /// Validate and store a new question at the front of the bank.
    pub fn create(&self, draft: QuestionDraft) -> Result<Question, ManagerError> {
        let question = Question::create(draft)?;
        let mut questions = self.all()?;
        questions.insert(0, question.clone());
        self.save(&questions)?;
        log::info!("created question {}", question.id);
        Ok(question)
    }

    /// Filter by case-insensitive substring and sort.
    pub fn list(&self, filter: &str, sort: SortOrder) -> Result<Vec<Question>, ManagerError> {
        let needle = filter.trim().to_lowercase();
        let mut questions: Vec<Question> = self
            .all()?
            .into_iter()
            .filter(|q| needle.is_empty() || q.text.to_lowercase().contains(&needle))
            .collect();

        match sort {
            SortOrder::Text => questions.sort_by_key(|q| q.text.to_lowercase()),
            SortOrder::Recency => questions.sort_by(|a, b| b.created.cmp(&a.created)),
        }
        Ok(questions)
    }

    /// Replace the content of question `id` in place, keeping its id,
    /// creation time and position.
    pub fn update(&self, id: Uuid, draft: QuestionDraft) -> Result<Question, ManagerError> {
        let draft = draft.validate()?;
        let mut questions = self.all()?;
        let existing = questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or(ManagerError::NotFound(id))?;

        existing.text = draft.text;
        existing.options = draft.options;
        existing.correct_index = draft.correct_index;
        let updated = existing.clone();

        self.save(&questions)?;
        log::info!("updated question {id}");
        Ok(updated)
    }

    pub fn delete(&self, id: Uuid) -> Result<Question, ManagerError> {
        let mut questions = self.all()?;
        let position = questions
            .iter()
            .position(|q| q.id == id)
            .ok_or(ManagerError::NotFound(id))?;
        let removed = questions.remove(position);
        self.save(&questions)?;
        log::info!("deleted question {id}");
        Ok(removed)
    }

    pub fn clear(&self) -> Result<(), ManagerError> {
        self.save(&[])?;
        log::info!("cleared question bank");
        Ok(())
    }

    /// Store the default questions when the bank is empty. Returns true if it
    /// seeded.
    pub fn seed_defaults(&self) -> Result<bool, ManagerError> {
        if !self.all()?.is_empty() {
            return Ok(false);
        }
        self.store_defaults()?;
        Ok(true)
    }

    /// Questions for a new quiz, seeding the bank first if it is empty.
    pub fn quiz_questions(&self) -> Result<Vec<Question>, ManagerError> {
        let questions = self.all()?;
        if questions.is_empty() {
            return Ok(self.store_defaults()?);
        }
        Ok(questions)
    }

    fn store_defaults(&self) -> Result<Vec<Question>, StorageError> {
        let defaults = default_questions();
        self.save(&defaults)?;
        log::info!("question bank was empty; stored the default questions");
        Ok(defaults)
    }

    fn save(&self, questions: &[Question]) -> Result<(), StorageError> {
        self.store.save(&StorageKey::Questions, questions)
    }
}
