//! JSON downloads of the question bank and of a played quiz.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Question;
use crate::session::QuizSession;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

/// Snapshot of a quiz as exported.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizExport<'a> {
    pub created_by: &'a str,
    pub questions: &'a [Question],
    pub taken_at: i64,
    /// Question id to chosen 1-based index; `null` for a timed-out question.
    pub answers: BTreeMap<Uuid, Option<usize>>,
    pub score: usize,
}

impl<'a> QuizExport<'a> {
    pub fn from_session(session: &'a QuizSession) -> Self {
        let engine = session.engine();
        Self {
            created_by: session.username().unwrap_or("guest"),
            questions: engine.questions(),
            taken_at: Utc::now().timestamp_millis(),
            answers: engine
                .answers()
                .iter()
                .map(|(id, answer)| (*id, answer.chosen()))
                .collect(),
            score: engine.score(),
        }
    }
}

/// Write every question to `f1_quiz_all_<ms>.json` in `dir`.
pub fn export_all_questions(questions: &[Question], dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("f1_quiz_all_{}.json", Utc::now().timestamp_millis()));
    write_json(&path, &questions)?;
    Ok(path)
}

/// Write the session's questions, answers and score to `f1_quiz_<ms>.json`.
pub fn export_quiz(session: &QuizSession, dir: &Path) -> Result<PathBuf, ExportError> {
    let export = QuizExport::from_session(session);
    let path = dir.join(format!("f1_quiz_{}.json", export.taken_at));
    write_json(&path, &export)?;
    Ok(path)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("exported {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine::{EngineMode, QuizEngine};
    use crate::models::QuestionDraft;
    use crate::storage::MemoryStore;

    #[test]
    fn test_export_all_writes_pretty_array() {
        let dir = tempfile::tempdir().unwrap();
        let questions =
            vec![Question::create(QuestionDraft::new("Q", ["A", "B"], 2)).unwrap()];

        let path = export_all_questions(&questions, dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("f1_quiz_all_") && name.ends_with(".json"));

        let written: Vec<Question> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, questions);
    }

    #[test]
    fn test_export_quiz_as_guest() {
        let dir = tempfile::tempdir().unwrap();
        let questions = vec![
            Question::create(QuestionDraft::new("one", ["A", "B"], 2)).unwrap(),
            Question::create(QuestionDraft::new("two", ["A", "B"], 1)).unwrap(),
        ];
        let first = questions[0].id;
        let engine = QuizEngine::new(questions, EngineMode::Free).unwrap();
        let mut session = QuizSession::start(Arc::new(MemoryStore::new()), None, engine);
        session.answer(2).unwrap();

        let path = export_quiz(&session, dir.path()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["createdBy"], "guest");
        assert_eq!(value["score"], 1);
        assert_eq!(value["questions"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["answers"][first.to_string()], 2);
        assert!(value["takenAt"].is_i64());
    }
}
