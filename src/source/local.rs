use std::fs;
use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{Question, QuestionDraft};

use super::SourceError;

/// The two F1 questions every empty bank starts with.
pub fn default_questions() -> Vec<Question> {
    let now = Utc::now().timestamp_millis();
    let defaults = [
        QuestionDraft::new(
            "Who holds the record for the most Formula 1 World Championships?",
            [
                "Michael Schumacher",
                "Lewis Hamilton",
                "Both are tied with 7",
                "Ayrton Senna",
            ],
            3,
        ),
        QuestionDraft::new(
            "Which team was dominant in the early 2010s with Sebastian Vettel?",
            ["McLaren", "Red Bull Racing", "Ferrari", "Williams"],
            2,
        ),
    ];

    defaults
        .into_iter()
        .map(|draft| Question {
            id: Uuid::new_v4(),
            text: draft.text,
            options: draft.options,
            correct_index: draft.correct_index,
            created: now,
        })
        .collect()
}

/// Load question drafts from a JSON array file and validate each one.
///
/// Each entry has `text`, `options` and a 1-based `correctIndex`.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, SourceError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let drafts: Vec<QuestionDraft> =
        serde_json::from_str(&json_content).map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if drafts.is_empty() {
        return Err(SourceError::Empty(path.to_path_buf()));
    }

    let questions = drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            Question::create(draft).map_err(|source| SourceError::InvalidQuestion {
                index: index + 1,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::info!("loaded {} questions from {}", questions.len(), path.display());
    Ok(questions)
}
