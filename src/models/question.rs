use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 4;

/// Reasons a question draft is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("question text must not be empty")]
    EmptyText,
    #[error("provide at least {MIN_OPTIONS} options (got {0})")]
    TooFewOptions(usize),
    #[error("at most {MAX_OPTIONS} options are allowed (got {0})")]
    TooManyOptions(usize),
    #[error("correct index {index} is outside 1..={options}")]
    CorrectIndexOutOfRange { index: usize, options: usize },
    #[error("options must not be blank")]
    BlankOption,
}

/// A stored quiz question. `correct_index` is 1-based into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    /// Milliseconds since the Unix epoch.
    pub created: i64,
}

impl Question {
    /// Validate `draft` and give it a fresh id and creation time.
    pub fn create(draft: QuestionDraft) -> Result<Self, ValidationError> {
        let draft = draft.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            text: draft.text,
            options: draft.options,
            correct_index: draft.correct_index,
            created: Utc::now().timestamp_millis(),
        })
    }

    /// Check a question that did not come through [`Question::create`], such
    /// as one read back from storage.
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(ValidationError::BlankOption);
        }
        check_bounds(&self.text, self.options.len(), self.correct_index)
    }

    pub fn correct_answer(&self) -> &str {
        &self.options[self.correct_index - 1]
    }

    pub fn is_correct(&self, chosen: usize) -> bool {
        chosen == self.correct_index
    }

    /// Option text for a 1-based index.
    pub fn option(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }
}

/// User-supplied question content before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl QuestionDraft {
    pub fn new<T, O>(text: T, options: O, correct_index: usize) -> Self
    where
        T: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_index,
        }
    }

    /// Trim text and options, drop blank options, then check bounds.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let text = self.text.trim().to_string();
        let options: Vec<String> = self
            .options
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        check_bounds(&text, options.len(), self.correct_index)?;

        Ok(Self {
            text,
            options,
            correct_index: self.correct_index,
        })
    }
}

fn check_bounds(text: &str, options: usize, correct_index: usize) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    if options < MIN_OPTIONS {
        return Err(ValidationError::TooFewOptions(options));
    }
    if options > MAX_OPTIONS {
        return Err(ValidationError::TooManyOptions(options));
    }
    if correct_index < 1 || correct_index > options {
        return Err(ValidationError::CorrectIndexOutOfRange {
            index: correct_index,
            options,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trims_and_drops_blank_options() {
        let draft = QuestionDraft::new("  Who?  ", ["A", "  ", "B ", ""], 2);
        let question = Question::create(draft).unwrap();
        assert_eq!(question.text, "Who?");
        assert_eq!(question.options, vec!["A", "B"]);
        assert_eq!(question.correct_answer(), "B");
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            QuestionDraft::new(" ", ["A", "B"], 1).validate(),
            Err(ValidationError::EmptyText)
        );
        assert_eq!(
            QuestionDraft::new("Q", ["A", ""], 1).validate(),
            Err(ValidationError::TooFewOptions(1))
        );
        assert_eq!(
            QuestionDraft::new("Q", ["A", "B", "C", "D", "E"], 1).validate(),
            Err(ValidationError::TooManyOptions(5))
        );
        assert_eq!(
            QuestionDraft::new("Q", ["A", "B", "C"], 4).validate(),
            Err(ValidationError::CorrectIndexOutOfRange { index: 4, options: 3 })
        );
        assert!(QuestionDraft::new("Q", ["A", "B"], 0).validate().is_err());
    }

    #[test]
    fn test_valid_questions_stay_in_bounds() {
        for count in MIN_OPTIONS..=MAX_OPTIONS {
            for correct in 1..=count {
                let options: Vec<String> = (0..count).map(|i| format!("opt {i}")).collect();
                let q = Question::create(QuestionDraft::new("Q", options, correct)).unwrap();
                assert!((MIN_OPTIONS..=MAX_OPTIONS).contains(&q.options.len()));
                assert!(q.correct_index >= 1 && q.correct_index <= q.options.len());
            }
        }
    }

    #[test]
    fn test_json_uses_camel_case() {
        let q = Question::create(QuestionDraft::new("Q", ["A", "B"], 1)).unwrap();
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"correctIndex\":1"));
        assert!(json.contains("\"created\":"));
    }

    #[test]
    fn test_option_lookup_is_one_based() {
        let q = Question::create(QuestionDraft::new("Q", ["A", "B"], 1)).unwrap();
        assert_eq!(q.option(1), Some("A"));
        assert_eq!(q.option(0), None);
        assert_eq!(q.option(3), None);
    }

    #[test]
    fn test_check_catches_questions_built_outside_create() {
        let mut q = Question::create(QuestionDraft::new("Q", ["A", "B"], 1)).unwrap();
        assert_eq!(q.check(), Ok(()));

        q.correct_index = 0;
        assert_eq!(
            q.check(),
            Err(ValidationError::CorrectIndexOutOfRange { index: 0, options: 2 })
        );

        q.correct_index = 1;
        q.options.clear();
        assert_eq!(q.check(), Err(ValidationError::TooFewOptions(0)));

        q.options = vec!["A".into(), "B".into(), "C".into(), "D".into(), "E".into()];
        assert_eq!(q.check(), Err(ValidationError::TooManyOptions(5)));

        q.options = vec!["A".into(), " ".into()];
        assert_eq!(q.check(), Err(ValidationError::BlankOption));
    }
}
