//! Quiz configuration for the remote question source.
//!
//! Settings come from three places, highest priority first: explicit
//! overrides (command-line flags or a query string), the settings saved by
//! `setup`, and the built-in defaults. Empty or "any" values fall through to
//! the next layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_AMOUNT: u32 = 10;
pub const MIN_AMOUNT: u32 = 1;
pub const MAX_AMOUNT: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseSettingError {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    #[serde(rename = "")]
    Any,
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Any => "",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "any" => Ok(Difficulty::Any),
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ParseSettingError {
                kind: "difficulty",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Any => f.write_str("any"),
            other => f.write_str(other.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    #[serde(rename = "")]
    Any,
    Multiple,
    Boolean,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Any => "",
            QuestionType::Multiple => "multiple",
            QuestionType::Boolean => "boolean",
        }
    }
}

impl FromStr for QuestionType {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "any" => Ok(QuestionType::Any),
            "multiple" => Ok(QuestionType::Multiple),
            "boolean" => Ok(QuestionType::Boolean),
            other => Err(ParseSettingError {
                kind: "question type",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Any => f.write_str("any"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Resolved settings, also the shape persisted by `setup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    pub amount: u32,
    /// Category id, empty for any category.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(rename = "type", default)]
    pub kind: QuestionType,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT,
            category: String::new(),
            difficulty: Difficulty::Any,
            kind: QuestionType::Any,
        }
    }
}

/// Highest-priority settings layer. `amount` stays a raw string so that
/// unparsable input can fall back to the default the same way a bad number
/// does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub amount: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub kind: Option<QuestionType>,
}

impl SettingsOverrides {
    /// True when no layer value was given at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Parse `amount=5&category=9&difficulty=easy&type=multiple`.
    ///
    /// Unknown keys are ignored; unknown difficulty or type values are logged
    /// and treated as absent.
    pub fn from_query(query: &str) -> Self {
        let mut overrides = Self::default();
        let query = query.trim_start_matches('?');

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "amount" => overrides.amount = Some(value.into_owned()),
                "category" => overrides.category = Some(value.into_owned()),
                "difficulty" => match value.parse() {
                    Ok(d) => overrides.difficulty = Some(d),
                    Err(e) => log::warn!("ignoring query parameter: {e}"),
                },
                "type" => match value.parse() {
                    Ok(t) => overrides.kind = Some(t),
                    Err(e) => log::warn!("ignoring query parameter: {e}"),
                },
                _ => {}
            }
        }

        overrides
    }

    /// Layer `other` on top of `self`; values present in `other` win.
    pub fn merged_with(self, other: SettingsOverrides) -> Self {
        Self {
            amount: other.amount.or(self.amount),
            category: other.category.or(self.category),
            difficulty: other.difficulty.or(self.difficulty),
            kind: other.kind.or(self.kind),
        }
    }
}

impl QuizSettings {
    /// Combine overrides, persisted settings and defaults.
    pub fn resolve(overrides: &SettingsOverrides, persisted: Option<&QuizSettings>) -> Self {
        let defaults = QuizSettings::default();

        let amount_raw = non_empty(overrides.amount.as_deref())
            .map(str::to_string)
            .or_else(|| {
                persisted
                    .map(|p| p.amount)
                    .filter(|&a| a != 0)
                    .map(|a| a.to_string())
            });

        let category = non_empty(overrides.category.as_deref())
            .or_else(|| persisted.and_then(|p| non_empty(Some(p.category.as_str()))))
            .unwrap_or(defaults.category.as_str())
            .trim()
            .to_string();

        let difficulty = overrides
            .difficulty
            .filter(|d| *d != Difficulty::Any)
            .or_else(|| persisted.map(|p| p.difficulty).filter(|d| *d != Difficulty::Any))
            .unwrap_or(defaults.difficulty);

        let kind = overrides
            .kind
            .filter(|k| *k != QuestionType::Any)
            .or_else(|| persisted.map(|p| p.kind).filter(|k| *k != QuestionType::Any))
            .unwrap_or(defaults.kind);

        Self {
            amount: clamp_amount(amount_raw.as_deref()),
            category,
            difficulty,
            kind,
        }
    }
}

/// Unparsable or below-minimum amounts become the default; large ones are
/// capped.
pub fn clamp_amount(raw: Option<&str>) -> u32 {
    let Some(parsed) = raw.and_then(|r| r.trim().parse::<i64>().ok()) else {
        return DEFAULT_AMOUNT;
    };
    if parsed < i64::from(MIN_AMOUNT) {
        DEFAULT_AMOUNT
    } else if parsed > i64::from(MAX_AMOUNT) {
        MAX_AMOUNT
    } else {
        parsed as u32
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
