mod question;
mod record;
mod settings;
mod user;

pub use question::{MAX_OPTIONS, MIN_OPTIONS, Question, QuestionDraft, ValidationError};
pub use record::{Attempt, GameRecord, StatsMap, UserStats};
pub use settings::{
    DEFAULT_AMOUNT, Difficulty, MAX_AMOUNT, ParseSettingError, QuestionType, QuizSettings,
    SettingsOverrides, clamp_amount,
};
pub use user::{Session, User, Users};
