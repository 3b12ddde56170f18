use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Summary of one completed quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub date: String,
    pub score: usize,
    /// Seconds from start to finish.
    pub time_taken: u64,
}

/// One scored attempt in a user's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    /// Milliseconds since the Unix epoch.
    pub time: i64,
    pub score: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub attempts: Vec<Attempt>,
}

/// Attempt history keyed by username.
pub type StatsMap = BTreeMap<String, UserStats>;
