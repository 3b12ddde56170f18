//! Game history: recording finished quizzes and summarising them.

use chrono::Utc;

use crate::models::{Attempt, GameRecord, StatsMap};
use crate::storage::{StorageError, StorageKey, Store, StoreExt};

/// Persist one finished quiz: the global game list always, and the per-user
/// score list and attempt history when someone is signed in.
pub fn record_game(
    store: &dyn Store,
    username: Option<&str>,
    record: &GameRecord,
) -> Result<(), StorageError> {
    store.push(&StorageKey::Games, record.clone())?;

    if let Some(user) = username {
        store.push(&StorageKey::UserScores(user.to_string()), record.score)?;

        let mut stats: StatsMap = store.load_or_default(&StorageKey::Stats)?;
        stats.entry(user.to_string()).or_default().attempts.push(Attempt {
            time: Utc::now().timestamp_millis(),
            score: record.score,
        });
        store.save(&StorageKey::Stats, &stats)?;
    }

    log::info!(
        "recorded game for {}: score {}, {}s",
        username.unwrap_or("guest"),
        record.score,
        record.time_taken
    );
    Ok(())
}

pub fn load_games(store: &dyn Store) -> Result<Vec<GameRecord>, StorageError> {
    store.load_or_default(&StorageKey::Games)
}

pub fn user_attempts(store: &dyn Store, username: &str) -> Result<Vec<Attempt>, StorageError> {
    let mut stats: StatsMap = store.load_or_default(&StorageKey::Stats)?;
    Ok(stats.remove(username).map(|s| s.attempts).unwrap_or_default())
}

pub fn user_scores(store: &dyn Store, username: &str) -> Result<Vec<usize>, StorageError> {
    store.load_or_default(&StorageKey::UserScores(username.to_string()))
}

/// Aggregates over the game list; `None` fields mean there is no history.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub games: Vec<GameRecord>,
    pub total_games: usize,
    pub average_score: Option<f64>,
    pub fastest_time: Option<u64>,
}

impl StatsSummary {
    pub fn from_games(games: Vec<GameRecord>) -> Self {
        let total_games = games.len();
        let average_score = (total_games > 0).then(|| {
            games.iter().map(|g| g.score as f64).sum::<f64>() / total_games as f64
        });
        let fastest_time = games.iter().map(|g| g.time_taken).min();

        Self {
            games,
            total_games,
            average_score,
            fastest_time,
        }
    }

    pub fn load(store: &dyn Store) -> Result<Self, StorageError> {
        load_games(store).map(Self::from_games)
    }

    /// Average score to one decimal, or `-` without history.
    pub fn average_label(&self) -> String {
        self.average_score
            .map_or_else(|| "-".to_string(), |avg| format!("{avg:.1}"))
    }

    pub fn fastest_label(&self) -> String {
        self.fastest_time
            .map_or_else(|| "-".to_string(), |secs| format!("{secs}s"))
    }
}

pub fn last_score(attempts: &[Attempt]) -> usize {
    attempts.last().map_or(0, |a| a.score)
}
