use std::sync::Arc;

use f1_trivia::auth::{Auth, AuthError};
use f1_trivia::engine::{EngineMode, QuizEngine, QuizStatus, Step};
use f1_trivia::manager::{QuestionManager, SortOrder};
use f1_trivia::models::{Question, QuestionDraft, StatsMap};
use f1_trivia::stats::{self, StatsSummary};
use f1_trivia::storage::{FileStore, StorageError, StorageKey, Store, StoreExt};
use f1_trivia::{ManagerError, QuizSession};
use tempfile::TempDir;

fn file_store(dir: &TempDir) -> Arc<dyn Store> {
    Arc::new(FileStore::open(dir.path()).unwrap())
}

#[test]
fn deleted_question_stays_in_running_quiz_but_not_the_next_one() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    let manager = QuestionManager::new(Arc::clone(&store));
    assert!(manager.seed_defaults().unwrap());

    let doomed = manager
        .create(QuestionDraft::new("Who won in 2021?", ["Max", "Lewis"], 1))
        .unwrap();

    let engine = QuizEngine::new(manager.quiz_questions().unwrap(), EngineMode::Free).unwrap();
    let session = QuizSession::start(Arc::clone(&store), None, engine);
    assert_eq!(session.engine().total_questions(), 3);

    manager.delete(doomed.id).unwrap();

    assert!(session
        .engine()
        .questions()
        .iter()
        .any(|q| q.id == doomed.id));
    assert!(manager
        .list("", SortOrder::Recency)
        .unwrap()
        .iter()
        .all(|q| q.id != doomed.id));
    assert_eq!(manager.quiz_questions().unwrap().len(), 2);
}

#[test]
fn signed_in_player_gets_history_and_personal_stats() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    let auth = Auth::new(Arc::clone(&store));

    auth.register("kimi", "iceman").unwrap();
    assert!(matches!(
        auth.sign_in("kimi", "wrong"),
        Err(AuthError::InvalidCredentials)
    ));
    let user = auth.sign_in("kimi", "iceman").unwrap();

    let engine = QuizEngine::new(
        vec![
            Question::create(QuestionDraft::new("Q1", ["A", "B", "C", "D"], 3)).unwrap(),
        ],
        EngineMode::Timed { seconds: 2 },
    )
    .unwrap();
    let mut session = QuizSession::start(Arc::clone(&store), Some(user), engine);

    assert_eq!(session.tick().unwrap(), None);
    assert_eq!(session.tick().unwrap(), Some(Step::Finished));
    assert_eq!(session.engine().status(), QuizStatus::Finished);

    // A fresh store over the same directory sees what was written.
    let reopened = file_store(&dir);
    let games = stats::load_games(reopened.as_ref()).unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].score, 0);

    let attempts = stats::user_attempts(reopened.as_ref(), "kimi").unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(stats::user_scores(reopened.as_ref(), "kimi").unwrap(), vec![0]);

    let stats_map: StatsMap = reopened.load_or_default(&StorageKey::Stats).unwrap();
    assert!(stats_map.contains_key("kimi"));

    let summary = StatsSummary::load(reopened.as_ref()).unwrap();
    assert_eq!(summary.total_games, 1);
    assert_eq!(summary.average_label(), "0.0");
}

#[test]
fn switching_answers_adjusts_score_by_one() {
    let question = Question::create(QuestionDraft::new(
        "Pick C",
        ["A", "B", "C", "D"],
        3,
    ))
    .unwrap();
    let mut engine = QuizEngine::new(vec![question.clone()], EngineMode::Free).unwrap();
    engine.start();

    engine.answer(question.id, 3).unwrap();
    assert_eq!(engine.score(), 1);
    engine.answer(question.id, 1).unwrap();
    assert_eq!(engine.score(), 0);
    engine.answer(question.id, 3).unwrap();
    engine.answer(question.id, 3).unwrap();
    assert_eq!(engine.score(), 1);
}

#[test]
fn corrupt_question_bank_is_reported() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    store
        .write(&StorageKey::Questions.name(), "{not json")
        .unwrap();

    let manager = QuestionManager::new(store);
    let err = manager.all().unwrap_err();
    assert!(matches!(
        err,
        ManagerError::Storage(StorageError::Corrupt { .. })
    ));
}

#[test]
fn guest_games_are_recorded_without_personal_stats() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    let manager = QuestionManager::new(Arc::clone(&store));
    manager.seed_defaults().unwrap();

    let engine = QuizEngine::new(manager.quiz_questions().unwrap(), EngineMode::Free).unwrap();
    let mut session = QuizSession::start(Arc::clone(&store), None, engine);
    session.answer(3).unwrap();
    session.finish().unwrap();

    let games = stats::load_games(store.as_ref()).unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].score, 1);
    let stats_map: StatsMap = store.load_or_default(&StorageKey::Stats).unwrap();
    assert!(stats_map.is_empty());
}

#[test]
fn stored_question_with_bad_answer_index_is_rejected_before_play() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    let raw = format!(
        r#"[{{"id":"{}","text":"Who?","options":["A","B"],"correctIndex":3,"created":0}}]"#,
        uuid::Uuid::new_v4()
    );
    store.write(&StorageKey::Questions.name(), &raw).unwrap();

    let manager = QuestionManager::new(store);
    assert!(matches!(
        manager.quiz_questions(),
        Err(ManagerError::Corrupt { .. })
    ));
}
