//! The context a quiz runs in: the engine, who is playing, and where results
//! go. Every UI handler works through a [`QuizSession`] instead of shared
//! globals.

use std::sync::Arc;

use crate::engine::{EngineError, QuizEngine, Step};
use crate::models::Session;
use crate::stats;
use crate::storage::{StorageError, Store};
use crate::QuizError;

pub struct QuizSession {
    store: Arc<dyn Store>,
    user: Option<Session>,
    engine: QuizEngine,
}

impl QuizSession {
    /// Wrap `engine` and start it.
    pub fn start(store: Arc<dyn Store>, user: Option<Session>, mut engine: QuizEngine) -> Self {
        engine.start();
        Self { store, user, engine }
    }

    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    pub fn user(&self) -> Option<&Session> {
        self.user.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|s| s.username.as_str())
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn answer(&mut self, chosen: usize) -> Result<Step, QuizError> {
        let step = self.engine.answer_current(chosen)?;
        self.after(step)
    }

    pub fn timeout(&mut self) -> Result<Step, QuizError> {
        let step = self.engine.timeout()?;
        self.after(step)
    }

    pub fn tick(&mut self) -> Result<Option<Step>, QuizError> {
        match self.engine.tick() {
            Some(step) => self.after(step).map(Some),
            None => Ok(None),
        }
    }

    pub fn advance(&mut self) -> Result<Step, EngineError> {
        self.engine.advance()
    }

    pub fn back(&mut self) -> Result<Step, EngineError> {
        self.engine.back()
    }

    pub fn finish(&mut self) -> Result<Step, QuizError> {
        self.engine.finish()?;
        self.after(Step::Finished)
    }

    pub fn restart(&mut self) {
        self.engine.restart();
    }

    /// Persist the result when `step` finished the quiz.
    fn after(&mut self, step: Step) -> Result<Step, QuizError> {
        if step == Step::Finished {
            self.persist_result()?;
        }
        Ok(step)
    }

    fn persist_result(&self) -> Result<(), StorageError> {
        match self.engine.record() {
            Some(record) => stats::record_game(self.store.as_ref(), self.username(), record),
            None => Ok(()),
        }
    }
}
