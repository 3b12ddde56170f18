//! Quiz state machine.
//!
//! One engine covers both ways of playing:
//!
//! * [`EngineMode::Free`]: move back and forth, change answers at will, and
//!   finish explicitly. Changing an answer only moves the score when the
//!   correctness of the choice changes.
//! * [`EngineMode::Timed`]: each question runs a countdown; the first answer
//!   locks the question and the quiz moves on by itself, finishing after the
//!   last question. An expired countdown counts as a wrong answer.
//!
//! The engine owns its own copy of the questions, so edits to the question
//! bank never reach a quiz that is already running.

mod countdown;

use std::collections::HashMap;
use std::time::Instant;

use chrono::Local;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{GameRecord, Question};

pub use countdown::{Countdown, LOW_TIME_SECONDS};

pub const DEFAULT_QUESTION_SECONDS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    Free,
    Timed { seconds: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStatus {
    NotStarted,
    InProgress(usize),
    Finished,
}

/// What was recorded for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// 1-based option index.
    Chosen(usize),
    TimedOut,
}

impl Answer {
    pub fn chosen(self) -> Option<usize> {
        match self {
            Answer::Chosen(index) => Some(index),
            Answer::TimedOut => None,
        }
    }
}

/// Where the quiz is after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Stay,
    Moved(usize),
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("there are no questions to play")]
    NoQuestions,
    #[error("the quiz is not in progress")]
    NotInProgress,
    #[error("question {0} is not part of this quiz")]
    UnknownQuestion(Uuid),
    #[error("option {chosen} does not exist (1..={options})")]
    ChoiceOutOfRange { chosen: usize, options: usize },
    #[error("this question has already been answered")]
    Locked,
}

/// A question next to what the player did with it.
#[derive(Debug, Clone, Copy)]
pub struct QuestionReview<'a> {
    pub question: &'a Question,
    pub answer: Option<Answer>,
    pub correct: bool,
}

#[derive(Debug, Clone)]
pub struct QuizEngine {
    questions: Vec<Question>,
    mode: EngineMode,
    status: QuizStatus,
    index: usize,
    score: usize,
    answers: HashMap<Uuid, Answer>,
    countdown: Option<Countdown>,
    started_at: Option<Instant>,
    record: Option<GameRecord>,
}

impl QuizEngine {
    pub fn new(questions: Vec<Question>, mode: EngineMode) -> Result<Self, EngineError> {
        if questions.is_empty() {
            return Err(EngineError::NoQuestions);
        }

        let countdown = match mode {
            EngineMode::Free => None,
            EngineMode::Timed { seconds } => Some(Countdown::new(seconds)),
        };

        Ok(Self {
            questions,
            mode,
            status: QuizStatus::NotStarted,
            index: 0,
            score: 0,
            answers: HashMap::new(),
            countdown,
            started_at: None,
            record: None,
        })
    }

    /// Begin (or begin again) from the first question with a clean slate.
    pub fn start(&mut self) {
        self.index = 0;
        self.score = 0;
        self.answers.clear();
        self.record = None;
        self.started_at = Some(Instant::now());
        self.load_question();
        log::debug!("quiz started with {} questions", self.questions.len());
    }

    pub fn restart(&mut self) {
        self.start();
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    pub fn status(&self) -> QuizStatus {
        self.status
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.index]
    }

    pub fn answer_for(&self, id: &Uuid) -> Option<Answer> {
        self.answers.get(id).copied()
    }

    pub fn answers(&self) -> &HashMap<Uuid, Answer> {
        &self.answers
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    /// Set once the quiz finishes; cleared by a restart.
    pub fn record(&self) -> Option<&GameRecord> {
        self.record.as_ref()
    }

    pub fn is_locked(&self, id: &Uuid) -> bool {
        matches!(self.mode, EngineMode::Timed { .. }) && self.answers.contains_key(id)
    }

    /// Record `chosen` (1-based) for question `id`.
    pub fn answer(&mut self, id: Uuid, chosen: usize) -> Result<Step, EngineError> {
        self.ensure_in_progress()?;
        let position = self
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or(EngineError::UnknownQuestion(id))?;

        let options = self.questions[position].options.len();
        if chosen < 1 || chosen > options {
            return Err(EngineError::ChoiceOutOfRange { chosen, options });
        }
        if self.is_locked(&id) {
            return Err(EngineError::Locked);
        }

        self.apply(position, Answer::Chosen(chosen));

        match self.mode {
            EngineMode::Free => Ok(Step::Stay),
            EngineMode::Timed { .. } => {
                self.stop_countdown();
                Ok(self.auto_advance())
            }
        }
    }

    pub fn answer_current(&mut self, chosen: usize) -> Result<Step, EngineError> {
        self.ensure_in_progress()?;
        let id = self.current_question().id;
        self.answer(id, chosen)
    }

    /// Count the current question as wrong and move on.
    pub fn timeout(&mut self) -> Result<Step, EngineError> {
        self.ensure_in_progress()?;
        self.stop_countdown();
        self.apply(self.index, Answer::TimedOut);
        log::debug!("question {} timed out", self.index + 1);
        Ok(self.auto_advance())
    }

    /// One second of countdown. Forces a timeout when it runs out.
    pub fn tick(&mut self) -> Option<Step> {
        if !matches!(self.status, QuizStatus::InProgress(_)) {
            return None;
        }
        let expired = self.countdown.as_mut().is_some_and(Countdown::tick);
        if expired { self.timeout().ok() } else { None }
    }

    pub fn advance(&mut self) -> Result<Step, EngineError> {
        self.go_to(self.index.saturating_add(1))
    }

    pub fn back(&mut self) -> Result<Step, EngineError> {
        self.go_to(self.index.saturating_sub(1))
    }

    /// Jump to `index`, clamped to the question range.
    pub fn go_to(&mut self, index: usize) -> Result<Step, EngineError> {
        self.ensure_in_progress()?;
        let target = index.min(self.questions.len() - 1);
        if target == self.index {
            return Ok(Step::Stay);
        }
        self.index = target;
        self.load_question();
        Ok(Step::Moved(target))
    }

    /// End the quiz and produce its record.
    pub fn finish(&mut self) -> Result<&GameRecord, EngineError> {
        self.ensure_in_progress()?;
        self.complete();
        self.record.as_ref().ok_or(EngineError::NotInProgress)
    }

    /// Per-question breakdown in quiz order.
    pub fn review(&self) -> Vec<QuestionReview<'_>> {
        self.questions
            .iter()
            .map(|question| {
                let answer = self.answer_for(&question.id);
                let correct = answer
                    .and_then(Answer::chosen)
                    .is_some_and(|chosen| question.is_correct(chosen));
                QuestionReview {
                    question,
                    answer,
                    correct,
                }
            })
            .collect()
    }

    fn ensure_in_progress(&self) -> Result<(), EngineError> {
        match self.status {
            QuizStatus::InProgress(_) => Ok(()),
            _ => Err(EngineError::NotInProgress),
        }
    }

    /// Score a new answer against whatever was recorded before.
    fn apply(&mut self, position: usize, answer: Answer) {
        let question = &self.questions[position];
        let is_correct =
            |a: Answer| a.chosen().is_some_and(|chosen| question.is_correct(chosen));
        let now_correct = is_correct(answer);

        match self.answers.insert(question.id, answer) {
            None if now_correct => self.score += 1,
            None => {}
            Some(previous) => match (is_correct(previous), now_correct) {
                (true, false) => self.score -= 1,
                (false, true) => self.score += 1,
                _ => {}
            },
        }
    }

    fn auto_advance(&mut self) -> Step {
        if self.index + 1 < self.questions.len() {
            self.index += 1;
            self.load_question();
            Step::Moved(self.index)
        } else {
            self.complete();
            Step::Finished
        }
    }

    fn load_question(&mut self) {
        self.status = QuizStatus::InProgress(self.index);
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.reset();
        }
    }

    fn stop_countdown(&mut self) {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.stop();
        }
    }

    fn complete(&mut self) {
        self.stop_countdown();
        self.status = QuizStatus::Finished;

        let time_taken = self
            .started_at
            .map(|start| start.elapsed().as_secs_f64().round() as u64)
            .unwrap_or(0);
        let record = GameRecord {
            date: Local::now().format("%Y-%m-%d").to_string(),
            score: self.score,
            time_taken,
        };
        log::info!(
            "quiz finished: {}/{} in {}s",
            record.score,
            self.questions.len(),
            record.time_taken
        );
        self.record = Some(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionDraft;

    fn question(text: &str, correct: usize) -> Question {
        Question::create(QuestionDraft::new(text, ["A", "B", "C", "D"], correct)).unwrap()
    }

    fn free_engine() -> QuizEngine {
        let mut engine = QuizEngine::new(
            vec![question("one", 3), question("two", 1), question("three", 2)],
            EngineMode::Free,
        )
        .unwrap();
        engine.start();
        engine
    }

    fn timed_engine(seconds: u32) -> QuizEngine {
        let mut engine = QuizEngine::new(
            vec![question("one", 3), question("two", 1)],
            EngineMode::Timed { seconds },
        )
        .unwrap();
        engine.start();
        engine
    }

    #[test]
    fn test_empty_quiz_is_rejected() {
        assert_eq!(
            QuizEngine::new(Vec::new(), EngineMode::Free).unwrap_err(),
            EngineError::NoQuestions
        );
    }

    #[test]
    fn test_not_started_rejects_answers() {
        let mut engine = QuizEngine::new(vec![question("one", 1)], EngineMode::Free).unwrap();
        assert_eq!(engine.status(), QuizStatus::NotStarted);
        assert_eq!(engine.answer_current(1), Err(EngineError::NotInProgress));
    }

    #[test]
    fn test_switching_answers_rescores() {
        let mut engine = free_engine();
        let id = engine.current_question().id;

        // correct answer is option 3 ("C")
        assert_eq!(engine.answer(id, 3), Ok(Step::Stay));
        assert_eq!(engine.score(), 1);
        engine.answer(id, 1).unwrap();
        assert_eq!(engine.score(), 0);
        engine.answer(id, 2).unwrap();
        assert_eq!(engine.score(), 0);
        engine.answer(id, 3).unwrap();
        assert_eq!(engine.score(), 1);
        engine.answer(id, 3).unwrap();
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.answer_for(&id), Some(Answer::Chosen(3)));
    }

    #[test]
    fn test_wrong_then_right_nets_one() {
        let mut engine = free_engine();
        let id = engine.current_question().id;
        engine.answer(id, 4).unwrap();
        assert_eq!(engine.score(), 0);
        engine.answer(id, 3).unwrap();
        assert_eq!(engine.score(), 1);
    }

    #[test]
    fn test_rejects_unknown_question_and_bad_choice() {
        let mut engine = free_engine();
        let stranger = Uuid::new_v4();
        assert_eq!(
            engine.answer(stranger, 1),
            Err(EngineError::UnknownQuestion(stranger))
        );
        assert_eq!(
            engine.answer_current(5),
            Err(EngineError::ChoiceOutOfRange {
                chosen: 5,
                options: 4
            })
        );
        assert_eq!(engine.answer_current(0).unwrap_err(), EngineError::ChoiceOutOfRange {
            chosen: 0,
            options: 4
        });
    }

    #[test]
    fn test_navigation_clamps() {
        let mut engine = free_engine();
        assert_eq!(engine.back(), Ok(Step::Stay));
        assert_eq!(engine.advance(), Ok(Step::Moved(1)));
        assert_eq!(engine.advance(), Ok(Step::Moved(2)));
        assert_eq!(engine.advance(), Ok(Step::Stay));
        assert_eq!(engine.index(), 2);
        assert_eq!(engine.go_to(99), Ok(Step::Stay));
        assert_eq!(engine.back(), Ok(Step::Moved(1)));
        assert_eq!(engine.status(), QuizStatus::InProgress(1));
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut engine = free_engine();
        engine.answer_current(3).unwrap();
        engine.advance().unwrap();
        engine.finish().unwrap();

        engine.restart();
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.index(), 0);
        assert!(engine.answers().is_empty());
        assert!(engine.record().is_none());
        assert_eq!(engine.status(), QuizStatus::InProgress(0));
    }

    #[test]
    fn test_finish_produces_record_once() {
        let mut engine = free_engine();
        engine.answer_current(3).unwrap();
        let record = engine.finish().unwrap().clone();
        assert_eq!(record.score, 1);
        assert_eq!(engine.status(), QuizStatus::Finished);
        assert_eq!(engine.finish().unwrap_err(), EngineError::NotInProgress);
        assert_eq!(engine.advance(), Err(EngineError::NotInProgress));
    }

    #[test]
    fn test_timed_answer_locks_and_advances() {
        let mut engine = timed_engine(15);
        let first = engine.current_question().id;

        assert_eq!(engine.answer_current(3), Ok(Step::Moved(1)));
        assert_eq!(engine.score(), 1);
        assert!(engine.is_locked(&first));
        assert_eq!(engine.answer(first, 1), Err(EngineError::Locked));
        assert_eq!(engine.score(), 1);

        assert_eq!(engine.answer_current(2), Ok(Step::Finished));
        assert_eq!(engine.status(), QuizStatus::Finished);
        assert_eq!(engine.record().map(|r| r.score), Some(1));
    }

    #[test]
    fn test_countdown_forces_timeout() {
        let mut engine = timed_engine(2);
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.tick(), Some(Step::Moved(1)));

        let first = engine.questions()[0].id;
        assert_eq!(engine.answer_for(&first), Some(Answer::TimedOut));
        assert_eq!(engine.score(), 0);
        // the next question starts with a full countdown
        assert_eq!(engine.countdown().map(Countdown::remaining), Some(2));
    }

    #[test]
    fn test_timeout_on_last_question_finishes() {
        let mut engine = timed_engine(1);
        engine.answer_current(3).unwrap();
        assert_eq!(engine.tick(), Some(Step::Finished));
        assert_eq!(engine.status(), QuizStatus::Finished);
        assert_eq!(engine.record().map(|r| r.score), Some(1));
        assert_eq!(engine.tick(), None);
        assert!(!engine.countdown().is_some_and(Countdown::is_running));
    }

    #[test]
    fn test_manual_answer_stops_countdown_until_next_load() {
        let mut engine = timed_engine(5);
        engine.tick();
        engine.tick();
        engine.answer_current(1).unwrap();
        assert_eq!(engine.countdown().map(Countdown::remaining), Some(5));
        assert!(engine.countdown().is_some_and(Countdown::is_running));
    }

    #[test]
    fn test_review_marks_correctness() {
        let mut engine = free_engine();
        engine.answer_current(3).unwrap();
        engine.advance().unwrap();
        engine.answer_current(2).unwrap();

        let review = engine.review();
        assert_eq!(review.len(), 3);
        assert!(review[0].correct);
        assert!(!review[1].correct);
        assert_eq!(review[1].answer, Some(Answer::Chosen(2)));
        assert!(review[2].answer.is_none());
    }

    #[test]
    fn test_engine_keeps_its_own_copy() {
        let mut bank = vec![question("one", 1), question("two", 1)];
        let mut engine = QuizEngine::new(bank.clone(), EngineMode::Free).unwrap();
        engine.start();
        bank.remove(0);
        assert_eq!(engine.total_questions(), 2);
        assert_eq!(engine.current_question().text, "one");
    }
}
