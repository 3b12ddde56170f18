//! # f1-trivia
//!
//! A Formula 1 trivia quiz for the terminal. Questions come from a local,
//! persisted question bank or from the Open Trivia Database; accounts, game
//! history and per-user stats live in a small JSON store under the data
//! directory.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use f1_trivia::engine::{EngineMode, QuizEngine};
//! use f1_trivia::source::default_questions;
//! use f1_trivia::storage::MemoryStore;
//! use f1_trivia::{Quiz, QuizError, QuizSession};
//!
//! fn main() -> Result<(), QuizError> {
//!     let engine = QuizEngine::new(default_questions(), EngineMode::Free)?;
//!     let session = QuizSession::start(Arc::new(MemoryStore::new()), None, engine);
//!     Quiz::new(session, ".".into()).run()
//! }
//! ```

pub mod app;
pub mod auth;
pub mod config;
pub mod engine;
pub mod export;
pub mod logging;
pub mod manager;
pub mod models;
pub mod session;
pub mod source;
pub mod stats;
pub mod storage;
pub mod terminal;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;

pub use app::{App, Screen};
pub use auth::{Auth, AuthError};
pub use config::Config;
pub use engine::{EngineError, EngineMode, QuizEngine};
pub use export::ExportError;
pub use logging::LoggingError;
pub use manager::{ManagerError, QuestionManager};
pub use models::{Question, QuizSettings};
pub use session::QuizSession;
pub use source::SourceError;
pub use storage::StorageError;

/// One countdown second.
const TICK_RATE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum QuizError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Manager(#[from] ManagerError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("failed to load questions: {0}")]
    Source(#[from] SourceError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz ready to take over the terminal.
pub struct Quiz {
    app: App,
}

impl Quiz {
    pub fn new(session: QuizSession, export_dir: PathBuf) -> Self {
        Self {
            app: App::new(session, export_dir),
        }
    }

    /// Run the quiz in the terminal.
    ///
    /// Takes over the terminal, displays the quiz UI and returns when the
    /// user quits. The terminal is restored even if the loop fails.
    pub fn run(mut self) -> Result<(), QuizError> {
        let mut guard = terminal::TerminalGuard::enter()?;
        run_event_loop(guard.terminal(), &mut self.app)
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

fn run_event_loop(terminal: &mut terminal::QuizTerminal, app: &mut App) -> Result<(), QuizError> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                let before = app.position();
                if handle_input(app, key.code) {
                    break;
                }
                // A new question gets a full first second.
                if app.position() != before {
                    last_tick = Instant::now();
                }
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.on_tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> bool {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
        return true;
    }

    match app.screen {
        Screen::Welcome => handle_welcome_input(app, key),
        Screen::Quiz => handle_quiz_input(app, key),
        Screen::Result => handle_result_input(app, key),
        Screen::Stats => handle_stats_input(app, key),
    }
    false
}

fn handle_welcome_input(app: &mut App, key: KeyCode) {
    if key == KeyCode::Enter {
        app.start_quiz();
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) {
    let timed = app.is_timed();
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(number) = c.to_digit(10) {
                app.select_option(number as usize);
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.submit_answer(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') if !timed => app.next_question(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') if !timed => {
            app.previous_question()
        }
        KeyCode::Char('f') if !timed => app.finish_quiz(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
        _ => {}
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
        KeyCode::Char('s') => app.show_stats(),
        KeyCode::Char('e') => app.export_quiz(),
        _ => {}
    }
}

fn handle_stats_input(app: &mut App, key: KeyCode) {
    if matches!(key, KeyCode::Esc | KeyCode::Char('b')) {
        app.close_stats();
    }
}
