use std::path::PathBuf;

use crate::engine::{EngineMode, QuizStatus, Step};
use crate::export;
use crate::session::QuizSession;
use crate::stats::{self, StatsSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Quiz,
    Result,
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Bad,
    Info,
}

/// One-line feedback shown under the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tone: Tone,
}

/// Stats page data: the summary plus the signed-in user's last score.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub summary: StatsSummary,
    pub last_score: Option<usize>,
}

pub struct App {
    pub screen: Screen,
    session: QuizSession,
    selected_option: usize,
    result_scroll: usize,
    status: Option<StatusLine>,
    stats: Option<StatsView>,
    export_dir: PathBuf,
}

impl App {
    pub fn new(session: QuizSession, export_dir: PathBuf) -> Self {
        Self {
            screen: Screen::Welcome,
            session,
            selected_option: 0,
            result_scroll: 0,
            status: None,
            stats: None,
            export_dir,
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    pub fn stats(&self) -> Option<&StatsView> {
        self.stats.as_ref()
    }

    pub fn is_timed(&self) -> bool {
        matches!(self.session.engine().mode(), EngineMode::Timed { .. })
    }

    /// Screen and question index; a change means a fresh countdown second.
    pub fn position(&self) -> (Screen, usize) {
        (self.screen, self.session.engine().index())
    }

    fn option_count(&self) -> usize {
        self.session.engine().current_question().options.len()
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        self.selected_option = (self.selected_option + 1) % count;
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        self.selected_option = (self.selected_option + count - 1) % count;
    }

    /// Pick an option directly by its 1-based number.
    pub fn select_option(&mut self, number: usize) {
        if (1..=self.option_count()).contains(&number) {
            self.selected_option = number - 1;
        }
    }

    pub fn start_quiz(&mut self) {
        self.session.restart();
        self.screen = Screen::Quiz;
        self.status = None;
        self.sync_selection();
    }

    pub fn restart(&mut self) {
        self.result_scroll = 0;
        self.start_quiz();
    }

    pub fn submit_answer(&mut self) {
        let chosen = self.selected_option + 1;
        let correct = self.session.engine().current_question().is_correct(chosen);

        match self.session.answer(chosen) {
            Ok(step) => {
                self.status = Some(if correct {
                    StatusLine {
                        text: "Correct! Nice job.".into(),
                        tone: Tone::Good,
                    }
                } else {
                    StatusLine {
                        text: "Incorrect.".into(),
                        tone: Tone::Bad,
                    }
                });
                self.follow(step);
            }
            Err(e) => self.report(e),
        }
    }

    pub fn next_question(&mut self) {
        match self.session.advance() {
            Ok(step) => self.follow(step),
            Err(e) => self.report(e),
        }
    }

    pub fn previous_question(&mut self) {
        match self.session.back() {
            Ok(step) => self.follow(step),
            Err(e) => self.report(e),
        }
    }

    pub fn finish_quiz(&mut self) {
        match self.session.finish() {
            Ok(step) => self.follow(step),
            Err(e) => self.report(e),
        }
    }

    /// Called once per elapsed second.
    pub fn on_tick(&mut self) {
        if self.screen != Screen::Quiz {
            return;
        }
        match self.session.tick() {
            Ok(Some(step)) => {
                self.status = Some(StatusLine {
                    text: "Time up! Moving on…".into(),
                    tone: Tone::Bad,
                });
                self.follow(step);
            }
            Ok(None) => {}
            Err(e) => {
                // The quiz itself finished even if saving the result failed.
                self.report(e);
                if self.session.engine().status() == QuizStatus::Finished {
                    self.screen = Screen::Result;
                }
            }
        }
    }

    pub fn show_stats(&mut self) {
        let store = self.session.store();
        let loaded = StatsSummary::load(store).and_then(|summary| {
            let last_score = match self.session.username() {
                Some(user) => Some(stats::last_score(&stats::user_attempts(store, user)?)),
                None => None,
            };
            Ok(StatsView {
                summary,
                last_score,
            })
        });

        match loaded {
            Ok(view) => {
                self.stats = Some(view);
                self.screen = Screen::Stats;
            }
            Err(e) => self.report(e),
        }
    }

    pub fn close_stats(&mut self) {
        self.screen = Screen::Result;
    }

    pub fn export_quiz(&mut self) {
        match export::export_quiz(&self.session, &self.export_dir) {
            Ok(path) => {
                self.status = Some(StatusLine {
                    text: format!("Saved {}", path.display()),
                    tone: Tone::Info,
                });
            }
            Err(e) => self.report(e),
        }
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.session.engine().total_questions().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    fn follow(&mut self, step: Step) {
        match step {
            Step::Finished => {
                self.screen = Screen::Result;
                self.result_scroll = 0;
            }
            Step::Moved(_) => self.sync_selection(),
            Step::Stay => {}
        }
    }

    /// Put the cursor on the recorded answer, or the first option.
    fn sync_selection(&mut self) {
        let engine = self.session.engine();
        let question = engine.current_question();
        self.selected_option = engine
            .answer_for(&question.id)
            .and_then(|a| a.chosen())
            .map_or(0, |chosen| chosen - 1);
    }

    fn report<E: std::fmt::Display>(&mut self, error: E) {
        log::warn!("{error}");
        self.status = Some(StatusLine {
            text: error.to_string(),
            tone: Tone::Bad,
        });
    }
}
