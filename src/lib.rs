//! # trivia-quiz
//!
//! A terminal trivia quiz backed by the Open Trivia DB.
//!
//! The engine has two halves. [`QuestionSource`] turns a [`QuizConfig`] into
//! exactly that many questions, dealing with session tokens, retries and an
//! offline fallback pool. [`QuizSession`] walks the player through them one
//! answer at a time and produces a [`QuizOutcome`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use trivia_quiz::{ApiConfig, App, InMemoryTokenCache, OpenTdbClient, QuestionSource, Quiz, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let client = OpenTdbClient::new(&ApiConfig::default())?;
//!     let source = QuestionSource::new(Arc::new(client), Arc::new(InMemoryTokenCache::new()));
//!
//!     // Run the quiz in the terminal
//!     Quiz::new(App::new(), source).run().await?;
//!
//!     Ok(())
//! }
//! ```

mod app;
pub mod config;
mod data;
mod models;
pub mod session;
pub mod shuffle;
pub mod source;
pub mod terminal;
pub mod text;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

pub use app::{App, SelectionField};
pub use config::ApiConfig;
pub use data::{LoadError, load_pool_from_json, parse_pool};
pub use models::{
    AnsweredRecord, AppState, CATEGORIES, Category, ConfigError, Difficulty, MAX_QUESTIONS,
    PresentedQuestion, QUESTION_COUNTS, Question, QuizConfig,
};
pub use session::{Phase, QuizOutcome, QuizSession};
pub use source::{
    Acquired, FallbackPool, InMemoryTokenCache, OpenTdbClient, QuestionSource, TokenCache,
    TriviaApi,
};

/// How long the event loop waits for a key before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Error type for quiz operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to set up HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Questions delivered for a session generation.
type Delivery = (u64, Acquired);

/// A quiz that can be run in the terminal.
pub struct Quiz {
    app: App,
    source: QuestionSource,
}

impl Quiz {
    pub fn new(app: App, source: QuestionSource) -> Self {
        Self { app, source }
    }

    /// Run the quiz in the terminal.
    ///
    /// Takes over the terminal, shows the selection screen and returns when
    /// the user quits. Question fetches run as background tasks so the
    /// screen stays responsive while loading.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::TerminalGuard::enter()?;
        let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();

        loop {
            while let Ok((generation, acquired)) = rx.try_recv() {
                self.app.resolve(generation, acquired);
            }
            self.app.tick(Instant::now());

            term.draw(|frame| ui::render(frame, &self.app))?;

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match handle_input(&mut self.app, key.code) {
                Command::Quit => break,
                Command::Load(generation, config) => {
                    spawn_acquire(self.source.clone(), tx.clone(), generation, config);
                }
                Command::None => {}
            }
        }

        Ok(())
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

fn spawn_acquire(
    source: QuestionSource,
    tx: mpsc::UnboundedSender<Delivery>,
    generation: u64,
    config: QuizConfig,
) {
    tokio::spawn(async move {
        let acquired = source.acquire(&config).await;
        if tx.send((generation, acquired)).is_err() {
            debug!(generation, "quiz closed before questions arrived");
        }
    });
}

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq)]
enum Command {
    None,
    Quit,
    Load(u64, QuizConfig),
}

fn handle_input(app: &mut App, key: KeyCode) -> Command {
    match app.state {
        AppState::Selection => handle_selection_input(app, key),
        AppState::Quiz => handle_quiz_input(app, key),
        AppState::Result => handle_result_input(app, key),
    }
}

fn handle_selection_input(app: &mut App, key: KeyCode) -> Command {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.focus_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.focus_next(),
        KeyCode::Left | KeyCode::Char('h') => app.cycle_previous(),
        KeyCode::Right | KeyCode::Char('l') => app.cycle_next(),
        KeyCode::Enter => {
            return match app.start_quiz() {
                Some((generation, config)) => Command::Load(generation, config),
                None => Command::None,
            };
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Command::Quit,
        _ => {}
    }
    Command::None
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> Command {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.submit_answer(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.abandon(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Command::Quit,
        _ => {}
    }
    Command::None
}

fn handle_result_input(app: &mut App, key: KeyCode) -> Command {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Command::Quit,
        _ => {}
    }
    Command::None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_on_selection_requests_questions() {
        let mut app = App::new();
        handle_input(&mut app, KeyCode::Right);
        handle_input(&mut app, KeyCode::Down);
        handle_input(&mut app, KeyCode::Left);

        let Command::Load(generation, config) = handle_input(&mut app, KeyCode::Enter) else {
            panic!("expected a load command");
        };
        assert_eq!(generation, app.session().generation());
        assert_eq!(config.category(), 21);
        assert_eq!(config.difficulty(), Difficulty::Easy);
        assert_eq!(app.state, AppState::Quiz);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new();
        assert_eq!(handle_input(&mut app, KeyCode::Char('q')), Command::Quit);

        app.start_quiz();
        assert_eq!(handle_input(&mut app, KeyCode::Esc), Command::None);
        assert_eq!(app.state, AppState::Selection);
    }
}
