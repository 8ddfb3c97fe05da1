mod config;
mod question;

pub use config::{
    CATEGORIES, Category, ConfigError, Difficulty, MAX_QUESTIONS, QUESTION_COUNTS, QuizConfig,
};
pub use question::{AnsweredRecord, PresentedQuestion, Question};

/// Which screen the terminal front end is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Selection,
    Quiz,
    Result,
}
