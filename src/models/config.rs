use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest `amount` the trivia API accepts in a single request.
pub const MAX_QUESTIONS: usize = 50;

/// Question counts offered on the selection screen.
pub const QUESTION_COUNTS: [usize; 4] = [5, 10, 15, 20];

/// A trivia category as known to the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: u32,
    pub name: &'static str,
}

/// Categories offered on the selection screen.
pub const CATEGORIES: [Category; 4] = [
    Category {
        id: 9,
        name: "General Knowledge",
    },
    Category {
        id: 21,
        name: "Sports",
    },
    Category {
        id: 23,
        name: "History",
    },
    Category {
        id: 17,
        name: "Science & Nature",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Value used in the `difficulty` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Lenient parse used for remote payloads; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("a quiz needs at least one question")]
    NoQuestions,
    #[error("at most {MAX_QUESTIONS} questions can be requested, got {0}")]
    TooManyQuestions(usize),
}

/// Parameters of one quiz run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    category: u32,
    difficulty: Difficulty,
    num_questions: usize,
}

impl QuizConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` when `num_questions` is zero or above [`MAX_QUESTIONS`].
    pub fn new(
        category: u32,
        difficulty: Difficulty,
        num_questions: usize,
    ) -> Result<Self, ConfigError> {
        if num_questions == 0 {
            return Err(ConfigError::NoQuestions);
        }
        if num_questions > MAX_QUESTIONS {
            return Err(ConfigError::TooManyQuestions(num_questions));
        }

        Ok(Self {
            category,
            difficulty,
            num_questions,
        })
    }

    pub fn category(&self) -> u32 {
        self.category
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn num_questions(&self) -> usize {
        self.num_questions
    }
}
