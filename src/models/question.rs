use rand::Rng;

use crate::shuffle::shuffle;
use crate::text::decode_entities;

use super::Difficulty;

/// A multiple-choice question, decoded and ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    pub difficulty: Difficulty,
}

impl Question {
    /// Build a question from encoded source text, decoding HTML entities.
    ///
    /// Returns `None` when there is no incorrect answer to choose against.
    pub fn decoded(
        text: &str,
        correct_answer: &str,
        incorrect_answers: &[String],
        difficulty: Difficulty,
    ) -> Option<Self> {
        if incorrect_answers.is_empty() {
            return None;
        }

        Some(Self {
            text: decode_entities(text),
            correct_answer: decode_entities(correct_answer),
            incorrect_answers: incorrect_answers
                .iter()
                .map(|answer| decode_entities(answer))
                .collect(),
            difficulty,
        })
    }
}

/// A question together with the answer order shown to the player.
///
/// The order is drawn once on construction and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedQuestion {
    question: Question,
    shuffled_answers: Vec<String>,
}

impl PresentedQuestion {
    pub fn new<R: Rng + ?Sized>(question: Question, rng: &mut R) -> Self {
        let mut shuffled_answers = Vec::with_capacity(question.incorrect_answers.len() + 1);
        shuffled_answers.push(question.correct_answer.clone());
        shuffled_answers.extend(question.incorrect_answers.iter().cloned());
        shuffle(&mut shuffled_answers, rng);

        Self {
            question,
            shuffled_answers,
        }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn text(&self) -> &str {
        &self.question.text
    }

    pub fn correct_answer(&self) -> &str {
        &self.question.correct_answer
    }

    pub fn answers(&self) -> &[String] {
        &self.shuffled_answers
    }

    /// Text equality with the correct answer decides correctness.
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.question.correct_answer
    }
}

/// One answered question, appended to the session history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredRecord {
    pub question: String,
    pub correct_answer: String,
    pub chosen_answer: String,
}

impl AnsweredRecord {
    pub fn is_correct(&self) -> bool {
        self.chosen_answer == self.correct_answer
    }
}
