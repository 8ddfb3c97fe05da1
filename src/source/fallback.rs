use crate::models::{Difficulty, Question};

/// Questions served when the remote source cannot be used.
#[derive(Debug, Clone)]
pub struct FallbackPool {
    questions: Vec<Question>,
}

impl FallbackPool {
    /// Returns `None` for an empty list; a pool always has at least one question.
    pub fn new(questions: Vec<Question>) -> Option<Self> {
        if questions.is_empty() {
            None
        } else {
            Some(Self { questions })
        }
    }

    pub fn builtin() -> Self {
        let questions = BUILTIN
            .iter()
            .map(|(text, correct, incorrect, difficulty)| Question {
                text: (*text).to_string(),
                correct_answer: (*correct).to_string(),
                incorrect_answers: incorrect.iter().map(|a| (*a).to_string()).collect(),
                difficulty: *difficulty,
            })
            .collect();

        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Exactly `count` questions, cycling through the pool as often as needed.
    pub fn select(&self, count: usize) -> Vec<Question> {
        cycle_to(&self.questions, count)
    }
}

/// Repeat `items` in order until `count` elements are produced.
pub(crate) fn cycle_to<T: Clone>(items: &[T], count: usize) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }
    (0..count).map(|i| items[i % items.len()].clone()).collect()
}

type BuiltinQuestion = (&'static str, &'static str, [&'static str; 3], Difficulty);

const BUILTIN: [BuiltinQuestion; 10] = [
    (
        "What is the capital of Australia?",
        "Canberra",
        ["Sydney", "Melbourne", "Perth"],
        Difficulty::Easy,
    ),
    (
        "Which planet is known as the Red Planet?",
        "Mars",
        ["Venus", "Jupiter", "Mercury"],
        Difficulty::Easy,
    ),
    (
        "How many sides does a hexagon have?",
        "6",
        ["5", "7", "8"],
        Difficulty::Easy,
    ),
    (
        "Which element has the chemical symbol \"Fe\"?",
        "Iron",
        ["Lead", "Fluorine", "Tin"],
        Difficulty::Medium,
    ),
    (
        "In which year did the Berlin Wall fall?",
        "1989",
        ["1987", "1991", "1985"],
        Difficulty::Medium,
    ),
    (
        "Who painted the ceiling of the Sistine Chapel?",
        "Michelangelo",
        ["Raphael", "Leonardo da Vinci", "Donatello"],
        Difficulty::Medium,
    ),
    (
        "What is the largest ocean on Earth?",
        "Pacific Ocean",
        ["Atlantic Ocean", "Indian Ocean", "Arctic Ocean"],
        Difficulty::Easy,
    ),
    (
        "How many players are on the field for one team in a standard football (soccer) match?",
        "11",
        ["10", "9", "12"],
        Difficulty::Easy,
    ),
    (
        "Which gas makes up most of Earth's atmosphere?",
        "Nitrogen",
        ["Oxygen", "Carbon dioxide", "Argon"],
        Difficulty::Medium,
    ),
    (
        "Which empire was ruled by Mansa Musa?",
        "Mali Empire",
        ["Songhai Empire", "Ghana Empire", "Kanem Empire"],
        Difficulty::Hard,
    ),
];
