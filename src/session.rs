//! Quiz progression state machine.
//!
//! A [`QuizSession`] is started with a [`QuizConfig`], waits for questions,
//! then accepts exactly one answer per question until the last one has been
//! advanced past:
//!
//! ```text
//! Idle -> Loading -> Ready -> (submit) Ready[revealed] -> (advance) Ready[next] -> ... -> Complete
//! ```
//!
//! Fetching questions is asynchronous and may be overtaken by a newer
//! `start`. Every `start` bumps a generation counter; results delivered for
//! an older generation are dropped by [`QuizSession::resolve`].

use tracing::{debug, info};

use crate::models::{AnsweredRecord, PresentedQuestion, QuizConfig};
use crate::source::{Acquired, QuestionSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Not started, or reset.
    #[default]
    Idle,
    /// Waiting for questions.
    Loading,
    /// A question is on screen.
    Ready,
    /// No questions could be obtained.
    Error,
    /// Every question has been answered and advanced past.
    Complete,
}

/// Observable state of a session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub questions: Vec<PresentedQuestion>,
    pub current_index: usize,
    pub selected_answer: Option<String>,
    pub revealed: bool,
    pub score: usize,
    pub history: Vec<AnsweredRecord>,
    pub phase: Phase,
    /// Message attached to a degraded acquisition.
    pub notice: Option<String>,
}

/// Final result of a completed session.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizOutcome {
    pub config: QuizConfig,
    pub score: usize,
    pub total: usize,
    pub history: Vec<AnsweredRecord>,
    pub degraded: bool,
}

impl QuizOutcome {
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.score as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Default)]
pub struct QuizSession {
    generation: u64,
    config: Option<QuizConfig>,
    degraded: bool,
    state: SessionState,
    outcome: Option<QuizOutcome>,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all prior state and wait for questions for `config`.
    ///
    /// Returns the generation to pass back to [`QuizSession::resolve`].
    pub fn start(&mut self, config: QuizConfig) -> u64 {
        self.generation += 1;
        debug!(generation = self.generation, ?config, "session loading");

        self.config = Some(config);
        self.degraded = false;
        self.outcome = None;
        self.state = SessionState {
            phase: Phase::Loading,
            ..SessionState::default()
        };
        self.generation
    }

    /// Install questions acquired for `generation`.
    ///
    /// Returns false, leaving the session untouched, when `generation` is no
    /// longer current or the session is not loading.
    pub fn resolve(&mut self, generation: u64, acquired: Acquired) -> bool {
        if generation != self.generation || self.state.phase != Phase::Loading {
            debug!(
                generation,
                current = self.generation,
                "dropping stale question delivery"
            );
            return false;
        }

        self.degraded = acquired.degraded;
        self.state.notice = acquired.message;

        if acquired.questions.is_empty() {
            self.state.phase = Phase::Error;
            self.state
                .notice
                .get_or_insert_with(|| "No questions are available.".to_string());
            return true;
        }

        debug!(
            generation,
            count = acquired.questions.len(),
            degraded = acquired.degraded,
            "session ready"
        );
        self.state.questions = acquired.questions;
        self.state.current_index = 0;
        self.state.selected_answer = None;
        self.state.revealed = false;
        self.state.phase = Phase::Ready;
        true
    }

    /// Start and wait for `source` in one step.
    pub async fn load(&mut self, source: &QuestionSource, config: QuizConfig) -> Phase {
        let generation = self.start(config.clone());
        let acquired = source.acquire(&config).await;
        self.resolve(generation, acquired);
        self.state.phase
    }

    /// Answer the current question. Ignored unless a question is showing and
    /// has not been answered yet.
    pub fn submit_answer(&mut self, answer: &str) {
        if self.state.phase != Phase::Ready || self.state.revealed {
            return;
        }
        let Some(question) = self.state.questions.get(self.state.current_index) else {
            return;
        };

        let correct = question.is_correct(answer);
        self.state.history.push(AnsweredRecord {
            question: question.text().to_string(),
            correct_answer: question.correct_answer().to_string(),
            chosen_answer: answer.to_string(),
        });
        if correct {
            self.state.score += 1;
        }
        self.state.selected_answer = Some(answer.to_string());
        self.state.revealed = true;
    }

    /// Move past the revealed question.
    ///
    /// Returns the outcome when this completes the session.
    pub fn advance(&mut self) -> Option<QuizOutcome> {
        if self.state.phase != Phase::Ready || !self.state.revealed {
            return None;
        }

        self.state.selected_answer = None;
        self.state.revealed = false;

        if self.state.current_index + 1 < self.state.questions.len() {
            self.state.current_index += 1;
            return None;
        }

        self.state.current_index = self.state.questions.len();
        self.state.phase = Phase::Complete;

        let config = self.config.clone()?;
        let outcome = QuizOutcome {
            config,
            score: self.state.score,
            total: self.state.questions.len(),
            history: self.state.history.clone(),
            degraded: self.degraded,
        };
        info!(
            score = outcome.score,
            total = outcome.total,
            "quiz complete"
        );
        self.outcome = Some(outcome.clone());
        Some(outcome)
    }

    /// Abandon the current run. A pending delivery is dropped when it lands.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.config = None;
        self.degraded = false;
        self.outcome = None;
        self.state = SessionState::default();
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn config(&self) -> Option<&QuizConfig> {
        self.config.as_ref()
    }

    /// The question on screen, if any.
    pub fn current_question(&self) -> Option<&PresentedQuestion> {
        if self.state.phase != Phase::Ready {
            return None;
        }
        self.state.questions.get(self.state.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn total_questions(&self) -> usize {
        self.state.questions.len()
    }

    pub fn selected_answer(&self) -> Option<&str> {
        self.state.selected_answer.as_deref()
    }

    pub fn is_revealed(&self) -> bool {
        self.state.revealed
    }

    pub fn score(&self) -> usize {
        self.state.score
    }

    pub fn history(&self) -> &[AnsweredRecord] {
        &self.state.history
    }

    pub fn notice(&self) -> Option<&str> {
        self.state.notice.as_deref()
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::models::{Difficulty, Question};

    fn config(num_questions: usize) -> QuizConfig {
        QuizConfig::new(9, Difficulty::Medium, num_questions).unwrap()
    }

    fn acquired(prefix: &str, count: usize) -> Acquired {
        let mut rng = StdRng::seed_from_u64(11);
        let questions = (0..count)
            .map(|i| {
                let question = Question {
                    text: format!("{prefix} question {i}"),
                    correct_answer: format!("right {i}"),
                    incorrect_answers: vec![format!("wrong {i}"), format!("other {i}")],
                    difficulty: Difficulty::Medium,
                };
                PresentedQuestion::new(question, &mut rng)
            })
            .collect();

        Acquired {
            questions,
            degraded: false,
            message: None,
        }
    }

    fn ready_session(count: usize) -> QuizSession {
        let mut session = QuizSession::new();
        let generation = session.start(config(count));
        assert!(session.resolve(generation, acquired("A", count)));
        session
    }

    #[test]
    fn test_two_question_run() {
        let mut session = ready_session(2);
        assert_eq!(session.phase(), Phase::Ready);

        let correct = session.current_question().unwrap().correct_answer().to_string();
        session.submit_answer(&correct);
        assert!(session.advance().is_none());

        session.submit_answer("wrong 1");
        let outcome = session.advance().expect("session completes");

        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.history.len(), 2);
        assert!(outcome.history[0].is_correct());
        assert!(!outcome.history[1].is_correct());
        assert_eq!(session.phase(), Phase::Complete);
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.outcome(), Some(&outcome));
    }

    #[test]
    fn test_double_submit_is_ignored() {
        let mut session = ready_session(3);

        session.submit_answer("wrong 0");
        session.submit_answer("right 0");

        assert_eq!(session.score(), 0);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.selected_answer(), Some("wrong 0"));
    }

    #[test]
    fn test_advance_requires_reveal() {
        let mut session = ready_session(3);

        assert!(session.advance().is_none());
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.phase(), Phase::Ready);

        session.submit_answer("right 0");
        session.advance();
        assert_eq!(session.current_index(), 1);
        assert!(!session.is_revealed());
        assert_eq!(session.selected_answer(), None);
        assert!(session.advance().is_none());
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_answers_ignored_while_loading() {
        let mut session = QuizSession::new();
        session.submit_answer("anything");
        assert_eq!(session.phase(), Phase::Idle);

        session.start(config(2));
        session.submit_answer("anything");
        assert!(session.advance().is_none());
        assert!(session.history().is_empty());
        assert!(session.current_question().is_none());
    }

    #[test]
    fn test_history_tracks_index() {
        let mut session = ready_session(5);

        for i in 0..5 {
            assert_eq!(session.history().len(), session.current_index());
            let answer = if i % 2 == 0 {
                format!("right {i}")
            } else {
                format!("wrong {i}")
            };
            session.submit_answer(&answer);
            assert_eq!(session.history().len(), session.current_index() + 1);
            assert!(session.score() <= session.history().len());
            session.advance();
        }

        assert_eq!(session.phase(), Phase::Complete);
        assert_eq!(session.history().len(), session.current_index());
        let correct = session.history().iter().filter(|r| r.is_correct()).count();
        assert_eq!(session.score(), correct);
        assert_eq!(session.score(), 3);
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut session = ready_session(1);
        session.submit_answer("right 0");
        assert!(session.advance().is_some());

        session.submit_answer("right 0");
        assert!(session.advance().is_none());
        assert_eq!(session.score(), 1);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.phase(), Phase::Complete);
    }

    #[test]
    fn test_stale_delivery_is_dropped() {
        let mut session = QuizSession::new();
        let first = session.start(config(2));
        let second = session.start(QuizConfig::new(21, Difficulty::Hard, 3).unwrap());

        assert!(session.resolve(second, acquired("B", 3)));
        assert!(!session.resolve(first, acquired("A", 2)));

        assert_eq!(session.total_questions(), 3);
        assert_eq!(session.config().unwrap().category(), 21);
        assert!(
            session
                .current_question()
                .unwrap()
                .text()
                .starts_with("B question")
        );
    }

    #[test]
    fn test_stale_delivery_before_current_one() {
        let mut session = QuizSession::new();
        let first = session.start(config(2));
        let second = session.start(config(4));

        assert!(!session.resolve(first, acquired("A", 2)));
        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.resolve(second, acquired("B", 4)));
        assert_eq!(session.total_questions(), 4);
    }

    #[test]
    fn test_restart_discards_progress() {
        let mut session = ready_session(2);
        session.submit_answer("right 0");
        session.advance();

        let generation = session.start(config(2));
        assert_eq!(session.phase(), Phase::Loading);
        assert_eq!(session.score(), 0);
        assert!(session.history().is_empty());

        session.resolve(generation, acquired("C", 2));
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_reset_drops_pending_delivery() {
        let mut session = QuizSession::new();
        let generation = session.start(config(2));
        session.reset();

        assert!(!session.resolve(generation, acquired("A", 2)));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.config().is_none());
    }

    #[test]
    fn test_empty_delivery_is_an_error() {
        let mut session = QuizSession::new();
        let generation = session.start(config(2));

        assert!(session.resolve(generation, acquired("A", 0)));
        assert_eq!(session.phase(), Phase::Error);
        assert!(session.notice().is_some());
        session.submit_answer("anything");
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_degraded_notice_is_kept() {
        let mut session = QuizSession::new();
        let generation = session.start(config(1));
        let mut delivery = acquired("A", 1);
        delivery.degraded = true;
        delivery.message = Some("offline".to_string());

        session.resolve(generation, delivery);
        assert_eq!(session.notice(), Some("offline"));

        session.submit_answer("right 0");
        let outcome = session.advance().unwrap();
        assert!(outcome.degraded);
        assert_eq!(outcome.percentage(), 100.0);
    }
}
