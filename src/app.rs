use std::time::{Duration, Instant};

use crate::models::{AppState, CATEGORIES, Category, Difficulty, QUESTION_COUNTS, QuizConfig};
use crate::session::{Phase, QuizOutcome, QuizSession};
use crate::source::Acquired;

/// Field focused on the selection screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionField {
    Category,
    Difficulty,
    Count,
}

impl SelectionField {
    const ORDER: [SelectionField; 3] = [
        SelectionField::Category,
        SelectionField::Difficulty,
        SelectionField::Count,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Front-end state: the selection cursor, the running session and the
/// cursors of the quiz and result screens.
pub struct App {
    pub state: AppState,
    session: QuizSession,
    focus: SelectionField,
    category_index: usize,
    difficulty_index: usize,
    counts: Vec<usize>,
    count_index: usize,
    selected_option: usize,
    result_scroll: usize,
    reveal_delay: Option<Duration>,
    revealed_at: Option<Instant>,
}

impl App {
    pub fn new() -> Self {
        Self {
            state: AppState::Selection,
            session: QuizSession::new(),
            focus: SelectionField::Category,
            category_index: 0,
            difficulty_index: 1,
            counts: QUESTION_COUNTS.to_vec(),
            count_index: 1,
            selected_option: 0,
            result_scroll: 0,
            reveal_delay: None,
            revealed_at: None,
        }
    }

    /// Auto-advance answered questions after `delay`; `None` waits for input.
    #[must_use]
    pub fn with_reveal_delay(mut self, delay: Option<Duration>) -> Self {
        self.reveal_delay = delay.filter(|d| !d.is_zero());
        self
    }

    /// Preselect values on the selection screen. Unknown categories are ignored;
    /// a count outside the offered list is added to it.
    #[must_use]
    pub fn with_preset(
        mut self,
        category: Option<u32>,
        difficulty: Option<Difficulty>,
        count: Option<usize>,
    ) -> Self {
        if let Some(index) = category.and_then(|id| CATEGORIES.iter().position(|c| c.id == id)) {
            self.category_index = index;
        }
        if let Some(index) = difficulty.and_then(|d| Difficulty::ALL.iter().position(|x| *x == d)) {
            self.difficulty_index = index;
        }
        if let Some(count) = count {
            if !self.counts.contains(&count) {
                self.counts.push(count);
                self.counts.sort_unstable();
            }
            self.count_index = self.counts.iter().position(|c| *c == count).unwrap_or(0);
        }
        self
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.session.outcome()
    }

    // Selection screen

    pub fn focus(&self) -> SelectionField {
        self.focus
    }

    pub fn selected_category(&self) -> Category {
        CATEGORIES[self.category_index]
    }

    pub fn selected_difficulty(&self) -> Difficulty {
        Difficulty::ALL[self.difficulty_index]
    }

    pub fn selected_count(&self) -> usize {
        self.counts[self.count_index]
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn focus_next(&mut self) {
        let order = SelectionField::ORDER;
        self.focus = order[(self.focus.position() + 1) % order.len()];
    }

    pub fn focus_previous(&mut self) {
        let order = SelectionField::ORDER;
        self.focus = order[(self.focus.position() + order.len() - 1) % order.len()];
    }

    pub fn cycle_next(&mut self) {
        self.cycle(1);
    }

    pub fn cycle_previous(&mut self) {
        self.cycle(-1);
    }

    fn cycle(&mut self, step: isize) {
        let (index, len) = match self.focus {
            SelectionField::Category => (&mut self.category_index, CATEGORIES.len()),
            SelectionField::Difficulty => (&mut self.difficulty_index, Difficulty::ALL.len()),
            SelectionField::Count => (&mut self.count_index, self.counts.len()),
        };
        *index = (*index as isize + step).rem_euclid(len as isize) as usize;
    }

    /// Leave the selection screen and start loading. Returns the generation
    /// and config the caller must acquire questions for.
    pub fn start_quiz(&mut self) -> Option<(u64, QuizConfig)> {
        let config = QuizConfig::new(
            self.selected_category().id,
            self.selected_difficulty(),
            self.selected_count(),
        )
        .ok()?;

        let generation = self.session.start(config.clone());
        self.state = AppState::Quiz;
        self.selected_option = 0;
        self.revealed_at = None;
        Some((generation, config))
    }

    pub fn resolve(&mut self, generation: u64, acquired: Acquired) {
        if self.session.resolve(generation, acquired) {
            self.selected_option = 0;
        }
    }

    // Quiz screen

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    fn option_count(&self) -> usize {
        self.session
            .current_question()
            .map_or(0, |question| question.answers().len())
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count == 0 || self.session.is_revealed() {
            return;
        }
        self.selected_option = (self.selected_option + 1) % count;
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count == 0 || self.session.is_revealed() {
            return;
        }
        self.selected_option = (self.selected_option + count - 1) % count;
    }

    /// Answer with the highlighted option, or move on if already answered.
    pub fn submit_answer(&mut self) {
        self.submit_answer_at(Instant::now());
    }

    fn submit_answer_at(&mut self, now: Instant) {
        if self.session.is_revealed() {
            self.advance_question();
            return;
        }

        let Some(answer) = self
            .session
            .current_question()
            .and_then(|question| question.answers().get(self.selected_option))
            .cloned()
        else {
            return;
        };

        self.session.submit_answer(&answer);
        self.revealed_at = Some(now);
    }

    pub fn advance_question(&mut self) {
        let finished = self.session.advance();
        self.revealed_at = None;
        self.selected_option = 0;

        if finished.is_some() {
            self.state = AppState::Result;
            self.result_scroll = 0;
        }
    }

    /// Called every loop iteration; handles the timed advance.
    pub fn tick(&mut self, now: Instant) {
        let (Some(delay), Some(revealed_at)) = (self.reveal_delay, self.revealed_at) else {
            return;
        };
        if self.session.phase() == Phase::Ready && now.duration_since(revealed_at) >= delay {
            self.advance_question();
        }
    }

    /// Drop the current run and return to the selection screen.
    pub fn abandon(&mut self) {
        self.session.reset();
        self.state = AppState::Selection;
        self.selected_option = 0;
        self.revealed_at = None;
    }

    // Result screen

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn scroll_results_down(&mut self) {
        let max = self.session.history().len().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    pub fn restart(&mut self) {
        self.abandon();
        self.result_scroll = 0;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
