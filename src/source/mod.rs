//! Question acquisition.
//!
//! [`QuestionSource::acquire`] hides the trivia API's session-token protocol,
//! its transient failures and its exhaustion behavior behind one call that
//! always yields exactly the requested number of questions. When the remote
//! source cannot deliver, questions come from a [`FallbackPool`] and the
//! result is flagged as degraded.

mod api;
mod error;
mod fallback;
mod token;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::models::{Difficulty, PresentedQuestion, Question, QuizConfig};

pub use api::{OpenTdbClient, RawQuestion, ResponseCode, TriviaApi};
pub use error::{ErrorKind, SourceError};
pub use fallback::FallbackPool;
pub use token::{InMemoryTokenCache, TokenCache};

use fallback::cycle_to;

/// Questions for one quiz run.
#[derive(Debug, Clone)]
pub struct Acquired {
    pub questions: Vec<PresentedQuestion>,
    /// True when the questions did not fully come from the remote source.
    pub degraded: bool,
    /// Human-readable reason for a degraded result.
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct QuestionSource {
    api: Arc<dyn TriviaApi>,
    tokens: Arc<dyn TokenCache>,
    fallback: Arc<FallbackPool>,
    retry_delay: Duration,
}

impl QuestionSource {
    pub fn new(api: Arc<dyn TriviaApi>, tokens: Arc<dyn TokenCache>) -> Self {
        Self {
            api,
            tokens,
            fallback: Arc::new(FallbackPool::builtin()),
            retry_delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, pool: FallbackPool) -> Self {
        self.fallback = Arc::new(pool);
        self
    }

    /// Wait this long before retrying a refused fetch.
    #[must_use]
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Resolve questions for `config`.
    ///
    /// A non-success answer from the source drops the cached token and is
    /// retried once with a fresh one. Everything else that goes wrong ends in
    /// the fallback pool. Never fails.
    pub async fn acquire(&self, config: &QuizConfig) -> Acquired {
        let mut retried = false;

        loop {
            let token = self.session_token().await;

            let error = match self.api.fetch_questions(config, token.as_deref()).await {
                Ok(raw) => match decode_batch(&raw, config.difficulty()) {
                    Ok(questions) => return self.remote_result(config, questions),
                    Err(err) => err,
                },
                Err(err) => err,
            };

            if error.is_retryable() && !retried {
                warn!(%error, "trivia source refused the request, retrying with a new token");
                self.tokens.invalidate(self.api.cache_key());
                retried = true;
                if !self.retry_delay.is_zero() {
                    tokio::time::sleep(self.retry_delay).await;
                }
                continue;
            }

            return self.fallback_result(config, &error);
        }
    }

    /// Cached token, or a freshly requested one. `None` if issuance fails.
    async fn session_token(&self) -> Option<String> {
        let key = self.api.cache_key();
        if let Some(token) = self.tokens.get(key) {
            return Some(token);
        }

        match self.api.request_token().await {
            Ok(token) => {
                debug!("obtained new session token");
                self.tokens.store(key, token.clone());
                Some(token)
            }
            Err(error) => {
                warn!(%error, kind = ?error.kind(), "no session token, fetching without one");
                None
            }
        }
    }

    fn remote_result(&self, config: &QuizConfig, mut questions: Vec<Question>) -> Acquired {
        let wanted = config.num_questions();
        let received = questions.len();

        if received >= wanted {
            questions.truncate(wanted);
            info!(count = wanted, "questions fetched from trivia source");
            return Acquired {
                questions: present(questions),
                degraded: false,
                message: None,
            };
        }

        warn!(received, wanted, "short batch from trivia source, repeating questions");
        Acquired {
            questions: present(cycle_to(&questions, wanted)),
            degraded: true,
            message: Some(format!(
                "Only {received} of {wanted} questions were available, so some repeat."
            )),
        }
    }

    fn fallback_result(&self, config: &QuizConfig, error: &SourceError) -> Acquired {
        warn!(%error, kind = ?error.kind(), "using fallback questions");

        Acquired {
            questions: present(self.fallback.select(config.num_questions())),
            degraded: true,
            message: Some(format!(
                "Trivia source unavailable ({error}). Showing offline questions."
            )),
        }
    }
}

fn decode_batch(raw: &[RawQuestion], difficulty: Difficulty) -> Result<Vec<Question>, SourceError> {
    if raw.is_empty() {
        return Err(SourceError::Empty);
    }

    raw.iter()
        .map(|item| {
            item.to_question(difficulty).ok_or_else(|| {
                SourceError::Malformed(format!("question without incorrect answers: {}", item.question))
            })
        })
        .collect()
}

fn present(questions: Vec<Question>) -> Vec<PresentedQuestion> {
    let mut rng = rand::rng();
    questions
        .into_iter()
        .map(|question| PresentedQuestion::new(question, &mut rng))
        .collect()
}
