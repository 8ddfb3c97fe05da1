//! Remote trivia API: the trait the question source talks to, the wire
//! types, and the Open Trivia DB client.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::models::{Difficulty, Question, QuizConfig};

use super::error::SourceError;

/// `response_code` values of the trivia API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Success,
    NoResults,
    InvalidParameter,
    TokenNotFound,
    TokenEmpty,
    RateLimit,
    Unknown(u8),
}

impl From<u8> for ResponseCode {
    fn from(code: u8) -> Self {
        match code {
            0 => ResponseCode::Success,
            1 => ResponseCode::NoResults,
            2 => ResponseCode::InvalidParameter,
            3 => ResponseCode::TokenNotFound,
            4 => ResponseCode::TokenEmpty,
            5 => ResponseCode::RateLimit,
            other => ResponseCode::Unknown(other),
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Success => f.write_str("success"),
            ResponseCode::NoResults => f.write_str("not enough questions for this query"),
            ResponseCode::InvalidParameter => f.write_str("invalid parameter"),
            ResponseCode::TokenNotFound => f.write_str("session token not found"),
            ResponseCode::TokenEmpty => f.write_str("session token exhausted"),
            ResponseCode::RateLimit => f.write_str("rate limited"),
            ResponseCode::Unknown(code) => write!(f, "unknown response code {code}"),
        }
    }
}

/// A question record as the trivia API (and fallback pool files) encode it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestion {
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl RawQuestion {
    /// Decode into a [`Question`]; `None` if the record has no incorrect answers.
    pub fn to_question(&self, default_difficulty: Difficulty) -> Option<Question> {
        let difficulty = self
            .difficulty
            .as_deref()
            .and_then(Difficulty::parse)
            .unwrap_or(default_difficulty);

        Question::decoded(
            &self.question,
            &self.correct_answer,
            &self.incorrect_answers,
            difficulty,
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionsResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<RawQuestion>,
}

impl QuestionsResponse {
    pub(crate) fn into_results(self) -> Result<Vec<RawQuestion>, SourceError> {
        match ResponseCode::from(self.response_code) {
            ResponseCode::Success if self.results.is_empty() => Err(SourceError::Empty),
            ResponseCode::Success => Ok(self.results),
            code => Err(SourceError::Response(code)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    response_code: u8,
    #[serde(default)]
    token: Option<String>,
}

impl TokenResponse {
    pub(crate) fn into_token(self) -> Result<String, SourceError> {
        match ResponseCode::from(self.response_code) {
            ResponseCode::Success => self
                .token
                .filter(|token| !token.is_empty())
                .ok_or(SourceError::MissingToken),
            code => Err(SourceError::Response(code)),
        }
    }
}

/// The two read-only endpoints of a trivia source.
#[async_trait]
pub trait TriviaApi: Send + Sync {
    /// Key under which this source's session token is cached.
    fn cache_key(&self) -> &str;

    /// Ask the source for a new session token.
    async fn request_token(&self) -> Result<String, SourceError>;

    /// Fetch multiple-choice questions for `config`.
    ///
    /// Any response code other than success is an error.
    async fn fetch_questions(
        &self,
        config: &QuizConfig,
        token: Option<&str>,
    ) -> Result<Vec<RawQuestion>, SourceError>;
}

/// HTTP client for the Open Trivia DB API.
#[derive(Clone)]
pub struct OpenTdbClient {
    client: Client,
    base_url: String,
}

impl OpenTdbClient {
    /// # Errors
    ///
    /// Returns the reqwest error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.get(url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| SourceError::Malformed(err.to_string()))
    }
}

#[async_trait]
impl TriviaApi for OpenTdbClient {
    fn cache_key(&self) -> &str {
        &self.base_url
    }

    async fn request_token(&self) -> Result<String, SourceError> {
        let response: TokenResponse = self
            .get_json("api_token.php", &[("command", "request".to_string())])
            .await?;
        response.into_token()
    }

    async fn fetch_questions(
        &self,
        config: &QuizConfig,
        token: Option<&str>,
    ) -> Result<Vec<RawQuestion>, SourceError> {
        let mut query = vec![
            ("amount", config.num_questions().to_string()),
            ("category", config.category().to_string()),
            ("difficulty", config.difficulty().as_str().to_string()),
            ("type", "multiple".to_string()),
        ];
        if let Some(token) = token {
            query.push(("token", token.to_string()));
        }

        let response: QuestionsResponse = self.get_json("api.php", &query).await?;
        response.into_results()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::source::{ErrorKind, InMemoryTokenCache, QuestionSource, TokenCache};

    const ONE_QUESTION: &str = r#"{"response_code": 0, "results": [{
        "difficulty": "hard",
        "question": "Capital of Tr&oslash;ndelag?",
        "correct_answer": "Trondheim",
        "incorrect_answers": ["Bergen", "Oslo", "Bod&oslash;"]
    }]}"#;

    /// Answer one HTTP request per canned `(status, body)` pair and hand back
    /// the request lines in arrival order.
    async fn serve(
        responses: Vec<(&'static str, &'static str)>,
    ) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut request_lines = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let request = String::from_utf8_lossy(&request);
                request_lines.push(request.lines().next().unwrap_or_default().to_string());

                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                let _ = stream.shutdown().await;
            }
            request_lines
        });

        (format!("http://{addr}"), handle)
    }

    fn client(base_url: &str) -> OpenTdbClient {
        OpenTdbClient::new(&ApiConfig::new(base_url)).unwrap()
    }

    fn quiz_config() -> QuizConfig {
        QuizConfig::new(22, Difficulty::Hard, 5).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_query_and_token() {
        let (url, server) = serve(vec![("200 OK", ONE_QUESTION)]).await;

        let results = client(&url)
            .fetch_questions(&quiz_config(), Some("abc123"))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].correct_answer, "Trondheim");

        let lines = server.await.unwrap();
        let line = &lines[0];
        assert!(line.starts_with("GET /api.php?"), "{line}");
        let params = [
            "amount=5",
            "category=22",
            "difficulty=hard",
            "type=multiple",
            "token=abc123",
        ];
        for param in params {
            assert!(line.contains(param), "{param} missing from {line}");
        }
    }

    #[tokio::test]
    async fn test_fetch_without_token_omits_parameter() {
        let (url, server) = serve(vec![("200 OK", ONE_QUESTION)]).await;

        client(&url).fetch_questions(&quiz_config(), None).await.unwrap();

        let lines = server.await.unwrap();
        assert!(lines[0].contains("type=multiple"));
        assert!(!lines[0].contains("token="), "{}", lines[0]);
    }

    #[tokio::test]
    async fn test_request_token_endpoint() {
        let (url, server) = serve(vec![(
            "200 OK",
            r#"{"response_code": 0, "response_message": "Token Generated Successfully!", "token": "fresh"}"#,
        )])
        .await;

        assert_eq!(client(&url).request_token().await.unwrap(), "fresh");

        let lines = server.await.unwrap();
        assert!(lines[0].starts_with("GET /api_token.php?command=request "), "{}", lines[0]);
    }

    #[tokio::test]
    async fn test_error_status_is_not_retryable() {
        let (url, _server) = serve(vec![("503 Service Unavailable", "")]).await;

        let err = client(&url)
            .fetch_questions(&quiz_config(), None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SourceError::HttpStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE)
        ));
        assert!(!err.is_retryable());
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn test_garbage_body_is_malformed() {
        let (url, _server) = serve(vec![("200 OK", "<html>maintenance</html>")]).await;

        let err = client(&url)
            .fetch_questions(&quiz_config(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, SourceError::Malformed(_)));
        assert!(!err.is_retryable());
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[tokio::test]
    async fn test_response_code_over_http_is_retryable() {
        let (url, _server) =
            serve(vec![("200 OK", r#"{"response_code": 4, "results": []}"#)]).await;

        let err = client(&url)
            .fetch_questions(&quiz_config(), Some("spent"))
            .await
            .unwrap_err();

        assert!(matches!(err, SourceError::Response(ResponseCode::TokenEmpty)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_error_status_goes_straight_to_fallback() {
        let (url, server) = serve(vec![
            ("200 OK", r#"{"response_code": 0, "token": "tok"}"#),
            ("503 Service Unavailable", ""),
        ])
        .await;
        let api = client(&url);
        let key = api.cache_key().to_string();
        let cache = InMemoryTokenCache::new();
        let source = QuestionSource::new(Arc::new(api), Arc::new(cache.clone()));

        let acquired = source.acquire(&quiz_config()).await;

        assert!(acquired.degraded);
        assert_eq!(acquired.questions.len(), 5);
        let lines = server.await.unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("token=tok"));
        assert_eq!(cache.get(&key).as_deref(), Some("tok"));
    }

    #[test]
    fn test_parse_questions_response() {
        let body = r#"{
            "response_code": 0,
            "results": [{
                "type": "multiple",
                "difficulty": "medium",
                "category": "General Knowledge",
                "question": "Which of these is &quot;Ceylon&quot;?",
                "correct_answer": "Sri Lanka",
                "incorrect_answers": ["India", "Nepal", "Bhutan"]
            }]
        }"#;
        let response: QuestionsResponse = serde_json::from_str(body).unwrap();
        let results = response.into_results().unwrap();
        assert_eq!(results.len(), 1);

        let question = results[0].to_question(Difficulty::Easy).unwrap();
        assert_eq!(question.text, "Which of these is \"Ceylon\"?");
        assert_eq!(question.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_non_success_codes() {
        let exhausted: QuestionsResponse =
            serde_json::from_str(r#"{"response_code": 4, "results": []}"#).unwrap();
        assert!(matches!(
            exhausted.into_results(),
            Err(SourceError::Response(ResponseCode::TokenEmpty))
        ));

        let empty: QuestionsResponse = serde_json::from_str(r#"{"response_code": 0}"#).unwrap();
        assert!(matches!(empty.into_results(), Err(SourceError::Empty)));

        assert_eq!(ResponseCode::from(9), ResponseCode::Unknown(9));
    }

    #[test]
    fn test_parse_token_response() {
        let ok: TokenResponse = serde_json::from_str(
            r#"{"response_code": 0, "response_message": "Token Generated Successfully!", "token": "abc123"}"#,
        )
        .unwrap();
        assert_eq!(ok.into_token().unwrap(), "abc123");

        let missing: TokenResponse = serde_json::from_str(r#"{"response_code": 0}"#).unwrap();
        assert!(matches!(missing.into_token(), Err(SourceError::MissingToken)));
    }
}
