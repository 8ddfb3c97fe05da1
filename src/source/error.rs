use thiserror::Error;

use super::api::ResponseCode;

/// Coarse classification of remote failures, used in logs and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Token issuance or validation failed.
    Token,
    /// Network failure, non-success status or empty result.
    Unavailable,
    /// The payload did not have the expected shape.
    Protocol,
}

/// Errors raised while talking to the trivia source.
///
/// None of these reach the quiz session: `QuestionSource` turns every one of
/// them into a retry or a fallback.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("trivia request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("trivia source returned HTTP status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("trivia source answered: {0}")]
    Response(ResponseCode),
    #[error("trivia source returned no questions")]
    Empty,
    #[error("token response carried no token")]
    MissingToken,
    #[error("malformed trivia payload: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Whether a fresh token and a second attempt could plausibly help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SourceError::Response(_) | SourceError::Empty)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SourceError::Response(ResponseCode::TokenNotFound | ResponseCode::TokenEmpty)
            | SourceError::MissingToken => ErrorKind::Token,
            SourceError::Malformed(_) => ErrorKind::Protocol,
            SourceError::Http(err) if err.is_decode() => ErrorKind::Protocol,
            _ => ErrorKind::Unavailable,
        }
    }
}
