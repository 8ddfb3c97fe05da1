use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::Difficulty;
use crate::source::{FallbackPool, RawQuestion};

/// Errors raised while loading a fallback pool file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse fallback questions: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question {index} has no incorrect answers")]
    InvalidQuestion { index: usize },
    #[error("fallback pool must contain at least one question")]
    Empty,
}

/// Load a fallback pool from a JSON array of trivia-style records.
///
/// Records use the trivia API's field names; a missing `difficulty`
/// defaults to medium.
pub fn load_pool_from_json<P: AsRef<Path>>(path: P) -> Result<FallbackPool, LoadError> {
    let path = path.as_ref();
    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_pool(&json_content)
}

pub fn parse_pool(json_content: &str) -> Result<FallbackPool, LoadError> {
    let records: Vec<RawQuestion> = serde_json::from_str(json_content)?;

    let questions = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            record
                .to_question(Difficulty::Medium)
                .ok_or(LoadError::InvalidQuestion { index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    FallbackPool::new(questions).ok_or(LoadError::Empty)
}
