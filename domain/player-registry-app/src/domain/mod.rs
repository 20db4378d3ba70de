use thiserror::Error;

pub mod level;
pub mod memory;
pub mod player;
pub mod query;
pub mod validation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(pub i64);

impl PlayerId {
    /// Parses a path identifier. Only positive integers name a player.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.parse::<i64>() {
            Ok(id) if id > 0 => Some(PlayerId(id)),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Storage error: {0}")]
    StorageError(String),
}

#[derive(Debug, Error)]
pub enum RepoRetrieveError {
    #[error("Resource not found")]
    NotFound,
    #[error("Storage error: {0}")]
    StorageError(String),
}

#[derive(Debug, Error)]
pub enum RepoUpdateError {
    #[error("Resource not found")]
    NotFound,
    #[error("Storage error: {0}")]
    StorageError(String),
}
