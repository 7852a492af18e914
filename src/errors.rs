use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Rejected before any write reaches the store.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Failures of the backing store, surfaced distinctly so callers can offer a
/// retry instead of treating them like bad input.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Goal '{0}' not found")]
    GoalNotFound(String),

    #[error("Store write failed: {0}")]
    WriteFailed(String),

    #[error("Store read failed: {0}")]
    ReadFailed(String),

    #[error("Store operation '{0}' timed out")]
    Timeout(String),
}
