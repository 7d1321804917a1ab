use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReleaseSourceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRepository {
    #[error("Repository owner must not be empty")]
    EmptyOwner,

    #[error("Repository name must not be empty")]
    EmptyName,

    #[error("Expected repository in owner/name form, got {0:?}")]
    Malformed(String),
}
