//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::session::SessionError;
use storage::repository::StorageError;

/// Errors emitted by `HintService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HintServiceError {
    #[error("hint generation is not configured")]
    Disabled,
    #[error("at least one question is required")]
    NoQuestions,
    #[error("question at index {index} has empty text")]
    EmptyQuestion { index: usize },
    #[error("hint generation returned an empty response")]
    EmptyResponse,
    #[error("expected {expected} hints, got {got}")]
    CountMismatch { expected: usize, got: usize },
    #[error("hint generation failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("hint payload could not be parsed: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `PlayService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlayError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
