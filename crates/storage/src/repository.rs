use async_trait::async_trait;
use quiz_core::model::{Quiz, QuizAttempt, QuizId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Lookup and persistence of quiz definitions.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Persist or update a quiz definition.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError>;

    /// Fetch a quiz by its id or its join code.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no quiz matches either way, or
    /// other storage errors.
    async fn get_quiz(&self, id_or_code: &str) -> Result<Quiz, StorageError>;
}

/// Append-only store of completed attempts.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    /// Record one completed attempt. At-least-once delivery is enough;
    /// duplicates are not deduplicated here.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on write failure.
    async fn append_attempt(
        &self,
        quiz_id: &QuizId,
        attempt: &QuizAttempt,
    ) -> Result<(), StorageError>;

    /// All attempts recorded for a quiz, oldest first. An unknown quiz id
    /// yields an empty list, not `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failure.
    async fn list_attempts(&self, quiz_id: &QuizId) -> Result<Vec<QuizAttempt>, StorageError>;
}

/// Simple in-memory store implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    quizzes: Arc<Mutex<HashMap<QuizId, Quiz>>>,
    attempts: Arc<Mutex<HashMap<QuizId, Vec<QuizAttempt>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizStore for InMemoryRepository {
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(quiz.id.clone(), quiz.clone());
        Ok(())
    }

    async fn get_quiz(&self, id_or_code: &str) -> Result<Quiz, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .values()
            .find(|quiz| quiz.matches(id_or_code))
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl AttemptStore for InMemoryRepository {
    async fn append_attempt(
        &self,
        quiz_id: &QuizId,
        attempt: &QuizAttempt,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .entry(quiz_id.clone())
            .or_default()
            .push(attempt.clone());
        Ok(())
    }

    async fn list_attempts(&self, quiz_id: &QuizId) -> Result<Vec<QuizAttempt>, StorageError> {
        let guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(quiz_id).cloned().unwrap_or_default())
    }
}

/// Aggregates the stores behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizStore>,
    pub attempts: Arc<dyn AttemptStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let quizzes: Arc<dyn QuizStore> = Arc::new(repo.clone());
        let attempts: Arc<dyn AttemptStore> = Arc::new(repo);
        Self { quizzes, attempts }
    }
}
