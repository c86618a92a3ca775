use std::sync::Arc;

use quiz_core::model::QuizAttempt;
use quiz_core::session::{Advance, Session, SessionConfig};
use quiz_core::time::Clock;
use storage::repository::{AttemptStore, QuizStore};

use crate::error::PlayError;

/// Result of advancing a session through `PlayService`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayAdvance {
    pub finished: bool,
    /// The persisted attempt, present only on the transition into the
    /// finished state. Later advances carry nothing.
    pub attempt: Option<QuizAttempt>,
}

/// Orchestrates session start and attempt persistence.
///
/// Sessions abandoned before their last question leave no record; the
/// attempt write happens once, on the advance that finishes the session.
#[derive(Clone)]
pub struct PlayService {
    clock: Clock,
    quizzes: Arc<dyn QuizStore>,
    attempts: Arc<dyn AttemptStore>,
    config: SessionConfig,
}

impl PlayService {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizStore>,
        attempts: Arc<dyn AttemptStore>,
    ) -> Self {
        Self {
            clock,
            quizzes,
            attempts,
            config: SessionConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Look up a quiz by id or join code and start a session for it.
    ///
    /// # Errors
    ///
    /// Returns `PlayError::Storage` when no quiz matches and
    /// `PlayError::Session` when the quiz fails its integrity check or
    /// the participant name is blank.
    pub async fn start_session(
        &self,
        id_or_code: &str,
        participant_name: &str,
    ) -> Result<Session, PlayError> {
        let quiz = self.quizzes.get_quiz(id_or_code).await?;
        let session = Session::start(quiz, participant_name, self.config, self.clock)?;
        tracing::info!(
            quiz_id = %session.quiz().id,
            participant = participant_name,
            questions = session.quiz().questions.len(),
            "session started"
        );
        Ok(session)
    }

    /// Advance past the current graded question, persisting the attempt
    /// when this finishes the session.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` for out-of-phase calls and
    /// `StorageError` if the attempt write fails (the session is still
    /// finished in that case; retrying the write may duplicate, which is
    /// acceptable).
    pub async fn advance(&self, session: &mut Session) -> Result<PlayAdvance, PlayError> {
        match session.advance()? {
            Advance::NextQuestion { .. } => Ok(PlayAdvance {
                finished: false,
                attempt: None,
            }),
            Advance::AlreadyFinished => Ok(PlayAdvance {
                finished: true,
                attempt: None,
            }),
            Advance::Finished(attempt) => {
                self.attempts
                    .append_attempt(&attempt.quiz_id, &attempt)
                    .await?;
                tracing::info!(
                    quiz_id = %attempt.quiz_id,
                    participant = %attempt.participant_name,
                    score = attempt.score,
                    "attempt recorded"
                );
                Ok(PlayAdvance {
                    finished: true,
                    attempt: Some(attempt),
                })
            }
        }
    }

    /// Countdown-expiry path: grade whatever is captured (or record
    /// "Time's up!") and move on, exactly as a manual submit-then-next
    /// would.
    ///
    /// # Errors
    ///
    /// Same as [`PlayService::advance`], plus `SessionError` if the
    /// session is not awaiting an answer.
    pub async fn handle_timeout(&self, session: &mut Session) -> Result<PlayAdvance, PlayError> {
        session.force_grade()?;
        self.advance(session).await
    }
}
