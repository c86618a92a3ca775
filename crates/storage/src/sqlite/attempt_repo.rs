use quiz_core::model::{QuizAttempt, QuizId};
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{AttemptStore, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait::async_trait]
impl AttemptStore for SqliteRepository {
    async fn append_attempt(
        &self,
        quiz_id: &QuizId,
        attempt: &QuizAttempt,
    ) -> Result<(), StorageError> {
        let document = serde_json::to_string(attempt).map_err(ser)?;

        sqlx::query(
            r"
                INSERT INTO attempts (quiz_id, participant_name, score, submitted_at, document)
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(quiz_id.as_str())
        .bind(&attempt.participant_name)
        .bind(i64::from(attempt.score))
        .bind(attempt.submitted_at)
        .bind(document)
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn list_attempts(&self, quiz_id: &QuizId) -> Result<Vec<QuizAttempt>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT document FROM attempts
                WHERE quiz_id = ?1
                ORDER BY submitted_at ASC, id ASC
            ",
        )
        .bind(quiz_id.as_str())
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let document: String = row.try_get("document").map_err(ser)?;
            out.push(serde_json::from_str(&document).map_err(ser)?);
        }

        Ok(out)
    }
}
