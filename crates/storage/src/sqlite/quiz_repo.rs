use quiz_core::model::Quiz;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{QuizStore, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait::async_trait]
impl QuizStore for SqliteRepository {
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError> {
        let document = serde_json::to_string(quiz).map_err(ser)?;

        sqlx::query(
            r"
                INSERT INTO quizzes (id, code, document)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(id) DO UPDATE SET
                    code = excluded.code,
                    document = excluded.document
            ",
        )
        .bind(quiz.id.as_str())
        .bind(quiz.code.as_deref())
        .bind(document)
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_quiz(&self, id_or_code: &str) -> Result<Quiz, StorageError> {
        let row = sqlx::query(
            r"
                SELECT document FROM quizzes
                WHERE id = ?1 OR code = ?1
                LIMIT 1
            ",
        )
        .bind(id_or_code)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        let document: String = row.try_get("document").map_err(ser)?;
        serde_json::from_str(&document).map_err(ser)
    }
}
