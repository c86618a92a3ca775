#![forbid(unsafe_code)]

//! Storage adapters for quizzes and attempts: trait contracts, an
//! in-memory implementation, and a `SQLite` backend.

pub mod repository;
pub mod sqlite;

pub use repository::{AttemptStore, QuizStore, Storage, StorageError};
pub use sqlite::{SqliteInitError, SqliteRepository};
