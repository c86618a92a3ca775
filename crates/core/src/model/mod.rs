mod answer;
mod attempt;
mod ids;
mod quiz;

pub use answer::{Answer, AnswerEntry};
pub use attempt::QuizAttempt;
pub use ids::{OptionId, QuestionId, QuizId};
pub use quiz::{AnswerOption, DataIntegrityError, Question, QuestionKind, Quiz};
