use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId, QuizId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// A question whose fields do not match its declared type, or a quiz that
/// cannot be played at all.
///
/// Detected before a session starts; not recoverable by the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DataIntegrityError {
    #[error("quiz has no questions")]
    NoQuestions,

    #[error("question {id} has empty text")]
    EmptyQuestionText { id: QuestionId },

    #[error("duplicate question id {id}")]
    DuplicateQuestionId { id: QuestionId },

    #[error("multiple-choice question {id} has no options")]
    NoOptions { id: QuestionId },

    #[error("multiple-choice question {id} has no correct option")]
    NoCorrectOption { id: QuestionId },

    #[error("duplicate option id {option} in question {id}")]
    DuplicateOptionId { id: QuestionId, option: OptionId },

    #[error("true-false question {id} has correct answer {answer:?}, expected \"true\" or \"false\"")]
    InvalidTrueFalseAnswer { id: QuestionId, answer: String },

    #[error("short-answer question {id} has an empty correct answer")]
    EmptyCorrectAnswer { id: QuestionId },
}

//
// ─── QUIZ TYPES ────────────────────────────────────────────────────────────────
//

/// One selectable option of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub id: OptionId,
    pub text: String,
    pub is_correct: bool,
}

/// Type-dependent part of a question, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    #[serde(rename_all = "camelCase")]
    MultipleChoice { options: Vec<AnswerOption> },
    /// `correct_answer` is `"true"` or `"false"`, kept as a string for
    /// wire compatibility with captured answers.
    #[serde(rename_all = "camelCase")]
    TrueFalse { correct_answer: String },
    #[serde(rename_all = "camelCase")]
    ShortAnswer { correct_answer: String },
}

impl QuestionKind {
    /// Human-readable name of the question type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => "multiple-choice",
            QuestionKind::TrueFalse { .. } => "true-false",
            QuestionKind::ShortAnswer { .. } => "short-answer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    /// Option ids flagged correct, for multiple-choice questions.
    ///
    /// Empty for the other question types.
    #[must_use]
    pub fn correct_option_ids(&self) -> HashSet<&OptionId> {
        match &self.kind {
            QuestionKind::MultipleChoice { options } => options
                .iter()
                .filter(|opt| opt.is_correct)
                .map(|opt| &opt.id)
                .collect(),
            _ => HashSet::new(),
        }
    }

    fn validate(&self) -> Result<(), DataIntegrityError> {
        if self.text.trim().is_empty() {
            return Err(DataIntegrityError::EmptyQuestionText {
                id: self.id.clone(),
            });
        }

        match &self.kind {
            QuestionKind::MultipleChoice { options } => {
                if options.is_empty() {
                    return Err(DataIntegrityError::NoOptions {
                        id: self.id.clone(),
                    });
                }
                let mut seen = HashSet::new();
                for option in options {
                    if !seen.insert(&option.id) {
                        return Err(DataIntegrityError::DuplicateOptionId {
                            id: self.id.clone(),
                            option: option.id.clone(),
                        });
                    }
                }
                if !options.iter().any(|opt| opt.is_correct) {
                    return Err(DataIntegrityError::NoCorrectOption {
                        id: self.id.clone(),
                    });
                }
            }
            QuestionKind::TrueFalse { correct_answer } => {
                if correct_answer != "true" && correct_answer != "false" {
                    return Err(DataIntegrityError::InvalidTrueFalseAnswer {
                        id: self.id.clone(),
                        answer: correct_answer.clone(),
                    });
                }
            }
            QuestionKind::ShortAnswer { correct_answer } => {
                if correct_answer.trim().is_empty() {
                    return Err(DataIntegrityError::EmptyCorrectAnswer {
                        id: self.id.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// An authored quiz. Immutable once play begins; question order defines
/// play order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: QuizId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<Question>,
    /// Human-entry join token. May equal the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Quiz {
    /// Checks the quiz against the invariants a session relies on.
    ///
    /// # Errors
    ///
    /// Returns `DataIntegrityError` for an empty question list, a question
    /// whose fields do not match its declared type, or duplicated ids.
    pub fn validate(&self) -> Result<(), DataIntegrityError> {
        if self.questions.is_empty() {
            return Err(DataIntegrityError::NoQuestions);
        }

        let mut seen = HashSet::new();
        for question in &self.questions {
            if !seen.insert(&question.id) {
                return Err(DataIntegrityError::DuplicateQuestionId {
                    id: question.id.clone(),
                });
            }
            question.validate()?;
        }

        Ok(())
    }

    /// True if the given join token matches this quiz by id or by code.
    #[must_use]
    pub fn matches(&self, id_or_code: &str) -> bool {
        self.id.as_str() == id_or_code || self.code.as_deref() == Some(id_or_code)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str, text: &str, is_correct: bool) -> AnswerOption {
        AnswerOption {
            id: OptionId::new(id),
            text: text.to_string(),
            is_correct,
        }
    }

    fn quiz_with(questions: Vec<Question>) -> Quiz {
        Quiz {
            id: QuizId::new("quiz-1"),
            title: "Test".to_string(),
            description: None,
            questions,
            code: Some("ABC123".to_string()),
        }
    }

    #[test]
    fn empty_quiz_fails_validation() {
        let err = quiz_with(Vec::new()).validate().unwrap_err();
        assert_eq!(err, DataIntegrityError::NoQuestions);
    }

    #[test]
    fn multiple_choice_requires_a_correct_option() {
        let quiz = quiz_with(vec![Question {
            id: QuestionId::new("q1"),
            text: "Pick one".to_string(),
            hint: None,
            kind: QuestionKind::MultipleChoice {
                options: vec![option("a", "A", false), option("b", "B", false)],
            },
        }]);

        assert!(matches!(
            quiz.validate().unwrap_err(),
            DataIntegrityError::NoCorrectOption { .. }
        ));
    }

    #[test]
    fn multiple_choice_requires_options() {
        let quiz = quiz_with(vec![Question {
            id: QuestionId::new("q1"),
            text: "Pick one".to_string(),
            hint: None,
            kind: QuestionKind::MultipleChoice {
                options: Vec::new(),
            },
        }]);

        assert!(matches!(
            quiz.validate().unwrap_err(),
            DataIntegrityError::NoOptions { .. }
        ));
    }

    #[test]
    fn true_false_rejects_other_answers() {
        let quiz = quiz_with(vec![Question {
            id: QuestionId::new("q1"),
            text: "Is water wet?".to_string(),
            hint: None,
            kind: QuestionKind::TrueFalse {
                correct_answer: "yes".to_string(),
            },
        }]);

        assert!(matches!(
            quiz.validate().unwrap_err(),
            DataIntegrityError::InvalidTrueFalseAnswer { .. }
        ));
    }

    #[test]
    fn duplicate_question_ids_fail_validation() {
        let make = |text: &str| Question {
            id: QuestionId::new("q1"),
            text: text.to_string(),
            hint: None,
            kind: QuestionKind::ShortAnswer {
                correct_answer: "x".to_string(),
            },
        };
        let quiz = quiz_with(vec![make("First"), make("Second")]);

        assert!(matches!(
            quiz.validate().unwrap_err(),
            DataIntegrityError::DuplicateQuestionId { .. }
        ));
    }

    #[test]
    fn valid_quiz_passes() {
        let quiz = quiz_with(vec![
            Question {
                id: QuestionId::new("q1"),
                text: "Pick all primes".to_string(),
                hint: Some("Two of them".to_string()),
                kind: QuestionKind::MultipleChoice {
                    options: vec![
                        option("a", "2", true),
                        option("b", "3", true),
                        option("c", "4", false),
                    ],
                },
            },
            Question {
                id: QuestionId::new("q2"),
                text: "The sky is blue".to_string(),
                hint: None,
                kind: QuestionKind::TrueFalse {
                    correct_answer: "true".to_string(),
                },
            },
        ]);

        quiz.validate().unwrap();
        assert!(quiz.matches("quiz-1"));
        assert!(quiz.matches("ABC123"));
        assert!(!quiz.matches("nope"));
    }

    #[test]
    fn question_json_uses_type_tag_and_camel_case() {
        let question = Question {
            id: QuestionId::new("q1"),
            text: "The sky is blue".to_string(),
            hint: None,
            kind: QuestionKind::TrueFalse {
                correct_answer: "true".to_string(),
            },
        };

        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["type"], "true-false");
        assert_eq!(value["correctAnswer"], "true");
        assert!(value.get("hint").is_none());

        let back: Question = serde_json::from_value(value).unwrap();
        assert_eq!(back, question);
    }

    #[test]
    fn option_json_uses_is_correct_camel_case() {
        let value = serde_json::to_value(option("a", "2", true)).unwrap();
        assert_eq!(value["isCorrect"], true);
    }
}
