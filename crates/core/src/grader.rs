//! Pure grading rules: question plus captured answer in, verdict out.

use serde::{Deserialize, Serialize};

use crate::model::{Answer, Question, QuestionKind};

/// Correctness verdict and display message for one graded question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub correct: bool,
    pub message: String,
}

impl Feedback {
    pub(crate) fn correct() -> Self {
        Self {
            correct: true,
            message: "Correct!".to_string(),
        }
    }

    pub(crate) fn incorrect(correct_answer: &str) -> Self {
        Self {
            correct: false,
            message: format!("Incorrect. The correct answer was: {correct_answer}"),
        }
    }
}

/// Grades a captured answer against a question. Deterministic, no side
/// effects.
///
/// Multiple-choice requires exact set equality with the options flagged
/// correct; true-false compares the literal string; short-answer compares
/// trimmed, case-sensitive. An answer whose shape does not match the
/// question type grades incorrect (the session engine rejects that shape
/// at capture time, so it only arises from hand-built answers).
#[must_use]
pub fn grade(question: &Question, answer: &Answer) -> Feedback {
    match (&question.kind, answer) {
        (QuestionKind::MultipleChoice { options }, Answer::Selection(selected)) => {
            let correct_ids = question.correct_option_ids();
            let exact_match = selected.len() == correct_ids.len()
                && selected.iter().all(|id| correct_ids.contains(id));
            if exact_match {
                Feedback::correct()
            } else {
                let correct_texts: Vec<&str> = options
                    .iter()
                    .filter(|opt| opt.is_correct)
                    .map(|opt| opt.text.as_str())
                    .collect();
                Feedback::incorrect(&correct_texts.join(", "))
            }
        }
        (QuestionKind::TrueFalse { correct_answer }, Answer::Text(captured)) => {
            if captured == correct_answer {
                Feedback::correct()
            } else {
                Feedback::incorrect(correct_answer)
            }
        }
        (QuestionKind::ShortAnswer { correct_answer }, Answer::Text(captured)) => {
            if captured.trim() == correct_answer.trim() {
                Feedback::correct()
            } else {
                Feedback::incorrect(correct_answer)
            }
        }
        (QuestionKind::MultipleChoice { options }, Answer::Text(_)) => {
            let correct_texts: Vec<&str> = options
                .iter()
                .filter(|opt| opt.is_correct)
                .map(|opt| opt.text.as_str())
                .collect();
            Feedback::incorrect(&correct_texts.join(", "))
        }
        (
            QuestionKind::TrueFalse { correct_answer }
            | QuestionKind::ShortAnswer { correct_answer },
            Answer::Selection(_),
        ) => Feedback::incorrect(correct_answer),
    }
}
