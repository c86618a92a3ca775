use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::ids::{OptionId, QuestionId};

/// A captured answer to one question.
///
/// Serializes untagged so the persisted record carries `string` for
/// true-false/short-answer and `string[]` for multiple-choice, matching
/// the attempt record shape any leaderboard consumer expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Selected option ids of a multiple-choice question.
    Selection(BTreeSet<OptionId>),
    /// Captured text for true-false ("true"/"false") or short-answer.
    Text(String),
}

impl Answer {
    /// An empty selection, the sentinel for an unanswered multiple-choice
    /// question.
    #[must_use]
    pub fn empty_selection() -> Self {
        Self::Selection(BTreeSet::new())
    }

    /// An empty text answer, the sentinel for the other question types.
    #[must_use]
    pub fn empty_text() -> Self {
        Self::Text(String::new())
    }

    /// True if nothing has actually been captured.
    ///
    /// An empty answer is rejected by submission; it only appears in a
    /// finished attempt as the record of an unanswered question.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Selection(ids) => ids.is_empty(),
            Answer::Text(text) => text.is_empty(),
        }
    }
}

/// One `(questionId, answer)` pair of a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub question_id: QuestionId,
    pub answer: Answer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_answer_serializes_as_string() {
        let json = serde_json::to_string(&Answer::Text("Italy".to_string())).unwrap();
        assert_eq!(json, "\"Italy\"");
    }

    #[test]
    fn selection_serializes_as_sorted_array() {
        let mut ids = BTreeSet::new();
        ids.insert(OptionId::new("b"));
        ids.insert(OptionId::new("a"));
        let json = serde_json::to_string(&Answer::Selection(ids)).unwrap();
        assert_eq!(json, "[\"a\",\"b\"]");
    }

    #[test]
    fn untagged_deserialize_picks_the_right_shape() {
        let text: Answer = serde_json::from_str("\"true\"").unwrap();
        assert_eq!(text, Answer::Text("true".to_string()));

        let selection: Answer = serde_json::from_str("[\"a\"]").unwrap();
        assert!(matches!(selection, Answer::Selection(ids) if ids.len() == 1));
    }

    #[test]
    fn emptiness_reflects_captured_content() {
        assert!(Answer::empty_selection().is_empty());
        assert!(Answer::empty_text().is_empty());
        assert!(!Answer::Text("false".to_string()).is_empty());
    }
}
