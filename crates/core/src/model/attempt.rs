use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::answer::AnswerEntry;
use crate::model::ids::QuizId;

/// Persisted record of one completed session.
///
/// Assembled exactly once, when the participant advances past the last
/// graded question, and never mutated afterwards. Contains one answer
/// entry per question, in play order; unanswered questions carry an empty
/// sentinel answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub quiz_id: QuizId,
    pub participant_name: String,
    pub answers: Vec<AnswerEntry>,
    pub score: u32,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::answer::Answer;
    use crate::model::ids::QuestionId;
    use crate::time::fixed_now;

    #[test]
    fn attempt_json_matches_the_persisted_shape() {
        let attempt = QuizAttempt {
            quiz_id: QuizId::new("quiz-1"),
            participant_name: "Alice".to_string(),
            answers: vec![
                AnswerEntry {
                    question_id: QuestionId::new("q1"),
                    answer: Answer::Text("true".to_string()),
                },
                AnswerEntry {
                    question_id: QuestionId::new("q2"),
                    answer: Answer::empty_selection(),
                },
            ],
            score: 1,
            submitted_at: fixed_now(),
        };

        let value = serde_json::to_value(&attempt).unwrap();
        assert_eq!(value["quizId"], "quiz-1");
        assert_eq!(value["participantName"], "Alice");
        assert_eq!(value["answers"][0]["questionId"], "q1");
        assert_eq!(value["answers"][0]["answer"], "true");
        assert!(value["answers"][1]["answer"].is_array());
        assert_eq!(value["score"], 1);

        let back: QuizAttempt = serde_json::from_value(value).unwrap();
        assert_eq!(back, attempt);
    }
}
