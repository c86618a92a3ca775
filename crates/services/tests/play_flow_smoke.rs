use std::sync::Arc;

use quiz_core::model::{
    AnswerOption, OptionId, Question, QuestionId, QuestionKind, Quiz, QuizId,
};
use quiz_core::session::AnswerInput;
use quiz_core::time::{fixed_clock, fixed_now};
use services::PlayService;
use storage::repository::{AttemptStore, QuizStore, Storage};

fn build_quiz() -> Quiz {
    Quiz {
        id: QuizId::new("geo-1"),
        title: "Geography".to_string(),
        description: None,
        questions: vec![
            Question {
                id: QuestionId::new("q1"),
                text: "Pick the capitals".to_string(),
                hint: None,
                kind: QuestionKind::MultipleChoice {
                    options: vec![
                        AnswerOption {
                            id: OptionId::new("a"),
                            text: "Rome".to_string(),
                            is_correct: true,
                        },
                        AnswerOption {
                            id: OptionId::new("b"),
                            text: "Paris".to_string(),
                            is_correct: true,
                        },
                        AnswerOption {
                            id: OptionId::new("c"),
                            text: "Milan".to_string(),
                            is_correct: false,
                        },
                    ],
                },
            },
            Question {
                id: QuestionId::new("q2"),
                text: "Which country is Rome in?".to_string(),
                hint: None,
                kind: QuestionKind::ShortAnswer {
                    correct_answer: "Italy".to_string(),
                },
            },
            Question {
                id: QuestionId::new("q3"),
                text: "Paris is in Italy".to_string(),
                hint: None,
                kind: QuestionKind::TrueFalse {
                    correct_answer: "false".to_string(),
                },
            },
        ],
        code: Some("GEO".to_string()),
    }
}

#[tokio::test]
async fn full_play_flow_persists_the_attempt_over_sqlite() {
    let storage = Storage::sqlite("sqlite:file:memdb_play_flow?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    storage.quizzes.upsert_quiz(&build_quiz()).await.unwrap();

    let service = PlayService::new(
        fixed_clock(),
        Arc::clone(&storage.quizzes),
        Arc::clone(&storage.attempts),
    );

    let mut session = service.start_session("GEO", "Alice").await.unwrap();

    // Q1: both correct options, graded correct.
    session
        .record_answer(
            &QuestionId::new("q1"),
            AnswerInput::ToggleOption(OptionId::new("a")),
        )
        .unwrap();
    session
        .record_answer(
            &QuestionId::new("q1"),
            AnswerInput::ToggleOption(OptionId::new("b")),
        )
        .unwrap();
    assert!(session.submit_answer().unwrap().correct);
    assert!(!service.advance(&mut session).await.unwrap().finished);

    // Q2: trimmed short answer, graded correct.
    session
        .record_answer(
            &QuestionId::new("q2"),
            AnswerInput::Text(" Italy ".to_string()),
        )
        .unwrap();
    assert!(session.submit_answer().unwrap().correct);
    assert!(!service.advance(&mut session).await.unwrap().finished);

    // Q3: timer runs out with nothing captured.
    let done = service.handle_timeout(&mut session).await.unwrap();
    assert!(done.finished);
    let attempt = done.attempt.expect("attempt on finish");
    assert_eq!(attempt.score, 2);
    assert_eq!(attempt.answers.len(), 3);
    assert_eq!(attempt.submitted_at, fixed_now());

    let stored = storage
        .attempts
        .list_attempts(&QuizId::new("geo-1"))
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0], attempt);
}
