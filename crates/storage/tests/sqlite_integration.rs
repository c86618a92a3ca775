use quiz_core::model::{
    Answer, AnswerEntry, AnswerOption, OptionId, Question, QuestionId, QuestionKind, Quiz,
    QuizAttempt, QuizId,
};
use quiz_core::time::fixed_now;
use storage::repository::{AttemptStore, QuizStore, StorageError};
use storage::sqlite::SqliteRepository;

fn build_quiz(id: &str, code: Option<&str>) -> Quiz {
    Quiz {
        id: QuizId::new(id),
        title: "Capitals".to_string(),
        description: Some("Geography warm-up".to_string()),
        questions: vec![
            Question {
                id: QuestionId::new("q1"),
                text: "Pick the capitals".to_string(),
                hint: Some("Both are in Europe".to_string()),
                kind: QuestionKind::MultipleChoice {
                    options: vec![
                        AnswerOption {
                            id: OptionId::new("a"),
                            text: "Rome".to_string(),
                            is_correct: true,
                        },
                        AnswerOption {
                            id: OptionId::new("b"),
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
        ],
        code: code.map(str::to_string),
    }
}

fn build_attempt(quiz_id: &str, name: &str, score: u32) -> QuizAttempt {
    QuizAttempt {
        quiz_id: QuizId::new(quiz_id),
        participant_name: name.to_string(),
        answers: vec![
            AnswerEntry {
                question_id: QuestionId::new("q1"),
                answer: Answer::Selection([OptionId::new("a")].into_iter().collect()),
            },
            AnswerEntry {
                question_id: QuestionId::new("q2"),
                answer: Answer::Text("Italy".to_string()),
            },
        ],
        score,
        submitted_at: fixed_now(),
    }
}

#[tokio::test]
async fn sqlite_round_trips_a_quiz_document() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_quiz_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let quiz = build_quiz("quiz-1", Some("JOIN42"));
    repo.upsert_quiz(&quiz).await.unwrap();

    let by_id = repo.get_quiz("quiz-1").await.expect("fetch by id");
    assert_eq!(by_id, quiz);

    let by_code = repo.get_quiz("JOIN42").await.expect("fetch by code");
    assert_eq!(by_code.id, quiz.id);

    assert!(matches!(
        repo.get_quiz("missing").await.unwrap_err(),
        StorageError::NotFound
    ));
}

#[tokio::test]
async fn sqlite_upsert_replaces_the_stored_document() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_quiz_upsert?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.upsert_quiz(&build_quiz("quiz-1", None)).await.unwrap();

    let mut updated = build_quiz("quiz-1", Some("NEWCODE"));
    updated.title = "Renamed".to_string();
    repo.upsert_quiz(&updated).await.unwrap();

    let fetched = repo.get_quiz("NEWCODE").await.expect("fetch by new code");
    assert_eq!(fetched.title, "Renamed");
}

#[tokio::test]
async fn sqlite_appends_and_lists_attempts_in_submission_order() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_attempts?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let quiz_id = QuizId::new("quiz-1");
    assert!(repo.list_attempts(&quiz_id).await.unwrap().is_empty());

    repo.append_attempt(&quiz_id, &build_attempt("quiz-1", "Alice", 2))
        .await
        .unwrap();
    repo.append_attempt(&quiz_id, &build_attempt("quiz-1", "Bob", 1))
        .await
        .unwrap();

    let attempts = repo.list_attempts(&quiz_id).await.unwrap();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].participant_name, "Alice");
    assert_eq!(attempts[1].participant_name, "Bob");
    assert_eq!(attempts[0], build_attempt("quiz-1", "Alice", 2));

    // Attempts for another quiz stay isolated.
    let other = repo.list_attempts(&QuizId::new("quiz-2")).await.unwrap();
    assert!(other.is_empty());
}
