//! Session state machine driving one participant through one quiz.
//!
//! A session moves through `AwaitingAnswer(i)` -> `Graded(i)` for every
//! question index in order and ends in `Finished`, emitting the attempt
//! record exactly once. The per-question countdown is advanced by an
//! external ticker through [`Session::tick`]; the engine never advances
//! on its own.

use std::collections::HashMap;

use thiserror::Error;

use crate::grader::{Feedback, grade};
use crate::model::{
    Answer, AnswerEntry, DataIntegrityError, OptionId, Question, QuestionId, QuestionKind, Quiz,
    QuizAttempt,
};
use crate::time::Clock;

/// Feedback message recorded when the countdown expires with nothing
/// captured.
pub const TIMES_UP_MESSAGE: &str = "Time's up!";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors surfaced by the session engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    /// Submission with no captured answer. Recoverable: the caller
    /// re-prompts, the session does not move.
    #[error("no answer selected")]
    NoAnswerSelected,

    /// An operation invoked outside its valid phase. A driving-layer bug;
    /// the engine rejects rather than coerces.
    #[error("{operation} is not valid while the session is {phase:?}")]
    InvalidTransition { operation: &'static str, phase: Phase },

    /// An answer directed at a question other than the active one.
    #[error("expected an answer for question {expected}, got one for {got}")]
    WrongQuestion { expected: QuestionId, got: QuestionId },

    /// Answer input whose shape does not fit the active question's type.
    #[error("a {input} answer does not fit a {question_type} question")]
    AnswerTypeMismatch {
        input: &'static str,
        question_type: &'static str,
    },

    #[error("participant name is empty")]
    EmptyParticipantName,

    #[error(transparent)]
    Integrity(#[from] DataIntegrityError),
}

//
// ─── CONFIG AND VIEWS ──────────────────────────────────────────────────────────
//

/// Per-session timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Countdown limit each question starts from.
    pub seconds_per_question: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seconds_per_question: 30,
        }
    }
}

/// Where the session currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The current question is shown and accepting answer input.
    AwaitingAnswer,
    /// The current question has been graded; waiting for `advance`.
    Graded,
    /// The last question has been advanced past; the engine is inert.
    Finished,
}

/// Answer input for the active question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerInput {
    /// Toggle membership of one option in the multiple-choice selection.
    /// A second toggle with the same id deselects it.
    ToggleOption(OptionId),
    /// Replace the captured text for true-false or short-answer.
    Text(String),
}

impl AnswerInput {
    fn shape_name(&self) -> &'static str {
        match self {
            AnswerInput::ToggleOption(_) => "option-toggle",
            AnswerInput::Text(_) => "text",
        }
    }
}

/// Outcome of a countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Countdown still running; seconds left after this tick.
    Counting { remaining: u32 },
    /// The countdown just reached zero. The driver is expected to call
    /// `force_grade` and then `advance`.
    Expired,
    /// The tick landed after the countdown stopped or the question moved
    /// on. Stale ticks are inert rather than an error.
    Idle,
}

/// Outcome of `advance`.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved to the next question.
    NextQuestion { index: usize },
    /// The last question was advanced past; this carries the one and only
    /// attempt emission.
    Finished(QuizAttempt),
    /// `advance` after `Finished`: a no-op, nothing is emitted again.
    AlreadyFinished,
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub graded: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One participant's run through one quiz.
pub struct Session {
    quiz: Quiz,
    participant_name: String,
    phase: Phase,
    current: usize,
    answers: HashMap<QuestionId, Answer>,
    feedback: HashMap<QuestionId, Feedback>,
    score: u32,
    time_remaining: u32,
    countdown_running: bool,
    hint_visible: bool,
    config: SessionConfig,
    clock: Clock,
}

impl Session {
    /// Starts a session at the first question with a fresh countdown.
    ///
    /// `clock` stamps the attempt's `submitted_at` when the session
    /// finishes; pass a fixed clock in tests.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyParticipantName` for a blank name and
    /// `SessionError::Integrity` if any question's fields do not match
    /// its declared type. Both are checked before any question is shown.
    pub fn start(
        quiz: Quiz,
        participant_name: impl Into<String>,
        config: SessionConfig,
        clock: Clock,
    ) -> Result<Self, SessionError> {
        let participant_name = participant_name.into();
        if participant_name.trim().is_empty() {
            return Err(SessionError::EmptyParticipantName);
        }
        quiz.validate()?;

        Ok(Self {
            participant_name,
            phase: Phase::AwaitingAnswer,
            current: 0,
            answers: HashMap::new(),
            feedback: HashMap::new(),
            score: 0,
            time_remaining: config.seconds_per_question,
            countdown_running: true,
            hint_visible: false,
            config,
            clock,
            quiz,
        })
    }

    // ─── Accessors ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn participant_name(&self) -> &str {
        &self.participant_name
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the active question. Stays at the last index once
    /// finished.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The active question, or `None` once the session is finished.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if matches!(self.phase, Phase::Finished) {
            None
        } else {
            self.quiz.questions.get(self.current)
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    /// Captured answer for a question, if any.
    #[must_use]
    pub fn answer_for(&self, id: &QuestionId) -> Option<&Answer> {
        self.answers.get(id)
    }

    /// Grading feedback for a question, once it has been graded.
    #[must_use]
    pub fn feedback_for(&self, id: &QuestionId) -> Option<&Feedback> {
        self.feedback.get(id)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.quiz.questions.len();
        let graded = self.feedback.len();
        SessionProgress {
            total,
            graded,
            remaining: total - graded,
            is_complete: self.is_finished(),
        }
    }

    // ─── Operations ────────────────────────────────────────────────────────────

    /// Captures answer input for the active question and stops the
    /// countdown. Does not grade and does not transition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `AwaitingAnswer`,
    /// `WrongQuestion` if `question_id` is not the active question, and
    /// `AnswerTypeMismatch` if the input shape does not fit the question.
    pub fn record_answer(
        &mut self,
        question_id: &QuestionId,
        input: AnswerInput,
    ) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::AwaitingAnswer) {
            return Err(SessionError::InvalidTransition {
                operation: "record_answer",
                phase: self.phase,
            });
        }
        let question = &self.quiz.questions[self.current];
        if question.id != *question_id {
            return Err(SessionError::WrongQuestion {
                expected: question.id.clone(),
                got: question_id.clone(),
            });
        }

        match (&question.kind, input) {
            (QuestionKind::MultipleChoice { .. }, AnswerInput::ToggleOption(option_id)) => {
                let entry = self
                    .answers
                    .entry(question.id.clone())
                    .or_insert_with(Answer::empty_selection);
                if let Answer::Selection(selected) = entry {
                    if !selected.remove(&option_id) {
                        selected.insert(option_id);
                    }
                }
            }
            (
                QuestionKind::TrueFalse { .. } | QuestionKind::ShortAnswer { .. },
                AnswerInput::Text(text),
            ) => {
                self.answers.insert(question.id.clone(), Answer::Text(text));
            }
            (kind, input) => {
                return Err(SessionError::AnswerTypeMismatch {
                    input: input.shape_name(),
                    question_type: kind.type_name(),
                });
            }
        }

        // An explicit interaction cancels auto-advance pressure.
        self.countdown_running = false;
        Ok(())
    }

    /// Grades the captured answer for the active question.
    ///
    /// # Errors
    ///
    /// Returns `NoAnswerSelected` if nothing non-empty was captured (the
    /// session does not move) and `InvalidTransition` outside
    /// `AwaitingAnswer`.
    pub fn submit_answer(&mut self) -> Result<&Feedback, SessionError> {
        let id = self.awaiting_question_id("submit_answer")?;
        if self.answers.get(&id).is_some_and(|a| !a.is_empty()) {
            Ok(self.grade_current(&id))
        } else {
            Err(SessionError::NoAnswerSelected)
        }
    }

    /// Timeout path: grades whatever was captured, or records a
    /// "Time's up!" incorrect verdict when nothing was.
    ///
    /// Every question reached passes through exactly one grading event,
    /// whether by `submit_answer` or by this.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `AwaitingAnswer`.
    pub fn force_grade(&mut self) -> Result<&Feedback, SessionError> {
        let id = self.awaiting_question_id("force_grade")?;
        if self.answers.get(&id).is_some_and(|a| !a.is_empty()) {
            Ok(self.grade_current(&id))
        } else {
            self.countdown_running = false;
            self.phase = Phase::Graded;
            let feedback = Feedback {
                correct: false,
                message: TIMES_UP_MESSAGE.to_string(),
            };
            Ok(self.feedback.entry(id).or_insert(feedback))
        }
    }

    /// Moves past a graded question: on to the next with a fresh
    /// countdown and hidden hint, or into `Finished` with the attempt
    /// emission.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` in `AwaitingAnswer`. After `Finished`
    /// this is an idempotent no-op returning `Advance::AlreadyFinished`.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        match self.phase {
            Phase::AwaitingAnswer => Err(SessionError::InvalidTransition {
                operation: "advance",
                phase: self.phase,
            }),
            Phase::Finished => Ok(Advance::AlreadyFinished),
            Phase::Graded => {
                self.hint_visible = false;
                if self.current + 1 < self.quiz.questions.len() {
                    self.current += 1;
                    self.time_remaining = self.config.seconds_per_question;
                    self.countdown_running = true;
                    self.phase = Phase::AwaitingAnswer;
                    Ok(Advance::NextQuestion {
                        index: self.current,
                    })
                } else {
                    self.phase = Phase::Finished;
                    self.countdown_running = false;
                    Ok(Advance::Finished(self.build_attempt()))
                }
            }
        }
    }

    /// Advances the countdown by one second.
    ///
    /// Only meaningful while awaiting an answer with the countdown
    /// running; a tick landing anywhere else reports `Tick::Idle` so a
    /// stale timer firing after a transition cannot corrupt the session.
    pub fn tick(&mut self) -> Tick {
        if !matches!(self.phase, Phase::AwaitingAnswer) || !self.countdown_running {
            return Tick::Idle;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.countdown_running = false;
            Tick::Expired
        } else {
            Tick::Counting {
                remaining: self.time_remaining,
            }
        }
    }

    /// Flips hint visibility for the current question; resets to hidden
    /// on `advance`. Display-only, no effect on grading.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` once the session is finished.
    pub fn toggle_hint(&mut self) -> Result<bool, SessionError> {
        if matches!(self.phase, Phase::Finished) {
            return Err(SessionError::InvalidTransition {
                operation: "toggle_hint",
                phase: self.phase,
            });
        }
        self.hint_visible = !self.hint_visible;
        Ok(self.hint_visible)
    }

    // ─── Internals ─────────────────────────────────────────────────────────────

    fn awaiting_question_id(&self, operation: &'static str) -> Result<QuestionId, SessionError> {
        if matches!(self.phase, Phase::AwaitingAnswer) {
            // The awaiting phase always has an in-range index.
            Ok(self.quiz.questions[self.current].id.clone())
        } else {
            Err(SessionError::InvalidTransition {
                operation,
                phase: self.phase,
            })
        }
    }

    /// Grades the captured (non-empty) answer for the active question and
    /// moves to `Graded`. Callers check the preconditions.
    fn grade_current(&mut self, id: &QuestionId) -> &Feedback {
        let question = &self.quiz.questions[self.current];
        let answer = &self.answers[id];
        let feedback = grade(question, answer);
        if feedback.correct {
            self.score += 1;
        }
        self.countdown_running = false;
        self.phase = Phase::Graded;
        self.feedback.entry(id.clone()).or_insert(feedback)
    }

    fn build_attempt(&self) -> QuizAttempt {
        let answers = self
            .quiz
            .questions
            .iter()
            .map(|question| AnswerEntry {
                question_id: question.id.clone(),
                answer: self.answers.get(&question.id).cloned().unwrap_or_else(|| {
                    match question.kind {
                        QuestionKind::MultipleChoice { .. } => Answer::empty_selection(),
                        _ => Answer::empty_text(),
                    }
                }),
            })
            .collect();

        QuizAttempt {
            quiz_id: self.quiz.id.clone(),
            participant_name: self.participant_name.clone(),
            answers,
            score: self.score,
            submitted_at: self.clock.now(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("quiz_id", &self.quiz.id)
            .field("participant_name", &self.participant_name)
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("score", &self.score)
            .field("time_remaining", &self.time_remaining)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
