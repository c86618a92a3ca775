#![forbid(unsafe_code)]

//! UI-agnostic quiz play engine: quiz/answer model, pure grading, and the
//! per-participant session state machine with an injectable clock.

pub mod grader;
pub mod model;
pub mod session;
pub mod time;

pub use grader::{Feedback, grade};
pub use session::{
    Advance, AnswerInput, Phase, Session, SessionConfig, SessionError, SessionProgress, Tick,
};
pub use time::Clock;
