#![forbid(unsafe_code)]

//! Orchestration around the quiz play engine: session lifecycle with
//! persistence, countdown scheduling, and AI hint generation.

pub mod countdown;
pub mod error;
pub mod hints;
pub mod play;

pub use quiz_core::Clock;

pub use countdown::{ManualScheduler, QuestionTimer, TickHandle, TickScheduler, TokioScheduler};
pub use error::{HintServiceError, PlayError};
pub use hints::{HintConfig, HintService};
pub use play::{PlayAdvance, PlayService};
