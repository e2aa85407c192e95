#![forbid(unsafe_code)]

pub mod sessions;

pub use vocab_core::Clock;

pub use sessions::{
    Feedback, ROUND_SIZE, Round, RoundProgress, RoundSelector, SessionController, SessionState,
};
