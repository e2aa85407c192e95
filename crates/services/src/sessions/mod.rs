mod controller;
mod progress;
mod round;
mod selector;

// Public API of the session subsystem.
pub use controller::{Feedback, SessionController, SessionState};
pub use progress::RoundProgress;
pub use round::Round;
pub use selector::{ROUND_SIZE, RoundSelector};
