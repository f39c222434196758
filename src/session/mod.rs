//! Meditation session: countdown clock and the controller that keeps the
//! clock, the tone and the UI in step.

mod clock;
mod controller;
mod error;

pub use clock::{ClockEvent, SessionClock, TICK_PERIOD};
pub use controller::{EngineSignal, SessionController, COMPLETION_DELAY};
pub use error::SessionError;
