//! Application state machine
//!
//! The pure transition decision lives in [`machine`], the session data in
//! [`session`], and the side-effecting orchestration (display updates,
//! actuator calls, timeout polling) in [`controller`].

mod controller;
mod machine;
mod session;

pub use controller::{Controller, Hardware, BLINK_ON_MS, BLINK_PERIOD_MS};
pub use machine::{Event, State};
pub use session::Session;
