//! Multiplexed 5-digit LED display
//!
//! The display is a row of 7-segment digits driven through a single
//! shift register; only one digit is lit at a time and the loop cycles
//! through them fast enough for persistence of vision. The driver owns
//! the segment buffer, cursor, and scan position; the [`DisplayBackend`]
//! trait abstracts the wire protocol so board variants differ only in
//! which backend they construct.

mod backend;
mod driver;
pub mod glyphs;

pub use backend::DisplayBackend;
pub use driver::{
    DisplayDriver, CURSOR_BLINK_MS, CURSOR_MAX, DIGIT_COUNT, DOT_FOOT, DOT_LONG_PRESS, DOT_SPEED,
    DOT_STEP, DOT_TIME, MIN_DIGIT_DWELL_MS,
};
