//! User input filtering
//!
//! The encoder push button is sampled once per loop tick and debounced
//! against a fixed window; the encoder quadrature pulses arrive from an
//! edge interrupt and are accumulated into a signed delta.

mod debounce;
mod encoder;

pub use debounce::Debouncer;
pub use encoder::{EncoderAccumulator, Pulse, SATURATION_CLICKS};

/// Stable-level window for both the button and the encoder pulses (ms).
pub const DEBOUNCE_MS: u64 = 5;
