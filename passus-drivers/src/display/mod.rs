//! Display backend over a shift register
//!
//! The segment lines of all digits are fed by one 8-bit serial shift
//! register; which digit's common line is active is a separate concern
//! behind [`DigitSelect`], because board revisions differ there (a
//! CD4017 ripple counter on the original board, one GPIO per digit on
//! the breadboard variant).

mod digit_select;
mod shift_register;

pub use digit_select::{DigitSelect, DirectSelect, RippleCounterSelect};
pub use shift_register::ShiftRegisterBackend;
