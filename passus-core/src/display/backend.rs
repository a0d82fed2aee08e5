//! Display backend trait
//!
//! Abstracts the bit-serial wire protocol to the segment shift register
//! and the digit selector. The driver decides *what* to show; a backend
//! decides how the byte reaches the hardware. Board variants (ripple
//! counter digit select vs. direct select lines) are different backend
//! constructions, not compile-time switches.

/// Wire-level interface for one multiplexed digit refresh.
///
/// The driver calls, in order: `output_enable(false)`,
/// `select_digit(index)`, `shift_pattern(pattern)`, then
/// `output_enable(true)` unless the display is blanked. Implementations
/// must not block longer than the digit dwell time.
pub trait DisplayBackend {
    /// Gate the digit output drivers on or off.
    fn output_enable(&mut self, on: bool);

    /// Select the physical digit about to be driven.
    ///
    /// Index 0 is the least significant digit. Ripple-counter selectors
    /// treat index 0 as the reset pulse and advance on every refresh.
    fn select_digit(&mut self, index: u8);

    /// Shift one 8-bit segment pattern out, LSB first, and strobe the
    /// shift register's latch.
    fn shift_pattern(&mut self, pattern: u8);
}
