//! Encoder pulse accumulation
//!
//! The quadrature encoder's phase-A falling edge raises an interrupt; the
//! handler records one pulse here, using the phase-B level for direction.
//! The accumulator is the only state shared between the interrupt and the
//! main loop, so the owning firmware wraps it in a critical-section cell
//! and exposes nothing beyond `record_pulse` and `take`.

use super::DEBOUNCE_MS;

/// Number of audible clicks emitted when a pulse hits saturation.
pub const SATURATION_CLICKS: u8 = 3;

/// Outcome of recording one encoder pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pulse {
    /// Pulse accepted, delta updated
    Accepted,
    /// Pulse arrived inside the debounce window, dropped
    Ignored,
    /// Delta already at its representable bound; pulse dropped, caller
    /// should emit the audible click burst
    Saturated,
}

/// Signed encoder delta, written by the interrupt, drained by the loop.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderAccumulator {
    delta: i8,
    last_pulse_at: u64,
}

impl EncoderAccumulator {
    pub const fn new() -> Self {
        Self {
            delta: 0,
            last_pulse_at: 0,
        }
    }

    /// Record one qualifying phase-A edge. Interrupt side.
    ///
    /// Phase B high means counter-clockwise (decrement). The delta
    /// saturates at the i8 bounds rather than wrapping.
    pub fn record_pulse(&mut self, now: u64, phase_b_high: bool) -> Pulse {
        if now.wrapping_sub(self.last_pulse_at) <= DEBOUNCE_MS {
            return Pulse::Ignored;
        }
        self.last_pulse_at = now;

        let saturated = if phase_b_high {
            match self.delta.checked_sub(1) {
                Some(d) => {
                    self.delta = d;
                    false
                }
                None => true,
            }
        } else {
            match self.delta.checked_add(1) {
                Some(d) => {
                    self.delta = d;
                    false
                }
                None => true,
            }
        };

        if saturated {
            Pulse::Saturated
        } else {
            Pulse::Accepted
        }
    }

    /// Accumulated delta since the last `take`. Main-loop side.
    pub fn delta(&self) -> i8 {
        self.delta
    }

    /// Read and reset the accumulated delta. Main-loop side.
    pub fn take(&mut self) -> i8 {
        core::mem::take(&mut self.delta)
    }
}

impl Default for EncoderAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
