//! Serial shift register segment backend
//!
//! Segments are shifted LSB first (decimal point first, segment `a`
//! last), then strobed onto the output latch, so the register contents
//! only ever change while the digit is disabled. Output enable is
//! active low at the register.

use embedded_hal::digital::OutputPin;

use passus_core::display::DisplayBackend;

use super::digit_select::DigitSelect;

/// Display backend over a 74HC595-style register plus a digit selector.
pub struct ShiftRegisterBackend<Data, Clk, Lat, Oe, Sel> {
    data: Data,
    clock: Clk,
    latch: Lat,
    /// Active low
    output_enable: Oe,
    select: Sel,
}

impl<Data, Clk, Lat, Oe, Sel> ShiftRegisterBackend<Data, Clk, Lat, Oe, Sel>
where
    Data: OutputPin,
    Clk: OutputPin,
    Lat: OutputPin,
    Oe: OutputPin,
    Sel: DigitSelect,
{
    pub fn new(data: Data, mut clock: Clk, mut latch: Lat, mut output_enable: Oe, select: Sel) -> Self {
        let _ = clock.set_low();
        let _ = latch.set_low();
        // Dark until the first frame is shifted out.
        let _ = output_enable.set_high();
        Self {
            data,
            clock,
            latch,
            output_enable,
            select,
        }
    }
}

impl<Data, Clk, Lat, Oe, Sel> DisplayBackend for ShiftRegisterBackend<Data, Clk, Lat, Oe, Sel>
where
    Data: OutputPin,
    Clk: OutputPin,
    Lat: OutputPin,
    Oe: OutputPin,
    Sel: DigitSelect,
{
    fn output_enable(&mut self, on: bool) {
        if on {
            let _ = self.output_enable.set_low();
        } else {
            let _ = self.output_enable.set_high();
        }
    }

    fn select_digit(&mut self, index: u8) {
        self.select.select(index);
    }

    fn shift_pattern(&mut self, pattern: u8) {
        for bit in 0..8 {
            if pattern & (1 << bit) != 0 {
                let _ = self.data.set_high();
            } else {
                let _ = self.data.set_low();
            }
            let _ = self.clock.set_high();
            let _ = self.clock.set_low();
        }
        let _ = self.latch.set_high();
        let _ = self.latch.set_low();
    }
}
