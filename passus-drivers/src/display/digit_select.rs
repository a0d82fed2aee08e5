//! Digit common-line selection variants

use embedded_hal::digital::OutputPin;

use passus_core::display::DIGIT_COUNT;

/// Activates one digit's common line.
///
/// The display driver always selects digits in ascending scan order,
/// wrapping to 0 after the last digit; implementations may rely on that.
pub trait DigitSelect {
    fn select(&mut self, index: u8);
}

/// CD4017 decade counter driving the digit commons.
///
/// The counter advances on each clock rising edge; selecting digit 0
/// strobes master reset instead, which both resynchronizes the scan and
/// bounds any drift from electrical noise to a single frame.
pub struct RippleCounterSelect<Clk, Mr> {
    clock: Clk,
    reset: Mr,
}

impl<Clk: OutputPin, Mr: OutputPin> RippleCounterSelect<Clk, Mr> {
    pub fn new(mut clock: Clk, mut reset: Mr) -> Self {
        let _ = clock.set_low();
        // Start from a known counter state.
        let _ = reset.set_high();
        let _ = reset.set_low();
        Self { clock, reset }
    }
}

impl<Clk: OutputPin, Mr: OutputPin> DigitSelect for RippleCounterSelect<Clk, Mr> {
    fn select(&mut self, index: u8) {
        if index == 0 {
            let _ = self.reset.set_high();
            let _ = self.reset.set_low();
        } else {
            let _ = self.clock.set_high();
            let _ = self.clock.set_low();
        }
    }
}

/// One GPIO per digit common, active high.
pub struct DirectSelect<P> {
    pins: [P; DIGIT_COUNT],
}

impl<P: OutputPin> DirectSelect<P> {
    pub fn new(mut pins: [P; DIGIT_COUNT]) -> Self {
        for pin in &mut pins {
            let _ = pin.set_low();
        }
        Self { pins }
    }
}

impl<P: OutputPin> DigitSelect for DirectSelect<P> {
    fn select(&mut self, index: u8) {
        for (i, pin) in self.pins.iter_mut().enumerate() {
            if i == index as usize {
                let _ = pin.set_high();
            } else {
                let _ = pin.set_low();
            }
        }
    }
}
