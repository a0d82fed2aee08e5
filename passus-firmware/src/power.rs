//! Board power rail and sleep
//!
//! One GPIO gates the rail feeding the display, servo, and buzzer; the
//! MCU itself stays powered and waits for the encoder button to come
//! back. The button pin doubles as the wake source, so this type owns
//! it and the main loop samples it from here.

use cortex_m::asm;
use embassy_rp::gpio::{Input, Output};

use passus_core::traits::PowerControl;

pub struct BoardPower<'d> {
    rail: Output<'d>,
    /// Encoder push button, active low
    wake: Input<'d>,
}

impl<'d> BoardPower<'d> {
    pub fn new(rail: Output<'d>, wake: Input<'d>) -> Self {
        Self { rail, wake }
    }

    /// Raw (undebounced) button level.
    pub fn button_pressed(&self) -> bool {
        self.wake.is_low()
    }
}

impl PowerControl for BoardPower<'_> {
    fn power_on(&mut self) {
        self.rail.set_high();
    }

    fn power_off(&mut self) {
        self.rail.set_low();
    }

    fn sleep_until_wake(&mut self) {
        while self.wake.is_high() {
            asm::wfe();
        }
    }
}
