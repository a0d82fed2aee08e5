//! GPIO buzzer
//!
//! Drives an active buzzer module through a GPIO (directly or via a
//! transistor). `click` produces the short confirmation tick used when
//! an adjustment hits its bound.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use passus_core::traits::Buzzer;

/// Click pulse width in microseconds.
pub const CLICK_US: u32 = 2000;

/// Buzzer on a GPIO, with a blocking delay for the click pulse.
pub struct GpioBuzzer<P, D> {
    pin: P,
    delay: D,
    /// If true, sounding = pin LOW
    inverted: bool,
    /// Current logical state (true = sounding)
    on: bool,
}

impl<P: OutputPin, D: DelayNs> GpioBuzzer<P, D> {
    pub fn new(pin: P, delay: D, inverted: bool) -> Self {
        let mut buzzer = Self {
            pin,
            delay,
            inverted,
            on: false,
        };
        buzzer.set(false);
        buzzer
    }

    pub fn new_active_high(pin: P, delay: D) -> Self {
        Self::new(pin, delay, false)
    }

    pub fn new_active_low(pin: P, delay: D) -> Self {
        Self::new(pin, delay, true)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    fn set(&mut self, on: bool) {
        self.on = on;
        if on != self.inverted {
            let _ = self.pin.set_high();
        } else {
            let _ = self.pin.set_low();
        }
    }
}

impl<P: OutputPin, D: DelayNs> Buzzer for GpioBuzzer<P, D> {
    fn ring(&mut self) {
        self.set(true);
    }

    fn mute(&mut self) {
        self.set(false);
    }

    fn click(&mut self) {
        let restore = self.on;
        self.set(true);
        self.delay.delay_us(CLICK_US);
        self.set(restore);
    }
}
