//! Hobby servo on a PWM channel
//!
//! Standard RC servo timing: 50 Hz frame, pulse width between 544 and
//! 2400 us across the 0-180 degree range. Detaching drops the pulse
//! entirely, which lets an analog servo go limp instead of holding
//! torque against the mechanism.

use embedded_hal::pwm::SetDutyCycle;

use passus_core::traits::ServoActuator;

/// PWM frame period in microseconds (50 Hz).
pub const FRAME_US: u32 = 20_000;

/// Pulse width at 0 degrees.
pub const MIN_PULSE_US: u32 = 544;

/// Pulse width at 180 degrees.
pub const MAX_PULSE_US: u32 = 2400;

/// Servo driver over any [`SetDutyCycle`] channel configured for 50 Hz.
pub struct PwmServo<P> {
    pwm: P,
    degrees: u8,
    attached: bool,
}

impl<P: SetDutyCycle> PwmServo<P> {
    /// Take over a channel. The servo starts detached at `initial`
    /// degrees; the first `attach` drives that position.
    pub fn new(mut pwm: P, initial: u8) -> Self {
        let _ = pwm.set_duty_cycle_fully_off();
        Self {
            pwm,
            degrees: initial,
            attached: false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn drive(&mut self) {
        let span = self.degrees.min(180) as u32;
        let pulse_us = MIN_PULSE_US + span * (MAX_PULSE_US - MIN_PULSE_US) / 180;
        let max = self.pwm.max_duty_cycle() as u32;
        let duty = (max * pulse_us / FRAME_US) as u16;
        let _ = self.pwm.set_duty_cycle(duty);
    }
}

impl<P: SetDutyCycle> ServoActuator for PwmServo<P> {
    fn attach(&mut self) {
        self.attached = true;
        self.drive();
    }

    fn detach(&mut self) {
        self.attached = false;
        let _ = self.pwm.set_duty_cycle_fully_off();
    }

    fn set_position(&mut self, degrees: u8) {
        self.degrees = degrees;
        if self.attached {
            self.drive();
        }
    }
}
