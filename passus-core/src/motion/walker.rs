//! Walking cadence generator
//!
//! A step is one full foot cycle: servo up, then servo down. The down
//! half-step is where the step counts off, so a session interrupted
//! mid-cycle never loses a step. Cadence is derived from the speed in
//! steps per minute: each half step lasts `30_000 / speed` ms.

use crate::config::Config;
use crate::display::{DisplayDriver, DOT_FOOT};
use crate::state::Session;
use crate::traits::ServoActuator;

/// Half-step period numerator: 60 000 ms per minute, two half steps per
/// step.
pub const HALF_STEP_NUMERATOR_MS: u64 = 30_000;

/// Cadence and foot state of the walking motion.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Walker {
    /// Deadline of the next half step
    next_half_step_at: u64,
    /// Foot currently raised
    foot_up: bool,
    /// Servo attached and cadence running
    walking: bool,
}

impl Walker {
    pub const fn new() -> Self {
        Self {
            next_half_step_at: 0,
            foot_up: false,
            walking: false,
        }
    }

    pub fn is_walking(&self) -> bool {
        self.walking
    }

    /// Stop the cadence and release the servo.
    pub fn stop<S: ServoActuator>(&mut self, servo: &mut S) {
        if self.walking {
            servo.detach();
        }
        self.walking = false;
        self.foot_up = false;
    }

    /// Advance the cadence. Call once per loop tick while in a walking
    /// state.
    ///
    /// Attaches the servo on the first call of a session and detaches it
    /// when the last step lands. Returns true once the step count is
    /// exhausted. `refresh_readout` keeps the remaining-steps readout
    /// current after each landed step (off while the display shows the
    /// speed instead).
    pub fn tick<S: ServoActuator>(
        &mut self,
        now: u64,
        session: &mut Session,
        cfg: &Config,
        servo: &mut S,
        display: &mut DisplayDriver,
        refresh_readout: bool,
    ) -> bool {
        if session.steps_remaining == 0 {
            return true;
        }

        if !self.walking {
            self.walking = true;
            self.foot_up = false;
            self.next_half_step_at = now;
            servo.attach();
        }

        if now >= self.next_half_step_at {
            let period = HALF_STEP_NUMERATOR_MS / session.speed.max(1) as u64;
            self.next_half_step_at = now + period;
            self.foot_up = !self.foot_up;
            display.write_dot(DOT_FOOT, self.foot_up);

            if self.foot_up {
                servo.set_position(cfg.servo_up_position);
            } else {
                servo.set_position(cfg.servo_down_position);
                session.steps_remaining -= 1;
                if refresh_readout {
                    display.show_steps(session.steps_remaining);
                }
                if session.steps_remaining == 0 {
                    self.stop(servo);
                    return true;
                }
            }
        }
        false
    }
}

impl Default for Walker {
    fn default() -> Self {
        Self::new()
    }
}
