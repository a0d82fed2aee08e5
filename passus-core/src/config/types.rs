//! Configuration type definition
//!
//! The record is loaded once at boot, mutated only through the boot-time
//! edit mode (or the AdjustSteps commit), and persisted field by field.
//! Delay fields keep their stored units; the `*_ms` accessors convert.

/// Machine configuration, mirroring the persisted 16-byte record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Servo position with the foot down (degrees)
    pub servo_down_position: u8,
    /// Servo position with the foot up (degrees)
    pub servo_up_position: u8,
    /// Step count preloaded at the start of a session
    pub steps_init: u16,
    /// Lowest settable step count
    pub steps_min: u16,
    /// Highest settable step count
    pub steps_max: u16,
    /// Default speed (steps per minute)
    pub speed_init: u8,
    /// Lowest settable speed
    pub speed_min: u8,
    /// Highest settable speed
    pub speed_max: u8,
    /// Up/down dwell ratio, kept for layout compatibility (unused)
    pub step_ratio: u8,
    /// Long-press threshold (units of 100 ms)
    pub long_press_delay: u8,
    /// Set-mode idle timeout (units of 100 ms)
    pub set_mode_timeout: u8,
    /// Idle delay before the OFF message (seconds)
    pub power_off_delay: u8,
    /// Delay from the OFF message to actual sleep (units of 100 ms)
    pub post_message_delay: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            servo_down_position: 22,
            servo_up_position: 130,
            steps_init: 1000,
            steps_min: 10,
            steps_max: 20_000,
            speed_init: 100,
            speed_min: 16,
            speed_max: 255,
            step_ratio: 50,
            long_press_delay: 10,
            set_mode_timeout: 15,
            power_off_delay: 60,
            post_message_delay: 50,
        }
    }
}

impl Config {
    /// Long-press threshold in milliseconds.
    pub fn long_press_ms(&self) -> u64 {
        self.long_press_delay as u64 * 100
    }

    /// Set-mode idle timeout in milliseconds.
    pub fn set_mode_timeout_ms(&self) -> u64 {
        self.set_mode_timeout as u64 * 100
    }

    /// Idle delay before power-off in milliseconds.
    pub fn power_off_delay_ms(&self) -> u64 {
        self.power_off_delay as u64 * 1000
    }

    /// OFF-message-to-sleep delay in milliseconds.
    pub fn post_message_delay_ms(&self) -> u64 {
        self.post_message_delay as u64 * 100
    }
}
