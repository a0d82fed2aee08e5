//! Per-session working values
//!
//! The remaining step count and speed live here, separate from the
//! persisted [`Config`]: a session starts from the configured defaults
//! and is edited freely without touching the store. The interaction
//! timestamp feeds the idle timeouts.

use crate::config::Config;
use crate::display::CURSOR_MAX;

/// Working values of one walking session.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    /// Steps left to walk
    pub steps_remaining: u16,
    /// Walking speed, steps per minute
    pub speed: u8,
    /// Timestamp of the last user interaction
    pub last_interaction_at: u64,
}

impl Session {
    pub fn new(cfg: &Config, now: u64) -> Self {
        Self {
            steps_remaining: cfg.steps_init,
            speed: cfg.speed_init,
            last_interaction_at: now,
        }
    }

    /// Reload the configured defaults (Init entry).
    pub fn reset(&mut self, cfg: &Config, now: u64) {
        self.steps_remaining = cfg.steps_init;
        self.speed = cfg.speed_init;
        self.last_interaction_at = now;
    }

    /// Record a user interaction, rearming the idle timeouts.
    pub fn touch(&mut self, now: u64) {
        self.last_interaction_at = now;
    }

    /// Time since the last interaction.
    pub fn idle_for(&self, now: u64) -> u64 {
        now.wrapping_sub(self.last_interaction_at)
    }

    /// Apply an encoder delta to the step count, scaled by the cursor
    /// decade: a click at decade `d` moves the count by 10^d.
    ///
    /// The result is clamped to `steps_min..=steps_max`; returns true
    /// when the clamp engaged.
    pub fn adjust_steps(&mut self, delta: i8, decade: u8, cfg: &Config) -> bool {
        if delta == 0 {
            return false;
        }
        let rank = 10u16.pow(decade.min(CURSOR_MAX) as u32);
        let magnitude = delta.unsigned_abs() as u16;
        // Guarding on steps_max/rank keeps magnitude * rank in range.
        let change = if magnitude > cfg.steps_max / rank {
            cfg.steps_max
        } else {
            magnitude * rank
        };

        if delta > 0 {
            if cfg.steps_max - self.steps_remaining < change {
                self.steps_remaining = cfg.steps_max;
                true
            } else {
                self.steps_remaining += change;
                false
            }
        } else if self.steps_remaining.saturating_sub(cfg.steps_min) < change {
            self.steps_remaining = cfg.steps_min;
            true
        } else {
            self.steps_remaining -= change;
            false
        }
    }

    /// Apply an encoder delta to the speed, clamped to
    /// `speed_min..=speed_max`; returns true when the clamp engaged.
    pub fn adjust_speed(&mut self, delta: i8, cfg: &Config) -> bool {
        if delta == 0 {
            return false;
        }
        if delta > 0 {
            let magnitude = delta as u8;
            if cfg.speed_max - self.speed < magnitude {
                self.speed = cfg.speed_max;
                true
            } else {
                self.speed += magnitude;
                false
            }
        } else {
            let magnitude = delta.unsigned_abs();
            if self.speed.saturating_sub(cfg.speed_min) < magnitude {
                self.speed = cfg.speed_min;
                true
            } else {
                self.speed -= magnitude;
                false
            }
        }
    }
}
