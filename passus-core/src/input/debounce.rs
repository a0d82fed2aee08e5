//! Push button debouncing with press/release edge tracking
//!
//! `sample()` is called once per loop tick with the raw (already
//! polarity-corrected) pin level. A level change is committed only once
//! the debounce window has elapsed since the previous committed change.
//! The release edge is read-and-clear: it is observable exactly once per
//! completed press/release cycle, and `handled()` lets the caller consume
//! a press early so its release never fires.

use super::DEBOUNCE_MS;

/// Debounced push button state.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    /// Committed (stable) pressed level
    pressed: bool,
    /// Timestamp of the last committed level change
    changed_at: u64,
    /// Timestamp of the last committed press
    pressed_at: u64,
    /// Timestamp of the last committed release (0 while pressed)
    released_at: u64,
    /// Pending release edge, cleared on read
    release_pending: bool,
    /// Current press was consumed via `handled()`
    handled: bool,
}

impl Debouncer {
    /// Create a debouncer in the released state.
    pub const fn new() -> Self {
        Self {
            pressed: false,
            changed_at: 0,
            pressed_at: 0,
            released_at: 0,
            release_pending: false,
            handled: false,
        }
    }

    /// Sample the raw input level.
    ///
    /// Call once per loop tick. Commits a level change only if the raw
    /// level differs from the stable level and more than `DEBOUNCE_MS`
    /// has elapsed since the previous committed change.
    pub fn sample(&mut self, now: u64, raw_pressed: bool) {
        if raw_pressed == self.pressed || now.wrapping_sub(self.changed_at) <= DEBOUNCE_MS {
            return;
        }

        if raw_pressed {
            self.pressed_at = now;
            self.released_at = 0;
            self.release_pending = false;
        } else {
            // A press consumed via handled() produces no release edge.
            self.release_pending = !self.handled;
            self.released_at = now;
            self.handled = false;
        }
        self.changed_at = now;
        self.pressed = raw_pressed;
    }

    /// Current stable pressed state.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Edge-triggered release, read-and-clear.
    ///
    /// Returns true exactly once per stable press-to-release transition.
    pub fn is_released(&mut self) -> bool {
        core::mem::take(&mut self.release_pending)
    }

    /// Consume the current press.
    ///
    /// While pressed, suppresses the upcoming release edge. While not
    /// pressed, clears any pending release edge instead (a stray edge
    /// from a press that was already processed).
    pub fn handled(&mut self) {
        if self.pressed {
            self.handled = true;
        } else {
            self.release_pending = false;
        }
    }

    /// Duration of the current or most recent press.
    ///
    /// Press-to-release span once released, press-to-now while still
    /// pressed.
    pub fn pressed_duration(&self, now: u64) -> u64 {
        if self.released_at != 0 {
            self.released_at - self.pressed_at
        } else {
            now.wrapping_sub(self.pressed_at)
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive a full debounced press at `t`, release at `t + held`.
    fn press_release(btn: &mut Debouncer, t: u64, held: u64) {
        btn.sample(t, true);
        btn.sample(t + held, false);
    }

    #[test]
    fn test_press_commits_after_window() {
        let mut btn = Debouncer::new();
        btn.sample(10, true);
        assert!(btn.is_pressed());
    }

    #[test]
    fn test_bounce_within_window_ignored() {
        let mut btn = Debouncer::new();
        btn.sample(10, true);
        // Release bounce 2 ms after the committed press: ignored.
        btn.sample(12, false);
        assert!(btn.is_pressed());
        assert!(!btn.is_released());
    }

    #[test]
    fn test_release_fires_exactly_once() {
        let mut btn = Debouncer::new();
        press_release(&mut btn, 10, 100);
        assert!(btn.is_released());
        assert!(!btn.is_released());
        // Polling more often changes nothing.
        assert!(!btn.is_released());
    }

    #[test]
    fn test_release_per_cycle() {
        let mut btn = Debouncer::new();
        press_release(&mut btn, 10, 100);
        assert!(btn.is_released());
        press_release(&mut btn, 300, 50);
        assert!(btn.is_released());
        assert!(!btn.is_released());
    }

    #[test]
    fn test_handled_suppresses_release() {
        let mut btn = Debouncer::new();
        btn.sample(10, true);
        btn.handled();
        btn.sample(200, false);
        assert!(!btn.is_released());
        // Next press is re-armed normally.
        press_release(&mut btn, 400, 50);
        assert!(btn.is_released());
    }

    #[test]
    fn test_handled_while_released_clears_pending_edge() {
        let mut btn = Debouncer::new();
        press_release(&mut btn, 10, 100);
        btn.handled();
        assert!(!btn.is_released());
    }

    #[test]
    fn test_pressed_duration_live_and_final() {
        let mut btn = Debouncer::new();
        btn.sample(10, true);
        assert_eq!(btn.pressed_duration(500), 490);
        btn.sample(1210, false);
        assert_eq!(btn.pressed_duration(99_999), 1200);
    }
}
