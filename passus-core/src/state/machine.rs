//! Pure state transition table
//!
//! `transition` is a total function over (state, event); events that a
//! state does not react to leave it unchanged. All side effects (display,
//! servo, persistence) live in the controller, keyed off the transitions
//! decided here.

/// Operating states of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Transient boot/reset state, leaves on the first poll
    Init,
    /// Idle, showing the step count
    SetSteps,
    /// Editing the step count with the encoder
    AdjustSteps,
    /// Walking, showing the remaining steps
    Emulate,
    /// Walking suspended, display blinking
    Paused,
    /// Walking while editing the speed
    ChangeSpeed,
    /// Step count exhausted, alerting
    Finished,
    /// Showing OFF, then sleeping
    PowerOff,
}

/// Events the controller derives from inputs and timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Boot-time setup finished
    Initialized,
    /// Button released before the long-press threshold
    ShortPress,
    /// Button released at or past the long-press threshold
    LongPress,
    /// Encoder produced a nonzero delta
    EncoderTurned,
    /// The walker consumed the last step
    StepsExhausted,
    /// No interaction for the set-mode timeout
    SetModeTimeout,
    /// No interaction for the power-off delay
    PowerOffTimeout,
    /// Button went down (used only to leave PowerOff)
    Press,
    /// External wake while sleeping
    Wake,
}

impl State {
    /// Decide the next state. Unlisted (state, event) pairs are no-ops.
    pub fn transition(self, event: Event) -> State {
        use Event::*;
        use State::*;

        match (self, event) {
            (Init, Initialized) => SetSteps,

            (SetSteps, ShortPress) => AdjustSteps,
            (SetSteps, LongPress) => Emulate,
            (SetSteps, PowerOffTimeout) => PowerOff,

            (AdjustSteps, LongPress) => Emulate,
            (AdjustSteps, SetModeTimeout) => SetSteps,

            (Emulate, ShortPress) => Paused,
            (Emulate, LongPress) => Init,
            (Emulate, EncoderTurned) => ChangeSpeed,
            (Emulate, StepsExhausted) => Finished,

            (Paused, ShortPress) => Emulate,
            (Paused, LongPress) => Init,

            (ChangeSpeed, ShortPress) => Paused,
            (ChangeSpeed, LongPress) => Init,
            (ChangeSpeed, SetModeTimeout) => Emulate,
            (ChangeSpeed, StepsExhausted) => Finished,

            (Finished, ShortPress) | (Finished, LongPress) => Init,
            (Finished, PowerOffTimeout) => PowerOff,

            (PowerOff, Press) | (PowerOff, Wake) => Init,

            _ => self,
        }
    }

    /// Whether the walker runs in this state.
    pub fn walking(self) -> bool {
        matches!(self, State::Emulate | State::ChangeSpeed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_to_finished() {
        let mut state = State::Init;
        for (event, expect) in [
            (Event::Initialized, State::SetSteps),
            (Event::ShortPress, State::AdjustSteps),
            (Event::LongPress, State::Emulate),
            (Event::StepsExhausted, State::Finished),
            (Event::ShortPress, State::Init),
        ] {
            state = state.transition(event);
            assert_eq!(state, expect);
        }
    }

    #[test]
    fn test_pause_resume() {
        let state = State::Emulate.transition(Event::ShortPress);
        assert_eq!(state, State::Paused);
        assert_eq!(state.transition(Event::ShortPress), State::Emulate);
    }

    #[test]
    fn test_speed_edit_times_out_back_to_emulate() {
        let state = State::Emulate.transition(Event::EncoderTurned);
        assert_eq!(state, State::ChangeSpeed);
        assert_eq!(state.transition(Event::SetModeTimeout), State::Emulate);
    }

    #[test]
    fn test_long_press_aborts_session() {
        for state in [State::Emulate, State::Paused, State::ChangeSpeed] {
            assert_eq!(state.transition(Event::LongPress), State::Init);
        }
    }

    #[test]
    fn test_idle_paths_to_power_off() {
        assert_eq!(
            State::SetSteps.transition(Event::PowerOffTimeout),
            State::PowerOff
        );
        assert_eq!(
            State::Finished.transition(Event::PowerOffTimeout),
            State::PowerOff
        );
        // Walking states never idle out.
        assert_eq!(
            State::Emulate.transition(Event::PowerOffTimeout),
            State::Emulate
        );
    }

    #[test]
    fn test_power_off_wakes_to_init() {
        assert_eq!(State::PowerOff.transition(Event::Press), State::Init);
        assert_eq!(State::PowerOff.transition(Event::Wake), State::Init);
    }

    #[test]
    fn test_unhandled_events_keep_state() {
        assert_eq!(State::SetSteps.transition(Event::StepsExhausted), State::SetSteps);
        assert_eq!(State::Paused.transition(Event::EncoderTurned), State::Paused);
        assert_eq!(State::Finished.transition(Event::SetModeTimeout), State::Finished);
    }

    #[test]
    fn test_walking_states() {
        assert!(State::Emulate.walking());
        assert!(State::ChangeSpeed.walking());
        assert!(!State::Paused.walking());
        assert!(!State::Finished.walking());
    }
}
