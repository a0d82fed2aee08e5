//! State machine orchestration
//!
//! The controller owns the display buffer, the session values and the
//! walker, and turns the per-tick inputs (debounced button, drained
//! encoder delta, current time) into transitions plus their side
//! effects. Actuators and the config store are borrowed per call through
//! [`Hardware`] so the whole thing runs unchanged on the host.

use crate::config::{Config, ConfigStore};
use crate::display::{glyphs, DisplayBackend, DisplayDriver, CURSOR_MAX, DOT_LONG_PRESS};
use crate::input::Debouncer;
use crate::motion::Walker;
use crate::traits::{Buzzer, PowerControl, ServoActuator};

use super::machine::{Event, State};
use super::session::Session;

/// Blink period for the paused display and the finished alert (ms).
pub const BLINK_PERIOD_MS: u64 = 500;

/// Dark (and ringing) portion at the start of each blink period (ms).
pub const BLINK_ON_MS: u64 = 250;

/// Actuators and storage borrowed for one `poll` call.
pub struct Hardware<'a, S, B, P, C>
where
    S: ServoActuator,
    B: Buzzer,
    P: PowerControl,
    C: ConfigStore,
{
    pub servo: &'a mut S,
    pub buzzer: &'a mut B,
    pub power: &'a mut P,
    pub store: &'a mut C,
}

/// Top-level machine behavior.
pub struct Controller {
    state: State,
    config: Config,
    session: Session,
    walker: Walker,
    display: DisplayDriver,
}

impl Controller {
    pub fn new(config: Config, now: u64) -> Self {
        let session = Session::new(&config, now);
        Self {
            state: State::Init,
            config,
            session,
            walker: Walker::new(),
            display: DisplayDriver::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn display(&self) -> &DisplayDriver {
        &self.display
    }

    /// Direct display access, for the boot sequence (lamp test, config
    /// edit readout) before the state machine takes over.
    pub fn display_mut(&mut self) -> &mut DisplayDriver {
        &mut self.display
    }

    /// Refresh one display digit. Call once per loop tick, after `poll`.
    pub fn render<BE: DisplayBackend>(&mut self, backend: &mut BE, now: u64) {
        self.display.render_next_digit(backend, now);
    }

    /// Advance the machine by one tick.
    ///
    /// `encoder_delta` is the drained accumulator value for this tick;
    /// the button must have been sampled for this `now` already.
    pub fn poll<S, B, P, C>(
        &mut self,
        now: u64,
        button: &mut Debouncer,
        encoder_delta: i8,
        hw: &mut Hardware<'_, S, B, P, C>,
    ) where
        S: ServoActuator,
        B: Buzzer,
        P: PowerControl,
        C: ConfigStore,
    {
        // Feedback dot while a press is crossing the long-press threshold.
        let held_long =
            button.is_pressed() && button.pressed_duration(now) > self.config.long_press_ms();
        self.display.write_dot(DOT_LONG_PRESS, held_long);

        match self.state {
            State::Init => {
                hw.buzzer.mute();
                self.walker.stop(hw.servo);
                if button.is_pressed() {
                    button.handled();
                }
                self.session.reset(&self.config, now);
                self.display.clear();
                self.display.hide_cursor();
                self.display.set_leading_zeros(false);
                self.display.set_blank(false);
                self.enter(State::Init.transition(Event::Initialized), now, hw.buzzer);
            }

            State::SetSteps => {
                if button.is_released() {
                    let event = self.press_event(button, now);
                    self.enter(self.state.transition(event), now, hw.buzzer);
                } else if self.session.idle_for(now) > self.config.power_off_delay_ms() {
                    let next = self.state.transition(Event::PowerOffTimeout);
                    self.enter(next, now, hw.buzzer);
                }
            }

            State::AdjustSteps => {
                if button.is_released() {
                    if self.press_event(button, now) == Event::LongPress {
                        // Commit the edited count as the new power-on default.
                        self.config.steps_init = self.session.steps_remaining;
                        Config::persist_steps_init(hw.store, self.config.steps_init);
                        let next = self.state.transition(Event::LongPress);
                        self.enter(next, now, hw.buzzer);
                    } else {
                        self.display.move_cursor(false);
                        self.session.touch(now);
                    }
                } else if encoder_delta != 0 {
                    let decade = self.display.cursor();
                    self.session.adjust_steps(encoder_delta, decade, &self.config);
                    self.display.show_steps(self.session.steps_remaining);
                    self.session.touch(now);
                } else if self.session.idle_for(now) > self.config.set_mode_timeout_ms() {
                    self.display.hide_cursor();
                    let next = self.state.transition(Event::SetModeTimeout);
                    self.enter(next, now, hw.buzzer);
                }
            }

            State::Emulate => {
                if button.is_released() {
                    let event = self.press_event(button, now);
                    if event == Event::LongPress {
                        self.walker.stop(hw.servo);
                    }
                    self.enter(self.state.transition(event), now, hw.buzzer);
                } else if encoder_delta != 0 {
                    // The first click only opens the speed readout.
                    let next = self.state.transition(Event::EncoderTurned);
                    self.enter(next, now, hw.buzzer);
                } else if self.walker.tick(
                    now,
                    &mut self.session,
                    &self.config,
                    hw.servo,
                    &mut self.display,
                    true,
                ) {
                    let next = self.state.transition(Event::StepsExhausted);
                    self.enter(next, now, hw.buzzer);
                }
            }

            State::ChangeSpeed => {
                if button.is_released() {
                    let event = self.press_event(button, now);
                    if event == Event::LongPress {
                        self.walker.stop(hw.servo);
                    } else {
                        // Pausing drops back to the steps readout.
                        self.display.hide_cursor();
                        self.display.show_steps(self.session.steps_remaining);
                    }
                    self.enter(self.state.transition(event), now, hw.buzzer);
                } else if self.walker.tick(
                    now,
                    &mut self.session,
                    &self.config,
                    hw.servo,
                    &mut self.display,
                    false,
                ) {
                    // Walking outranks the knob: exhaustion must land even
                    // under continuous rotation.
                    let next = self.state.transition(Event::StepsExhausted);
                    self.enter(next, now, hw.buzzer);
                } else if encoder_delta != 0 {
                    if self.session.adjust_speed(encoder_delta, &self.config) {
                        hw.buzzer.click();
                    }
                    self.display.show_speed(self.session.speed);
                    self.session.touch(now);
                } else if self.session.idle_for(now) > self.config.set_mode_timeout_ms() {
                    let next = self.state.transition(Event::SetModeTimeout);
                    self.enter(next, now, hw.buzzer);
                }
            }

            State::Paused => {
                if button.is_released() {
                    let event = self.press_event(button, now);
                    if event == Event::LongPress {
                        self.walker.stop(hw.servo);
                    }
                    self.display.set_blank(false);
                    self.enter(self.state.transition(event), now, hw.buzzer);
                } else {
                    self.display.set_blank(now % BLINK_PERIOD_MS < BLINK_ON_MS);
                }
            }

            State::Finished => {
                if button.is_released() {
                    hw.buzzer.mute();
                    self.display.set_blank(false);
                    let event = self.press_event(button, now);
                    self.enter(self.state.transition(event), now, hw.buzzer);
                } else if self.session.idle_for(now) > self.config.power_off_delay_ms() {
                    let next = self.state.transition(Event::PowerOffTimeout);
                    self.enter(next, now, hw.buzzer);
                } else if now % BLINK_PERIOD_MS < BLINK_ON_MS {
                    self.display.set_blank(true);
                    hw.buzzer.ring();
                } else {
                    self.display.set_blank(false);
                    hw.buzzer.mute();
                }
            }

            State::PowerOff => {
                if button.is_pressed() {
                    button.handled();
                    hw.power.power_on();
                    self.enter(self.state.transition(Event::Press), now, hw.buzzer);
                } else if self.session.idle_for(now) > self.config.post_message_delay_ms() {
                    self.display.set_blank(true);
                    // Wait for the blank to latch so the display is dark
                    // before the rails drop.
                    if self.display.output_is_off() {
                        self.walker.stop(hw.servo);
                        hw.buzzer.mute();
                        hw.power.power_off();
                        hw.power.sleep_until_wake();
                        hw.power.power_on();
                        self.enter(self.state.transition(Event::Wake), now, hw.buzzer);
                    }
                }
            }
        }
    }

    /// Classify a completed press by its held duration.
    fn press_event(&self, button: &Debouncer, now: u64) -> Event {
        if button.pressed_duration(now) > self.config.long_press_ms() {
            Event::LongPress
        } else {
            Event::ShortPress
        }
    }

    /// Switch state, running the target's entry actions.
    fn enter<B: Buzzer>(&mut self, next: State, now: u64, buzzer: &mut B) {
        match next {
            State::SetSteps => {
                self.display.show_steps(self.session.steps_remaining);
                self.display.set_cursor(CURSOR_MAX);
            }
            State::AdjustSteps => self.display.show_cursor(),
            State::Emulate => {
                self.display.hide_cursor();
                self.display.show_steps(self.session.steps_remaining);
            }
            State::ChangeSpeed => self.display.show_speed(self.session.speed),
            State::Finished => {
                self.display.hide_cursor();
                self.display.set_leading_zeros(true);
                self.display.show_steps(self.session.steps_remaining);
            }
            State::PowerOff => {
                buzzer.mute();
                self.show_off_message();
            }
            State::Init | State::Paused => {}
        }
        self.session.touch(now);
        self.state = next;
    }

    fn show_off_message(&mut self) {
        self.display.clear();
        self.display.hide_cursor();
        self.display.set_blank(false);
        self.display.write_raw(2, glyphs::LETTER_O);
        self.display.write_raw(1, glyphs::LETTER_F);
        self.display.write_raw(0, glyphs::LETTER_F);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStore;
    use crate::display::glyphs::SEGMENTS;
    use crate::display::{DOT_SPEED, DOT_STEP};

    #[derive(Default)]
    struct MockServo {
        attached: bool,
        position: Option<u8>,
        detaches: usize,
    }

    impl ServoActuator for MockServo {
        fn attach(&mut self) {
            self.attached = true;
        }
        fn detach(&mut self) {
            self.attached = false;
            self.detaches += 1;
        }
        fn set_position(&mut self, degrees: u8) {
            self.position = Some(degrees);
        }
    }

    #[derive(Default)]
    struct MockBuzzer {
        ringing: bool,
        clicks: usize,
    }

    impl Buzzer for MockBuzzer {
        fn ring(&mut self) {
            self.ringing = true;
        }
        fn mute(&mut self) {
            self.ringing = false;
        }
        fn click(&mut self) {
            self.clicks += 1;
        }
    }

    struct MockPower {
        on: bool,
        offs: usize,
        sleeps: usize,
    }

    impl Default for MockPower {
        fn default() -> Self {
            Self {
                on: true,
                offs: 0,
                sleeps: 0,
            }
        }
    }

    impl PowerControl for MockPower {
        fn power_on(&mut self) {
            self.on = true;
        }
        fn power_off(&mut self) {
            self.on = false;
            self.offs += 1;
        }
        fn sleep_until_wake(&mut self) {
            self.sleeps += 1;
        }
    }

    struct NullBackend;

    impl DisplayBackend for NullBackend {
        fn output_enable(&mut self, _on: bool) {}
        fn select_digit(&mut self, _index: u8) {}
        fn shift_pattern(&mut self, _pattern: u8) {}
    }

    /// Test rig driving the controller against mock hardware.
    struct Rig {
        ctl: Controller,
        button: Debouncer,
        servo: MockServo,
        buzzer: MockBuzzer,
        power: MockPower,
        store: MemoryStore,
        now: u64,
    }

    impl Rig {
        fn new() -> Self {
            let mut store = MemoryStore::new();
            let config = Config::load(&mut store);
            config.save(&mut store);
            Self {
                ctl: Controller::new(config, 0),
                button: Debouncer::new(),
                servo: MockServo::default(),
                buzzer: MockBuzzer::default(),
                power: MockPower::default(),
                store,
                now: 0,
            }
        }

        /// Boot straight into SetSteps.
        fn booted() -> Self {
            let mut rig = Self::new();
            rig.poll(0);
            assert_eq!(rig.ctl.state(), State::SetSteps);
            rig
        }

        fn poll(&mut self, delta: i8) {
            let mut hw = Hardware {
                servo: &mut self.servo,
                buzzer: &mut self.buzzer,
                power: &mut self.power,
                store: &mut self.store,
            };
            self.ctl.poll(self.now, &mut self.button, delta, &mut hw);
        }

        fn tick(&mut self, ms: u64) {
            self.now += ms;
            self.poll(0);
        }

        /// Full debounced press held for `held` ms, then one poll.
        fn press_for(&mut self, held: u64) {
            // Clear of the previous edge's debounce window.
            self.now += 10;
            self.button.sample(self.now, true);
            self.now += held;
            self.button.sample(self.now, false);
            self.poll(0);
        }

        fn short_press(&mut self) {
            self.press_for(100);
        }

        fn long_press(&mut self) {
            self.press_for(1100);
        }
    }

    #[test]
    fn test_boot_lands_in_set_steps_showing_steps() {
        let rig = Rig::booted();
        let disp = rig.ctl.display();
        assert_eq!(disp.digit_pattern(3), SEGMENTS[1]);
        assert_eq!(disp.digit_pattern(0), SEGMENTS[0] | 0x01); // step dot
        assert!(!disp.is_cursor_visible());
        assert_eq!(disp.cursor(), CURSOR_MAX);
    }

    #[test]
    fn test_short_press_opens_adjust_with_cursor() {
        let mut rig = Rig::booted();
        rig.short_press();
        assert_eq!(rig.ctl.state(), State::AdjustSteps);
        assert!(rig.ctl.display().is_cursor_visible());
        assert_eq!(rig.ctl.display().cursor(), CURSOR_MAX);
    }

    #[test]
    fn test_long_press_starts_walking() {
        let mut rig = Rig::booted();
        rig.long_press();
        assert_eq!(rig.ctl.state(), State::Emulate);
        rig.tick(2);
        assert!(rig.servo.attached);
        assert_eq!(rig.servo.position, Some(130)); // foot up first
    }

    #[test]
    fn test_adjust_steps_by_cursor_decade() {
        let mut rig = Rig::booted();
        rig.short_press();
        rig.now += 10;
        rig.poll(2); // +2 at the thousands decade
        assert_eq!(rig.ctl.session().steps_remaining, 3000);
        rig.short_press(); // cursor to hundreds
        rig.now += 10;
        rig.poll(-1);
        assert_eq!(rig.ctl.session().steps_remaining, 2900);
    }

    #[test]
    fn test_adjust_steps_clamps_at_max() {
        let mut rig = Rig::booted();
        rig.short_press();
        rig.ctl.session.steps_remaining = 19_500;
        rig.now += 10;
        rig.poll(2);
        assert_eq!(rig.ctl.session().steps_remaining, 20_000);
    }

    #[test]
    fn test_adjust_commit_persists_new_default() {
        let mut rig = Rig::booted();
        rig.short_press();
        rig.now += 10;
        rig.poll(1); // 2000 steps
        rig.long_press();
        assert_eq!(rig.ctl.state(), State::Emulate);
        assert_eq!(rig.ctl.config().steps_init, 2000);
        assert_eq!(Config::load(&mut rig.store).steps_init, 2000);
    }

    #[test]
    fn test_adjust_idle_times_out_to_set_steps() {
        let mut rig = Rig::booted();
        rig.short_press();
        rig.tick(1501);
        assert_eq!(rig.ctl.state(), State::SetSteps);
        assert!(!rig.ctl.display().is_cursor_visible());
    }

    #[test]
    fn test_exhaustion_finishes_with_leading_zeros() {
        let mut rig = Rig::booted();
        rig.ctl.session.steps_remaining = 1;
        rig.long_press();
        rig.tick(2); // attach, foot up
        rig.tick(300); // foot down, last step lands
        assert_eq!(rig.ctl.state(), State::Finished);
        assert!(!rig.servo.attached);
        for pos in 0..5 {
            assert_eq!(rig.ctl.display().digit_pattern(pos) & 0xfe, SEGMENTS[0]);
        }
    }

    #[test]
    fn test_finished_alert_blinks_and_rings() {
        let mut rig = Rig::booted();
        rig.ctl.session.steps_remaining = 1;
        rig.long_press();
        rig.tick(2);
        rig.tick(300);
        rig.now = 10_000;
        rig.poll(0);
        assert!(rig.ctl.display().is_blanked());
        assert!(rig.buzzer.ringing);
        rig.now = 10_300;
        rig.poll(0);
        assert!(!rig.ctl.display().is_blanked());
        assert!(!rig.buzzer.ringing);
    }

    #[test]
    fn test_finished_press_restarts_session() {
        let mut rig = Rig::booted();
        rig.ctl.session.steps_remaining = 1;
        rig.long_press();
        rig.tick(2);
        rig.tick(300);
        rig.short_press();
        assert_eq!(rig.ctl.state(), State::Init);
        rig.tick(2);
        assert_eq!(rig.ctl.state(), State::SetSteps);
        assert_eq!(rig.ctl.session().steps_remaining, 1000);
    }

    #[test]
    fn test_pause_blinks_and_resumes() {
        let mut rig = Rig::booted();
        rig.long_press();
        rig.short_press();
        assert_eq!(rig.ctl.state(), State::Paused);
        rig.now = 20_000;
        rig.poll(0);
        assert!(rig.ctl.display().is_blanked());
        rig.now = 20_300;
        rig.poll(0);
        assert!(!rig.ctl.display().is_blanked());
        rig.short_press();
        assert_eq!(rig.ctl.state(), State::Emulate);
        assert!(!rig.ctl.display().is_blanked());
        // Servo held its position across the pause.
        assert_eq!(rig.servo.detaches, 0);
    }

    #[test]
    fn test_long_press_aborts_to_defaults() {
        let mut rig = Rig::booted();
        rig.long_press();
        rig.tick(2);
        rig.tick(300); // one step walked
        assert_eq!(rig.ctl.session().steps_remaining, 999);
        rig.long_press();
        assert_eq!(rig.ctl.state(), State::Init);
        assert!(!rig.servo.attached);
        rig.tick(2);
        assert_eq!(rig.ctl.state(), State::SetSteps);
        assert_eq!(rig.ctl.session().steps_remaining, 1000);
    }

    #[test]
    fn test_encoder_opens_speed_readout_without_adjusting() {
        let mut rig = Rig::booted();
        rig.long_press();
        rig.now += 10;
        rig.poll(1);
        assert_eq!(rig.ctl.state(), State::ChangeSpeed);
        assert_eq!(rig.ctl.session().speed, 100);
        let disp = rig.ctl.display();
        assert_eq!(disp.digit_pattern(1) & 0x01, 0x01); // speed dot
        assert_eq!(disp.digit_pattern(0) & 0x01, 0);
    }

    #[test]
    fn test_speed_adjust_clamps_with_click() {
        let mut rig = Rig::booted();
        rig.long_press();
        rig.now += 10;
        rig.poll(1);
        rig.now += 10;
        rig.poll(50);
        assert_eq!(rig.ctl.session().speed, 150);
        rig.now += 10;
        rig.poll(100);
        assert_eq!(rig.ctl.session().speed, 250);
        assert_eq!(rig.buzzer.clicks, 0);
        rig.now += 10;
        rig.poll(10);
        assert_eq!(rig.ctl.session().speed, 255);
        assert_eq!(rig.buzzer.clicks, 1);
    }

    #[test]
    fn test_exhaustion_lands_during_continuous_speed_adjust() {
        let mut rig = Rig::booted();
        rig.ctl.session.steps_remaining = 1;
        rig.long_press();
        rig.now += 10;
        rig.poll(1);
        assert_eq!(rig.ctl.state(), State::ChangeSpeed);
        // The knob turning on every tick must not postpone the finish.
        for _ in 0..400 {
            rig.now += 2;
            rig.poll(1);
            if rig.ctl.state() == State::Finished {
                break;
            }
        }
        assert_eq!(rig.ctl.state(), State::Finished);
        assert!(!rig.servo.attached);
    }

    #[test]
    fn test_speed_readout_times_out_back_to_steps() {
        let mut rig = Rig::booted();
        rig.long_press();
        rig.now += 10;
        rig.poll(1);
        rig.tick(1501);
        assert_eq!(rig.ctl.state(), State::Emulate);
        let disp = rig.ctl.display();
        assert_eq!(disp.digit_pattern(0) & 0x01, 0x01, "step dot restored");
    }

    #[test]
    fn test_idle_power_off_shows_off_message() {
        let mut rig = Rig::booted();
        rig.tick(60_001);
        assert_eq!(rig.ctl.state(), State::PowerOff);
        let disp = rig.ctl.display();
        assert_eq!(disp.digit_pattern(2), glyphs::LETTER_O);
        assert_eq!(disp.digit_pattern(1), glyphs::LETTER_F);
        assert_eq!(disp.digit_pattern(0), glyphs::LETTER_F);
        assert!(!rig.buzzer.ringing);
    }

    #[test]
    fn test_power_off_sleeps_after_display_goes_dark() {
        let mut rig = Rig::booted();
        rig.tick(60_001);
        rig.tick(5001); // blank requested
        assert!(rig.ctl.display().is_blanked());
        assert_eq!(rig.power.sleeps, 0);
        // The blank latches on the next frame, then the rails drop.
        rig.ctl.render(&mut NullBackend, rig.now);
        rig.tick(2);
        assert_eq!(rig.power.sleeps, 1);
        assert_eq!(rig.power.offs, 1);
        // Wake path powered back up and restarted.
        assert!(rig.power.on);
        assert_eq!(rig.ctl.state(), State::Init);
        rig.tick(2);
        assert_eq!(rig.ctl.state(), State::SetSteps);
    }

    #[test]
    fn test_power_off_press_restarts_without_sleeping() {
        let mut rig = Rig::booted();
        rig.tick(60_001);
        rig.now += 100;
        rig.button.sample(rig.now, true);
        rig.poll(0);
        assert_eq!(rig.ctl.state(), State::Init);
        assert_eq!(rig.power.sleeps, 0);
        // The press was consumed; its release must not fire later.
        rig.tick(2);
        rig.now += 500;
        rig.button.sample(rig.now, false);
        rig.poll(0);
        assert_eq!(rig.ctl.state(), State::SetSteps);
    }

    #[test]
    fn test_long_press_dot_feedback() {
        let mut rig = Rig::booted();
        rig.now += 10;
        rig.button.sample(rig.now, true);
        rig.now += 500;
        rig.poll(0);
        assert_eq!(rig.ctl.display().digit_pattern(4) & 0x01, 0);
        rig.now += 600;
        rig.poll(0);
        assert_eq!(rig.ctl.display().digit_pattern(4) & 0x01, 0x01);
        rig.button.sample(rig.now, false);
        rig.poll(0);
        assert_eq!(rig.ctl.display().digit_pattern(4) & 0x01, 0);
    }

    #[test]
    fn test_dots_swap_between_readouts() {
        let mut rig = Rig::booted();
        let disp = rig.ctl.display();
        assert_eq!(disp.digit_pattern(DOT_STEP as usize) & 0x01, 0x01);
        rig.long_press();
        rig.now += 10;
        rig.poll(1);
        let disp = rig.ctl.display();
        assert_eq!(disp.digit_pattern(DOT_SPEED as usize) & 0x01, 0x01);
        assert_eq!(disp.digit_pattern(DOT_STEP as usize) & 0x01, 0);
    }
}
