//! Passus - Step Emulator Firmware
//!
//! Main firmware binary for RP2040-based step emulation devices.
//!
//! Named after the Latin "passus" (a pace, a step) - the device drives
//! a hobby servo through walking motions while counting down a step
//! budget on a 5-digit multiplexed LED display.
//!
//! Structure: a GPIO interrupt task feeds encoder pulses into a shared
//! accumulator; the main loop runs at the display dwell period, sampling
//! the button, polling the state machine, and refreshing one digit per
//! tick.

#![no_std]
#![no_main]

use core::cell::RefCell;

use critical_section::Mutex;
use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::{Duration, Instant, Ticker};
use fixed::traits::ToFixed;
use {defmt_rtt as _, panic_probe as _};

use passus_core::config::{Config, ConfigStore, EditSession};
use passus_core::display::{glyphs, DisplayBackend, DisplayDriver, MIN_DIGIT_DWELL_MS};
use passus_core::input::{Debouncer, EncoderAccumulator, Pulse, SATURATION_CLICKS};
use passus_core::state::{Controller, Hardware};
use passus_core::traits::{Buzzer, PowerControl, ServoActuator};
use passus_drivers::buzzer::GpioBuzzer;
use passus_drivers::display::{RippleCounterSelect, ShiftRegisterBackend};
use passus_drivers::servo::{PwmServo, FRAME_US};

use crate::power::BoardPower;
use crate::store::FlashConfigStore;

mod power;
mod store;

/// Long-press threshold used before the stored record is trusted (boot
/// window and config editor).
const EDITOR_LONG_PRESS_MS: u64 = 1000;

/// Length of the power-on window watching for the edit-mode press.
const BOOT_WINDOW_MS: u64 = 1000;

/// Buzzer self-test duration at the very start of the boot window.
const BUZZER_TEST_MS: u64 = 200;

/// Encoder state shared between the pulse interrupt task and the loop.
struct EncoderShared {
    acc: EncoderAccumulator,
    /// Pending audible clicks from saturated pulses
    saturated: u8,
}

static ENCODER: Mutex<RefCell<EncoderShared>> = Mutex::new(RefCell::new(EncoderShared {
    acc: EncoderAccumulator::new(),
    saturated: 0,
}));

/// Drain the encoder delta and any pending saturation clicks.
fn drain_encoder() -> (i8, u8) {
    critical_section::with(|cs| {
        let mut shared = ENCODER.borrow_ref_mut(cs);
        let delta = shared.acc.take();
        let clicks = core::mem::take(&mut shared.saturated);
        (delta, clicks.min(SATURATION_CLICKS))
    })
}

/// Record encoder pulses on the phase-A falling edge.
#[embassy_executor::task]
async fn encoder_task(mut phase_a: Input<'static>, phase_b: Input<'static>) {
    loop {
        phase_a.wait_for_falling_edge().await;
        let now = Instant::now().as_millis();
        let ccw = phase_b.is_high();
        critical_section::with(|cs| {
            let mut shared = ENCODER.borrow_ref_mut(cs);
            if shared.acc.record_pulse(now, ccw) == Pulse::Saturated {
                shared.saturated = shared.saturated.saturating_add(SATURATION_CLICKS);
            }
        });
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Passus firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Display: shift register on GP2-5, CD4017 digit counter on GP6/7
    let select = RippleCounterSelect::new(
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_7, Level::Low),
    );
    let mut backend = ShiftRegisterBackend::new(
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_3, Level::Low),
        Output::new(p.PIN_4, Level::Low),
        Output::new(p.PIN_5, Level::High),
        select,
    );

    // Servo: 50 Hz PWM on GP8 (slice 4 output A).
    // 125 MHz / 125 = 1 MHz count rate, so duty is in microseconds.
    let mut pwm_config = PwmConfig::default();
    pwm_config.divider = 125.to_fixed();
    pwm_config.top = (FRAME_US - 1) as u16;
    let pwm = Pwm::new_output_a(p.PWM_SLICE4, p.PIN_8, pwm_config);
    let (servo_channel, _) = pwm.split();
    let mut servo = PwmServo::new(
        servo_channel.unwrap(),
        Config::default().servo_down_position,
    );

    // Buzzer on GP9
    let mut buzzer = GpioBuzzer::new_active_high(
        Output::new(p.PIN_9, Level::Low),
        embassy_time::Delay,
    );

    // Encoder on GP10/11, push button on GP12, rail gate on GP13
    let phase_a = Input::new(p.PIN_10, Pull::Up);
    let phase_b = Input::new(p.PIN_11, Pull::Up);
    let wake = Input::new(p.PIN_12, Pull::Up);
    let mut power = BoardPower::new(Output::new(p.PIN_13, Level::High), wake);
    power.power_on();

    let mut store = FlashConfigStore::new(p.FLASH);
    let mut button = Debouncer::new();

    spawner.spawn(encoder_task(phase_a, phase_b)).unwrap();
    info!("Peripherals initialized");

    // Boot window: buzzer self-test, and a long press held through
    // power-on drops into the raw config editor before the record is
    // loaded. The window lasts one second or as long as the button is
    // held.
    let mut edit_mode = false;
    {
        let mut disp = DisplayDriver::new();
        disp.lamp_test();
        let mut ticker = Ticker::every(Duration::from_millis(MIN_DIGIT_DWELL_MS));
        loop {
            let now = Instant::now().as_millis();
            if now >= BOOT_WINDOW_MS && !power.button_pressed() {
                break;
            }
            button.sample(now, power.button_pressed());
            if now <= BUZZER_TEST_MS {
                buzzer.ring();
            } else {
                buzzer.mute();
            }
            if !edit_mode
                && button.is_pressed()
                && button.pressed_duration(now) > EDITOR_LONG_PRESS_MS
            {
                edit_mode = true;
                for (i, pattern) in glyphs::EDIT_BARS.iter().enumerate() {
                    disp.write_raw(i as u8, *pattern);
                }
                button.handled();
            }
            disp.render_next_digit(&mut backend, now);
            ticker.next().await;
        }
    }
    // Drop any press left over from the boot window.
    button.handled();

    if edit_mode {
        run_config_editor(
            &mut backend,
            &mut servo,
            &mut buzzer,
            &mut store,
            &mut button,
            &power,
        )
        .await;
        store.flush();
    }

    let config = Config::load(&mut store);
    info!(
        "Config loaded: {} steps at speed {}",
        config.steps_init, config.speed_init
    );

    let mut controller = Controller::new(config, Instant::now().as_millis());
    let mut ticker = Ticker::every(Duration::from_millis(MIN_DIGIT_DWELL_MS));

    info!("Entering main loop");
    loop {
        let now = Instant::now().as_millis();
        button.sample(now, power.button_pressed());

        let (delta, clicks) = drain_encoder();
        for _ in 0..clicks {
            buzzer.click();
        }

        let mut hw = Hardware {
            servo: &mut servo,
            buzzer: &mut buzzer,
            power: &mut power,
            store: &mut store,
        };
        controller.poll(now, &mut button, delta, &mut hw);

        store.flush();
        controller.render(&mut backend, now);
        ticker.next().await;
    }
}

/// Boot-time address/value editor over the persisted record.
///
/// Hex address on the left, decimal value on the right. Short press
/// toggles which half the encoder edits, long press commits the byte
/// under edit and exits.
async fn run_config_editor<BE, S, B, C>(
    backend: &mut BE,
    servo: &mut S,
    buzzer: &mut B,
    store: &mut C,
    button: &mut Debouncer,
    power: &BoardPower<'_>,
) where
    BE: DisplayBackend,
    S: ServoActuator,
    B: Buzzer,
    C: ConfigStore,
{
    info!("Entering config edit mode");
    let mut disp = DisplayDriver::new();
    let mut ticker = Ticker::every(Duration::from_millis(MIN_DIGIT_DWELL_MS));

    let mut session = EditSession::begin(store);
    disp.write_addr_value(session.address(), session.value());
    disp.set_cursor(session.cursor_digit());
    disp.show_cursor();

    // The record opens on the servo fields; preview them immediately.
    if let Some(degrees) = session.servo_preview() {
        servo.set_position(degrees);
        servo.attach();
    }

    loop {
        let now = Instant::now().as_millis();
        button.sample(now, power.button_pressed());

        if button.is_released() {
            if button.pressed_duration(now) > EDITOR_LONG_PRESS_MS {
                session.commit(store);
                break;
            }
            session.toggle_focus();
            disp.set_cursor(session.cursor_digit());
        } else {
            let (delta, clicks) = drain_encoder();
            for _ in 0..clicks {
                buzzer.click();
            }
            if delta != 0 {
                if session.apply_encoder(delta, store) {
                    buzzer.click();
                }
                disp.write_addr_value(session.address(), session.value());
                // Live preview while the servo extremes are under edit.
                if let Some(degrees) = session.servo_preview() {
                    servo.set_position(degrees);
                    servo.attach();
                } else {
                    servo.detach();
                }
            }
        }

        disp.render_next_digit(backend, now);
        ticker.next().await;
    }

    servo.detach();
    buzzer.mute();
    info!("Config edit committed");
}
