//! Board-agnostic core logic for the step emulator firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Debounced button and encoder pulse accumulation
//! - Multiplexed 5-digit LED display driver (buffer, cursor, scan logic)
//! - State machine for the emulation session
//! - Step emulation cadence (servo up/down timing)
//! - Configuration record, byte layout, and edit mode
//! - Hardware abstraction traits (servo, buzzer, power)
//!
//! All time-dependent logic is clocked by a caller-supplied millisecond
//! timestamp, so every module here is testable on the host.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod display;
pub mod input;
pub mod motion;
pub mod state;
pub mod traits;
