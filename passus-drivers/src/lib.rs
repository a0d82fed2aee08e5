//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the seams defined in
//! passus-core over embedded-hal 1.0 pins and PWM channels:
//!
//! - Display backend (shift register + digit selection variants)
//! - Hobby servo on a PWM channel
//! - GPIO buzzer
//!
//! Everything here is board-agnostic; the firmware crate picks concrete
//! pins and channels.

#![no_std]
#![deny(unsafe_code)]

pub mod buzzer;
pub mod display;
pub mod servo;
