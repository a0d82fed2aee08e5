//! Display driver: segment buffer, cursor, and scan logic
//!
//! One digit is refreshed per `render_next_digit` call; a full frame is
//! five consecutive calls. Blanking is latched at the frame boundary so
//! a mid-frame blank never leaves a digit half lit. The caller owns the
//! per-digit dwell: nothing else in the loop may block longer than
//! [`MIN_DIGIT_DWELL_MS`] without visible flicker.

use super::backend::DisplayBackend;
use super::glyphs;

/// Number of physical digits.
pub const DIGIT_COUNT: usize = 5;

/// Highest cursor position (the cursor spans the editable decades only).
pub const CURSOR_MAX: u8 = 3;

/// Cursor blink period (ms); the cursor is drawn during the first half.
pub const CURSOR_BLINK_MS: u64 = 400;

/// Minimum time one digit must stay lit per refresh (ms).
pub const MIN_DIGIT_DWELL_MS: u64 = 2;

/// Decimal point annunciators, by digit index.
pub const DOT_STEP: u8 = 0;
pub const DOT_SPEED: u8 = 1;
pub const DOT_TIME: u8 = 2;
pub const DOT_FOOT: u8 = 3;
pub const DOT_LONG_PRESS: u8 = 4;

/// Buffer and scan state for the 5-digit multiplexed display.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayDriver {
    /// Segment patterns, index 0 = least significant digit
    digits: [u8; DIGIT_COUNT],
    /// Next digit to refresh
    scan_index: u8,
    cursor_pos: u8,
    cursor_visible: bool,
    /// Requested blank state, applied at the next frame boundary
    blank: bool,
    /// Latched output state for the current frame
    output_on: bool,
    leading_zeros: bool,
    /// Last numeric value written, redisplayed when leading-zero mode flips
    shown_value: Option<u32>,
}

impl DisplayDriver {
    pub const fn new() -> Self {
        Self {
            digits: [0; DIGIT_COUNT],
            scan_index: 0,
            cursor_pos: 0,
            cursor_visible: false,
            blank: false,
            output_on: true,
            leading_zeros: false,
            shown_value: None,
        }
    }

    /// Display a number, most significant digit first.
    ///
    /// Leading zero glyphs are suppressed unless leading-zero mode is on;
    /// the least significant digit is always drawn. Each digit's dp bit
    /// is preserved.
    pub fn write_value(&mut self, value: u32) {
        self.shown_value = Some(value);
        let mut suppress = !self.leading_zeros;
        let mut rank = 10_000;
        for pos in (0..DIGIT_COUNT).rev() {
            let digit = ((value / rank) % 10) as u8;
            if digit > 0 || pos == 0 {
                suppress = false;
            }
            let glyph = if suppress { 0 } else { glyphs::digit(digit) };
            self.digits[pos] = (self.digits[pos] & 0x01) | glyph;
            rank /= 10;
        }
    }

    /// Set one digit's raw segment pattern, bypassing numeric decoding.
    pub fn write_raw(&mut self, pos: u8, pattern: u8) {
        self.digits[pos as usize % DIGIT_COUNT] = pattern;
        self.shown_value = None;
    }

    /// Render a config-edit readout: two hex address digits on the left,
    /// three decimal value digits on the right.
    pub fn write_addr_value(&mut self, address: u8, value: u8) {
        self.shown_value = None;
        self.digits[4] = glyphs::hex(address >> 4);
        self.digits[3] = glyphs::hex(address);
        self.digits[2] = glyphs::digit(value / 100);
        self.digits[1] = glyphs::digit(value / 10);
        self.digits[0] = glyphs::digit(value);
    }

    /// Steps readout: the count plus the step annunciator dot.
    pub fn show_steps(&mut self, steps: u16) {
        self.write_value(steps as u32);
        self.write_dot(DOT_SPEED, false);
        self.write_dot(DOT_STEP, true);
    }

    /// Speed readout: steps per minute plus the speed annunciator dot.
    pub fn show_speed(&mut self, speed: u8) {
        self.write_value(speed as u32);
        self.write_dot(DOT_STEP, false);
        self.write_dot(DOT_SPEED, true);
    }

    /// Set or clear one digit's decimal point, leaving the glyph intact.
    pub fn write_dot(&mut self, index: u8, on: bool) {
        if (index as usize) < DIGIT_COUNT {
            if on {
                self.digits[index as usize] |= 0x01;
            } else {
                self.digits[index as usize] &= 0xfe;
            }
        }
    }

    /// Blank all digits (dots included).
    pub fn clear(&mut self) {
        self.digits = [0; DIGIT_COUNT];
        self.shown_value = None;
    }

    /// Light every segment of every digit.
    pub fn lamp_test(&mut self) {
        self.digits = [0xff; DIGIT_COUNT];
        self.shown_value = None;
    }

    // Cursor -----------------------------------------------------------

    pub fn set_cursor(&mut self, pos: u8) {
        self.cursor_pos = pos % DIGIT_COUNT as u8;
    }

    /// Step the cursor one decade, wrapping across `0..=CURSOR_MAX`.
    ///
    /// `left` steps toward the more significant decade. The cursor is
    /// made visible as a side effect, like the physical original.
    pub fn move_cursor(&mut self, left: bool) {
        self.cursor_visible = true;
        self.cursor_pos = if left {
            (self.cursor_pos + 1) % (CURSOR_MAX + 1)
        } else {
            (self.cursor_pos + CURSOR_MAX) % (CURSOR_MAX + 1)
        };
    }

    pub fn show_cursor(&mut self) {
        self.cursor_visible = true;
    }

    pub fn hide_cursor(&mut self) {
        self.cursor_visible = false;
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn cursor(&self) -> u8 {
        self.cursor_pos
    }

    // Modes ------------------------------------------------------------

    /// Enable or disable leading zeros; redisplays the current number.
    pub fn set_leading_zeros(&mut self, on: bool) {
        self.leading_zeros = on;
        if let Some(value) = self.shown_value {
            self.write_value(value);
        }
    }

    /// Suppress or restore lighting without altering buffer contents.
    /// Takes effect at the next frame boundary.
    pub fn set_blank(&mut self, blank: bool) {
        self.blank = blank;
    }

    pub fn is_blanked(&self) -> bool {
        self.blank
    }

    /// Whether the latched output for the current frame is dark.
    ///
    /// Lags `set_blank(true)` by up to one frame; used by the power-off
    /// path to wait for the display to actually go dark before sleeping.
    pub fn output_is_off(&self) -> bool {
        !self.output_on
    }

    // Scan -------------------------------------------------------------

    /// Refresh exactly one digit. Call once per loop tick.
    ///
    /// The caller must keep the digit lit for at least
    /// [`MIN_DIGIT_DWELL_MS`] before the next call.
    pub fn render_next_digit<B: DisplayBackend>(&mut self, backend: &mut B, now: u64) {
        let index = self.scan_index;
        if index == 0 {
            self.output_on = !self.blank;
        }

        backend.output_enable(false);
        backend.select_digit(index);

        let mut pattern = self.digits[index as usize];
        if self.cursor_visible
            && self.cursor_pos == index
            && (now % CURSOR_BLINK_MS) < CURSOR_BLINK_MS / 2
        {
            // Cursor overlay replaces the glyph but keeps the dp bit.
            pattern = (pattern & 0x01) | glyphs::CURSOR;
        }
        backend.shift_pattern(pattern);
        backend.output_enable(self.output_on);

        self.scan_index = (index + 1) % DIGIT_COUNT as u8;
    }

    #[cfg(test)]
    pub(crate) fn digit_pattern(&self, index: usize) -> u8 {
        self.digits[index]
    }
}

impl Default for DisplayDriver {
    fn default() -> Self {
        Self::new()
    }
}
