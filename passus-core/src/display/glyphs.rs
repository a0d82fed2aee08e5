//! Segment glyph table
//!
//! Segments are packed in the classic a-g + decimal point order:
//! bit 7 = a (top) down to bit 1 = g (middle), bit 0 = dp. The table
//! covers the decimal digits, hex A-F, and a dash.

/// Glyphs for 0-9, A-F, and `-` (index 16).
pub const SEGMENTS: [u8; 17] = [
    0xfc, // 0
    0x60, // 1
    0xda, // 2
    0xf2, // 3
    0x66, // 4
    0xb6, // 5
    0xbe, // 6
    0xe0, // 7
    0xfe, // 8
    0xf6, // 9
    0xee, // A
    0x3e, // b
    0x1a, // c
    0x7a, // d
    0x9e, // E
    0x8e, // F
    0x02, // -
];

/// Table index of the dash glyph.
pub const DASH: usize = 16;

/// Cursor overlay: the bottom segment alone, drawn as an underline.
pub const CURSOR: u8 = 0x10;

/// Letter glyphs for the "OFF" message.
pub const LETTER_O: u8 = 0xfc;
pub const LETTER_F: u8 = 0x8e;

/// Bracket-and-bars pattern shown when entering config edit mode:
/// `[===]` across the 5 digits, least significant digit first.
pub const EDIT_BARS: [u8; 5] = [0xf0, 0x90, 0x90, 0x90, 0x9c];

/// Glyph for a single hex nibble.
pub fn hex(nibble: u8) -> u8 {
    SEGMENTS[(nibble & 0x0f) as usize]
}

/// Glyph for a decimal digit (values above 9 taken modulo 10).
pub fn digit(value: u8) -> u8 {
    SEGMENTS[(value % 10) as usize]
}
