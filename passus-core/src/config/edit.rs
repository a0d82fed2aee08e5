//! Boot-time configuration edit mode
//!
//! Holding the button through power-on drops the device into a raw
//! address/value editor over the persisted record: the encoder moves the
//! byte address (outer loop) or the value (inner loop), a short press
//! toggles between the two, a long press commits the current byte and
//! exits. Address and value both saturate at their bounds; the caller
//! clicks the buzzer when that happens.

use super::layout::{ADDR_SERVO_DOWN, ADDR_SERVO_UP, CONFIG_MAX_ADDR};
use super::store::ConfigStore;

/// Which half of the address/value pair the encoder edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditFocus {
    Address,
    Value,
}

/// One run of the boot-time editor.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EditSession {
    address: u8,
    value: u8,
    focus: EditFocus,
}

impl EditSession {
    /// Open the editor at address 0, loading its current byte.
    pub fn begin<C: ConfigStore>(store: &mut C) -> Self {
        Self {
            address: 0,
            value: store.read_byte(0),
            focus: EditFocus::Address,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn focus(&self) -> EditFocus {
        self.focus
    }

    /// Display cursor position for the current focus: the address digits
    /// sit at the left of the readout, the value digits at the right.
    pub fn cursor_digit(&self) -> u8 {
        match self.focus {
            EditFocus::Address => 3,
            EditFocus::Value => 0,
        }
    }

    /// Short press: flip between address and value editing.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            EditFocus::Address => EditFocus::Value,
            EditFocus::Value => EditFocus::Address,
        };
    }

    /// Apply an encoder delta to the focused half.
    ///
    /// Moving the address first flushes the pending value byte, then
    /// loads the byte at the new address. Returns true when the motion
    /// hit a bound (caller emits the click).
    pub fn apply_encoder<C: ConfigStore>(&mut self, delta: i8, store: &mut C) -> bool {
        if delta == 0 {
            return false;
        }
        match self.focus {
            EditFocus::Address => {
                store.write_byte(self.address, self.value);
                let clamped = nudge(&mut self.address, CONFIG_MAX_ADDR, delta);
                self.value = store.read_byte(self.address);
                clamped
            }
            EditFocus::Value => nudge(&mut self.value, u8::MAX, delta),
        }
    }

    /// Long press: persist the byte under edit.
    pub fn commit<C: ConfigStore>(&self, store: &mut C) {
        store.write_byte(self.address, self.value);
    }

    /// Servo preview position while editing the servo extremes, so the
    /// mechanical effect of the value is visible immediately.
    pub fn servo_preview(&self) -> Option<u8> {
        match self.address {
            ADDR_SERVO_DOWN | ADDR_SERVO_UP => Some(self.value),
            _ => None,
        }
    }
}

/// Saturating add of an encoder delta into a bounded unsigned byte.
/// Returns true when the result was clamped.
fn nudge(slot: &mut u8, max: u8, delta: i8) -> bool {
    if delta < 0 {
        let mag = delta.unsigned_abs();
        if *slot < mag {
            *slot = 0;
            true
        } else {
            *slot -= mag;
            false
        }
    } else {
        let mag = delta as u8;
        if max - *slot < mag {
            *slot = max;
            true
        } else {
            *slot += mag;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::store::MemoryStore;
    use super::*;

    fn seeded_store() -> MemoryStore {
        let mut bytes = [0u8; 16];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8 * 10;
        }
        MemoryStore::from_bytes(bytes)
    }

    #[test]
    fn test_begin_loads_address_zero() {
        let mut store = seeded_store();
        let session = EditSession::begin(&mut store);
        assert_eq!(session.address(), 0);
        assert_eq!(session.value(), 0);
        assert_eq!(session.focus(), EditFocus::Address);
        assert_eq!(session.cursor_digit(), 3);
    }

    #[test]
    fn test_address_motion_flushes_and_reloads() {
        let mut store = seeded_store();
        let mut session = EditSession::begin(&mut store);
        session.toggle_focus();
        assert!(!session.apply_encoder(5, &mut store)); // value 0 -> 5
        session.toggle_focus();
        assert!(!session.apply_encoder(2, &mut store)); // address 0 -> 2
        // The edited byte was flushed before moving.
        assert_eq!(store.read_byte(0), 5);
        assert_eq!(session.value(), 20);
    }

    #[test]
    fn test_address_saturates_at_record_bounds() {
        let mut store = seeded_store();
        let mut session = EditSession::begin(&mut store);
        assert!(session.apply_encoder(-3, &mut store));
        assert_eq!(session.address(), 0);
        assert!(session.apply_encoder(100, &mut store));
        assert_eq!(session.address(), CONFIG_MAX_ADDR);
    }

    #[test]
    fn test_value_saturates_at_byte_bounds() {
        let mut store = seeded_store();
        let mut session = EditSession::begin(&mut store);
        session.toggle_focus();
        assert!(session.apply_encoder(-1, &mut store));
        assert_eq!(session.value(), 0);
        session.apply_encoder(100, &mut store);
        session.apply_encoder(100, &mut store);
        assert!(session.apply_encoder(100, &mut store));
        assert_eq!(session.value(), u8::MAX);
    }

    #[test]
    fn test_commit_writes_current_byte() {
        let mut store = seeded_store();
        let mut session = EditSession::begin(&mut store);
        session.toggle_focus();
        session.apply_encoder(42, &mut store);
        session.commit(&mut store);
        assert_eq!(store.read_byte(0), 42);
    }

    #[test]
    fn test_servo_preview_only_for_servo_fields() {
        let mut store = seeded_store();
        let mut session = EditSession::begin(&mut store);
        assert_eq!(session.servo_preview(), Some(0));
        session.apply_encoder(1, &mut store);
        assert_eq!(session.servo_preview(), Some(10));
        session.apply_encoder(1, &mut store);
        assert_eq!(session.servo_preview(), None);
    }
}
