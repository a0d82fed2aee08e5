//! Persisted byte layout of the configuration record
//!
//! The order is significant: the edit mode addresses fields by byte
//! offset, so the layout is part of the device's external interface.
//! Multi-byte fields are little-endian.

use super::store::ConfigStore;
use super::types::Config;

/// Total record length in bytes.
pub const CONFIG_LEN: usize = 16;

/// Highest editable byte address.
pub const CONFIG_MAX_ADDR: u8 = CONFIG_LEN as u8 - 1;

// Field offsets.
pub const ADDR_SERVO_DOWN: u8 = 0x00;
pub const ADDR_SERVO_UP: u8 = 0x01;
pub const ADDR_STEPS_INIT: u8 = 0x02; // u16 le
pub const ADDR_STEPS_MIN: u8 = 0x04; // u16 le
pub const ADDR_STEPS_MAX: u8 = 0x06; // u16 le
pub const ADDR_SPEED_INIT: u8 = 0x08;
pub const ADDR_SPEED_MIN: u8 = 0x09;
pub const ADDR_SPEED_MAX: u8 = 0x0a;
pub const ADDR_STEP_RATIO: u8 = 0x0b;
pub const ADDR_LONG_PRESS_DELAY: u8 = 0x0c;
pub const ADDR_SET_MODE_TIMEOUT: u8 = 0x0d;
pub const ADDR_POWER_OFF_DELAY: u8 = 0x0e;
pub const ADDR_POST_MESSAGE_DELAY: u8 = 0x0f;

impl Config {
    /// Serialize into the persisted layout.
    pub fn to_bytes(&self) -> [u8; CONFIG_LEN] {
        let mut b = [0u8; CONFIG_LEN];
        b[ADDR_SERVO_DOWN as usize] = self.servo_down_position;
        b[ADDR_SERVO_UP as usize] = self.servo_up_position;
        b[ADDR_STEPS_INIT as usize..][..2].copy_from_slice(&self.steps_init.to_le_bytes());
        b[ADDR_STEPS_MIN as usize..][..2].copy_from_slice(&self.steps_min.to_le_bytes());
        b[ADDR_STEPS_MAX as usize..][..2].copy_from_slice(&self.steps_max.to_le_bytes());
        b[ADDR_SPEED_INIT as usize] = self.speed_init;
        b[ADDR_SPEED_MIN as usize] = self.speed_min;
        b[ADDR_SPEED_MAX as usize] = self.speed_max;
        b[ADDR_STEP_RATIO as usize] = self.step_ratio;
        b[ADDR_LONG_PRESS_DELAY as usize] = self.long_press_delay;
        b[ADDR_SET_MODE_TIMEOUT as usize] = self.set_mode_timeout;
        b[ADDR_POWER_OFF_DELAY as usize] = self.power_off_delay;
        b[ADDR_POST_MESSAGE_DELAY as usize] = self.post_message_delay;
        b
    }

    /// Deserialize from the persisted layout.
    pub fn from_bytes(b: &[u8; CONFIG_LEN]) -> Self {
        let le16 = |addr: u8| u16::from_le_bytes([b[addr as usize], b[addr as usize + 1]]);
        Self {
            servo_down_position: b[ADDR_SERVO_DOWN as usize],
            servo_up_position: b[ADDR_SERVO_UP as usize],
            steps_init: le16(ADDR_STEPS_INIT),
            steps_min: le16(ADDR_STEPS_MIN),
            steps_max: le16(ADDR_STEPS_MAX),
            speed_init: b[ADDR_SPEED_INIT as usize],
            speed_min: b[ADDR_SPEED_MIN as usize],
            speed_max: b[ADDR_SPEED_MAX as usize],
            step_ratio: b[ADDR_STEP_RATIO as usize],
            long_press_delay: b[ADDR_LONG_PRESS_DELAY as usize],
            set_mode_timeout: b[ADDR_SET_MODE_TIMEOUT as usize],
            power_off_delay: b[ADDR_POWER_OFF_DELAY as usize],
            post_message_delay: b[ADDR_POST_MESSAGE_DELAY as usize],
        }
    }

    /// Load the record from the store, falling back to compiled defaults
    /// when the store is erased.
    pub fn load<C: ConfigStore>(store: &mut C) -> Self {
        let mut bytes = [0u8; CONFIG_LEN];
        for (addr, slot) in bytes.iter_mut().enumerate() {
            *slot = store.read_byte(addr as u8);
        }
        if bytes.iter().all(|&b| b == 0xff) {
            Self::default()
        } else {
            Self::from_bytes(&bytes)
        }
    }

    /// Persist the whole record.
    pub fn save<C: ConfigStore>(&self, store: &mut C) {
        for (addr, byte) in self.to_bytes().iter().enumerate() {
            store.write_byte(addr as u8, *byte);
        }
    }

    /// Persist only the `steps_init` field (AdjustSteps commit).
    pub fn persist_steps_init<C: ConfigStore>(store: &mut C, steps: u16) {
        let le = steps.to_le_bytes();
        store.write_byte(ADDR_STEPS_INIT, le[0]);
        store.write_byte(ADDR_STEPS_INIT + 1, le[1]);
    }
}
