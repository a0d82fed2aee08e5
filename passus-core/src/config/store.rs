//! Byte-addressable configuration store seam
//!
//! The non-volatile store behind the config record. Access is per byte,
//! by the offsets in [`super::layout`], because the edit mode exposes
//! direct address/value read-modify-write over the record. Operations
//! are assumed always to succeed; there is no retry or corruption
//! handling.

use super::layout::CONFIG_LEN;

/// Non-volatile byte store holding the configuration record.
pub trait ConfigStore {
    /// Read one byte. Addresses past the record read as erased (0xFF).
    fn read_byte(&mut self, addr: u8) -> u8;

    /// Write one byte. Implementations should skip the write when the
    /// stored byte already matches (EEPROM update semantics).
    fn write_byte(&mut self, addr: u8, value: u8);
}

/// RAM-backed store, for host tests and as a fallback backend.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemoryStore {
    bytes: [u8; CONFIG_LEN],
    /// Number of actual (non-skipped) writes
    pub writes: usize,
}

impl MemoryStore {
    /// An erased store (all 0xFF).
    pub const fn new() -> Self {
        Self {
            bytes: [0xff; CONFIG_LEN],
            writes: 0,
        }
    }

    pub const fn from_bytes(bytes: [u8; CONFIG_LEN]) -> Self {
        Self { bytes, writes: 0 }
    }

    pub fn bytes(&self) -> &[u8; CONFIG_LEN] {
        &self.bytes
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for MemoryStore {
    fn read_byte(&mut self, addr: u8) -> u8 {
        self.bytes.get(addr as usize).copied().unwrap_or(0xff)
    }

    fn write_byte(&mut self, addr: u8, value: u8) {
        if let Some(slot) = self.bytes.get_mut(addr as usize) {
            if *slot != value {
                *slot = value;
                self.writes += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_semantics_skip_unchanged() {
        let mut store = MemoryStore::new();
        store.write_byte(3, 0x42);
        store.write_byte(3, 0x42);
        assert_eq!(store.writes, 1);
        assert_eq!(store.read_byte(3), 0x42);
    }

    #[test]
    fn test_out_of_range_reads_erased() {
        let mut store = MemoryStore::new();
        assert_eq!(store.read_byte(200), 0xff);
    }
}
