//! Flash-backed configuration store
//!
//! The 16-byte record lives at the start of the last flash sector. Byte
//! writes land in a RAM shadow and are flushed as one erase-and-rewrite
//! by `flush()`, called once per loop tick; the record only changes on
//! explicit user commits, so sector wear is negligible.

use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;

use passus_core::config::{ConfigStore, CONFIG_LEN};

/// Total flash size of the board (W25Q16-class part).
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Offset of the config sector (last sector of flash).
pub const CONFIG_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

pub struct FlashConfigStore<'d> {
    flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>,
    shadow: [u8; CONFIG_LEN],
    dirty: bool,
}

impl<'d> FlashConfigStore<'d> {
    /// Take over the flash peripheral and load the record shadow.
    ///
    /// A read failure leaves the shadow erased (all 0xFF), which the
    /// config loader treats as "use compiled defaults".
    pub fn new(flash: FLASH) -> Self {
        let mut flash = Flash::new_blocking(flash);
        let mut shadow = [0xff; CONFIG_LEN];
        if flash.blocking_read(CONFIG_OFFSET, &mut shadow).is_err() {
            shadow = [0xff; CONFIG_LEN];
        }
        Self {
            flash,
            shadow,
            dirty: false,
        }
    }

    /// Persist the shadow if any byte changed since the last flush.
    pub fn flush(&mut self) {
        if !self.dirty {
            return;
        }
        let end = CONFIG_OFFSET + ERASE_SIZE as u32;
        if self.flash.blocking_erase(CONFIG_OFFSET, end).is_ok() {
            let _ = self.flash.blocking_write(CONFIG_OFFSET, &self.shadow);
        }
        self.dirty = false;
    }
}

impl ConfigStore for FlashConfigStore<'_> {
    fn read_byte(&mut self, addr: u8) -> u8 {
        self.shadow.get(addr as usize).copied().unwrap_or(0xff)
    }

    fn write_byte(&mut self, addr: u8, value: u8) {
        if let Some(slot) = self.shadow.get_mut(addr as usize) {
            if *slot != value {
                *slot = value;
                self.dirty = true;
            }
        }
    }
}
