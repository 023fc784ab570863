//! Calibration block storage in RP2040 flash
//!
//! The calibration slots live in the last 4 KiB sector of the boot
//! flash, far above the firmware image. Each slot owns one
//! `BLOCK_SIZE`-byte row inside the sector; a write reads the sector,
//! patches the slot's row and rewrites the whole sector.
//!
//! The storage trait is infallible: flash faults are logged, and reads
//! fall back to the erased pattern that callers treat as never written.

use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use kathodos_hal::storage::{BlockStorage, CalSlot, BLOCK_SIZE};

/// Total flash fitted on the board.
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Start of the calibration sector, as an offset into flash.
pub const CAL_PARTITION_START: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

/// Calibration storage in the last flash sector.
pub struct CalFlash {
    flash: Flash<'static, FLASH, Blocking, FLASH_SIZE>,
}

impl CalFlash {
    pub fn new(flash: Peri<'static, FLASH>) -> Self {
        Self {
            flash: Flash::new_blocking(flash),
        }
    }

    fn slot_offset(slot: CalSlot) -> u32 {
        CAL_PARTITION_START + u32::from(slot.as_u8()) * BLOCK_SIZE as u32
    }
}

impl BlockStorage for CalFlash {
    fn read_block(&mut self, slot: CalSlot, block: &mut [u8; BLOCK_SIZE]) {
        if let Err(err) = self.flash.blocking_read(Self::slot_offset(slot), block) {
            defmt::warn!("calibration read failed: {}", err);
            *block = [0xFF; BLOCK_SIZE];
        }
    }

    fn write_block(&mut self, slot: CalSlot, bytes: &[u8]) {
        let mut sector = [0xFF; ERASE_SIZE];
        if let Err(err) = self.flash.blocking_read(CAL_PARTITION_START, &mut sector) {
            defmt::warn!("calibration sector read failed: {}", err);
            return;
        }

        let at = usize::from(slot.as_u8()) * BLOCK_SIZE;
        sector[at..at + BLOCK_SIZE].fill(0xFF);
        sector[at..at + bytes.len()].copy_from_slice(bytes);

        let end = CAL_PARTITION_START + ERASE_SIZE as u32;
        if let Err(err) = self.flash.blocking_erase(CAL_PARTITION_START, end) {
            defmt::warn!("calibration erase failed: {}", err);
            return;
        }
        if let Err(err) = self.flash.blocking_write(CAL_PARTITION_START, &sector) {
            defmt::warn!("calibration write failed: {}", err);
        }
    }
}
