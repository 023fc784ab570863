//! Calibration slot access
//!
//! Thin façade over [`BlockStorage`] dealing in the 6-byte calibration
//! values the command set exchanges. Values are raw bytes; all the
//! arithmetic that gives them meaning happens host-side.

use kathodos_hal::storage::{BlockStorage, CalSlot, BLOCK_SIZE};

/// Bytes in one calibration value
pub const CAL_LEN: usize = 6;

/// Slot-addressed calibration storage
pub struct CalibrationStore<S> {
    storage: S,
}

impl<S: BlockStorage> CalibrationStore<S> {
    /// Wrap a storage backend
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Read the value of `slot`
    ///
    /// A slot that has never been written reads as erased flash (`0xFF`).
    pub fn read_slot(&mut self, slot: CalSlot) -> [u8; CAL_LEN] {
        let mut block = [0xFF; BLOCK_SIZE];
        self.storage.read_block(slot, &mut block);
        let mut value = [0u8; CAL_LEN];
        value.copy_from_slice(&block[..CAL_LEN]);
        value
    }

    /// Write the value of `slot`
    pub fn write_slot(&mut self, slot: CalSlot, value: &[u8; CAL_LEN]) {
        self.storage.write_block(slot, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockStorage {
        rows: [[u8; BLOCK_SIZE]; 4],
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                rows: [[0xFF; BLOCK_SIZE]; 4],
            }
        }
    }

    impl BlockStorage for MockStorage {
        fn read_block(&mut self, slot: CalSlot, block: &mut [u8; BLOCK_SIZE]) {
            *block = self.rows[slot.as_u8() as usize];
        }

        fn write_block(&mut self, slot: CalSlot, bytes: &[u8]) {
            let row = &mut self.rows[slot.as_u8() as usize];
            *row = [0xFF; BLOCK_SIZE];
            row[..bytes.len()].copy_from_slice(bytes);
        }
    }

    #[test]
    fn test_unwritten_slot_reads_erased() {
        let mut store = CalibrationStore::new(MockStorage::new());
        for slot in CalSlot::ALL {
            assert_eq!(store.read_slot(slot), [0xFF; CAL_LEN]);
        }
    }

    #[test]
    fn test_slots_are_independent() {
        let mut store = CalibrationStore::new(MockStorage::new());
        store.write_slot(CalSlot::Offset, &[1; 6]);
        store.write_slot(CalSlot::DacCalibration, &[2; 6]);
        store.write_slot(CalSlot::ShuntCalibration, &[3; 6]);

        assert_eq!(store.read_slot(CalSlot::Offset), [1; 6]);
        assert_eq!(store.read_slot(CalSlot::DacCalibration), [2; 6]);
        assert_eq!(store.read_slot(CalSlot::ShuntCalibration), [3; 6]);
    }

    #[test]
    fn test_rewrite_replaces_whole_value() {
        let mut store = CalibrationStore::new(MockStorage::new());
        store.write_slot(CalSlot::Offset, &[0xAA; 6]);
        store.write_slot(CalSlot::Offset, &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
        assert_eq!(
            store.read_slot(CalSlot::Offset),
            [0x11, 0x22, 0x33, 0x44, 0x55, 0x66]
        );
    }
}
