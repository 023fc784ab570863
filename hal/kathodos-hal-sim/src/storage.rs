//! RAM-backed calibration storage

use std::cell::RefCell;
use std::rc::Rc;

use kathodos_hal::storage::{BlockStorage, CalSlot, BLOCK_SIZE};

struct Rows {
    blocks: [[u8; BLOCK_SIZE]; 4],
    writes: usize,
}

/// Calibration block store living in plain arrays, erased to 0xFF like
/// the flash it stands in for.
///
/// Clones share the same backing rows, so a test can hand one handle to
/// the instrument and keep another to inspect, or to boot a second
/// instrument against the same contents.
#[derive(Clone)]
pub struct RamStorage {
    rows: Rc<RefCell<Rows>>,
}

impl RamStorage {
    pub fn new() -> Self {
        Self {
            rows: Rc::new(RefCell::new(Rows {
                blocks: [[0xFF; BLOCK_SIZE]; 4],
                writes: 0,
            })),
        }
    }

    /// Write operations performed so far.
    pub fn writes(&self) -> usize {
        self.rows.borrow().writes
    }
}

impl Default for RamStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockStorage for RamStorage {
    fn read_block(&mut self, slot: CalSlot, block: &mut [u8; BLOCK_SIZE]) {
        *block = self.rows.borrow().blocks[slot.as_u8() as usize];
    }

    fn write_block(&mut self, slot: CalSlot, bytes: &[u8]) {
        let mut rows = self.rows.borrow_mut();
        let row = &mut rows.blocks[slot.as_u8() as usize];
        *row = [0xFF; BLOCK_SIZE];
        row[..bytes.len()].copy_from_slice(bytes);
        rows.writes += 1;
    }
}
