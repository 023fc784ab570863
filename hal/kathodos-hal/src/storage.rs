//! Calibration slot storage abstractions
//!
//! Provides a trait for the fixed-slot block storage that holds the
//! instrument's calibration constants. Each slot maps to one fixed-size
//! block in non-volatile memory at an address derived from the slot index.

/// Size of one storage block in bytes
///
/// Matches the flash row granularity of the storage backends. Calibration
/// values occupy the first 6 bytes of a block; the remainder stays erased.
pub const BLOCK_SIZE: usize = 32;

/// Calibration slots
///
/// The slot value doubles as the block index inside the calibration
/// partition. Slot 0 is reserved and never addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CalSlot {
    /// Measurement offset correction, applied host-side
    Offset = 1,
    /// DAC offset + full-scale calibration registers
    DacCalibration = 2,
    /// Shunt resistor correction factors, applied host-side
    ShuntCalibration = 3,
}

impl CalSlot {
    /// All slots, in index order
    pub const ALL: [CalSlot; 3] = [
        CalSlot::Offset,
        CalSlot::DacCalibration,
        CalSlot::ShuntCalibration,
    ];

    /// Get the slot as its block index
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a slot from a block index
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(CalSlot::Offset),
            2 => Some(CalSlot::DacCalibration),
            3 => Some(CalSlot::ShuntCalibration),
            _ => None,
        }
    }
}

/// Block storage trait
///
/// Whole-block reads and writes addressed by [`CalSlot`]. Writes are
/// atomic from the caller's perspective: a later read observes either the
/// previous block or the new one, never a mixture.
///
/// The trait is infallible. Slots are a fixed enum, so no out-of-range
/// address exists, and the command protocol has no failure reply to carry
/// a storage error; backends on fallible flash primitives log and absorb.
pub trait BlockStorage {
    /// Read the whole block for `slot` into `block`
    ///
    /// A slot that has never been written reads as erased flash (`0xFF`).
    fn read_block(&mut self, slot: CalSlot, block: &mut [u8; BLOCK_SIZE]);

    /// Write `bytes` at the start of the block for `slot`
    ///
    /// `bytes` must be at most [`BLOCK_SIZE`] long; the rest of the block
    /// is padded with `0xFF`.
    fn write_block(&mut self, slot: CalSlot, bytes: &[u8]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_indices_match_partition_layout() {
        assert_eq!(CalSlot::Offset.as_u8(), 1);
        assert_eq!(CalSlot::DacCalibration.as_u8(), 2);
        assert_eq!(CalSlot::ShuntCalibration.as_u8(), 3);
    }

    #[test]
    fn slot_roundtrip() {
        for slot in CalSlot::ALL {
            assert_eq!(CalSlot::from_u8(slot.as_u8()), Some(slot));
        }
    }

    #[test]
    fn slot_zero_is_reserved() {
        assert!(CalSlot::from_u8(0).is_none());
        assert!(CalSlot::from_u8(4).is_none());
        assert!(CalSlot::from_u8(0xFF).is_none());
    }
}
