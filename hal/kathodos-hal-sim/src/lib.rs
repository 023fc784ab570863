//! In-memory board simulation
//!
//! Implements the `kathodos-hal` pin and storage traits against a
//! simulated converter board so the protocol grammar, instrument logic
//! and chip drivers can run together on the host. The board models both
//! converter chips at the bus edge level: the DAC decodes command frames
//! off rising clock edges and the ADC pair shifts conversion words out
//! on falling edges, so the drivers' clocking either lines up with the
//! chips or the tests fail.
//!
//! Time is virtual. Every delay advances a shared clock, and every
//! driven level change is recorded with its timestamp, which lets tests
//! assert on waveform shape (hold times, make-before-break ordering,
//! reset pulse widths) rather than just on end state.

#![deny(unsafe_code)]

pub mod board;
pub mod dac1220;
pub mod mcp3550;
pub mod storage;

pub use board::{Net, SimBoard, SimDelay, SimFlexPin, SimPin, TraceEntry};
pub use storage::RamStorage;
