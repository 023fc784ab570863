//! Board-agnostic instrument logic
//!
//! This crate contains all instrument behavior that does not depend on
//! specific hardware implementations:
//!
//! - Analog front end traits (non-blocking ADC poll, DAC register access)
//! - Front panel relay sequencing (cell, mode, make-before-break ranges)
//! - Calibration slot access
//! - The command dispatcher that ties them together

#![no_std]
#![deny(unsafe_code)]

pub mod calibration;
pub mod instrument;
pub mod panel;
pub mod traits;

pub use calibration::{CalibrationStore, CAL_LEN};
pub use instrument::{Instrument, POWER_UP_DELAY_MS, SELF_CAL_DELAY_MS};
pub use panel::{DeviceState, FrontPanel, RANGE_SWITCH_DELAY_MS};
pub use traits::{AdcPort, AdcSample, DacPort};
