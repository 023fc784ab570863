//! RP2040-specific HAL backend
//!
//! Implements the shared `kathodos-hal` traits on the RP2040:
//!
//! - GPIO adapters over embassy-rp outputs, inputs and flex pins
//! - Calibration block storage in the last sector of the boot flash

#![no_std]

pub mod flash;
pub mod gpio;

pub use flash::CalFlash;
pub use gpio::{RpFlex, RpInput, RpOutput};
