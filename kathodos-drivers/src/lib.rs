//! Hardware driver implementations
//!
//! Concrete implementations of the converter-board protocols on top of
//! plain GPIO:
//!
//! - A software-clocked synchronous bus (no hardware SPI block involved)
//! - MCP3550 dual-channel delta-sigma ADC polling
//! - DAC1220 register access, power-on reset and self-calibration
//! - The combined analog front end the instrument core drives

#![no_std]
#![deny(unsafe_code)]

pub mod afe;
pub mod bus;
pub mod dac1220;
pub mod mcp3550;

pub use afe::AnalogFrontEnd;
pub use bus::{ConverterBus, SoftSpi, SETTLE_US};
pub use dac1220::Dac1220;
pub use mcp3550::Mcp3550;
