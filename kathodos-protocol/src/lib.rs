//! Host Link Command Protocol
//!
//! This crate defines the USB command protocol between the host software and
//! the instrument. The host sends one short ASCII command per bulk transfer
//! and receives exactly one reply per command; there is no pipelining and no
//! queuing.
//!
//! # Protocol Overview
//!
//! ```text
//! host → device    one command frame, 6-19 bytes
//!                  literal ASCII pattern [+ raw binary payload]
//! device → host    "OK" | "?" | "WAIT" | 6 raw data bytes
//! ```
//!
//! A frame matches a grammar row only when its total length equals the
//! row's expected length *and* it starts with the row's literal pattern.
//! Payload bytes after the pattern are opaque binary and are forwarded
//! verbatim to the DAC or the calibration store. Anything else replies `?`.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod reply;

pub use command::{Command, CommandSpec, Mode, Opcode, Range, COMMAND_TABLE, MAX_COMMAND_LEN};
pub use reply::{Reply, MAX_REPLY_LEN};
