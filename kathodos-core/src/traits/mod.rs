//! Hardware abstraction traits
//!
//! These traits define the interface between the instrument logic and the
//! analog converter board. kathodos-drivers provides the production
//! implementation; tests substitute in-memory fakes.

pub mod converter;

pub use converter::{AdcPort, AdcSample, DacPort};
