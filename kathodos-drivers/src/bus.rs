//! Software-clocked synchronous bus
//!
//! The converter board carries no hardware SPI wiring: one MCU-driven
//! clock line and two data lines are shared by the DAC (DATA1,
//! bidirectional) and the ADC pair (DATA1 and DATA2 as simultaneous
//! inputs). This module clocks the lines entirely in software, one edge
//! at a time, with a fixed hold period between level changes.
//!
//! Chip-select lines belong to the chip drivers; the bus only moves bits.

use embedded_hal::delay::DelayNs;
use kathodos_hal::gpio::{FlexPin, InputPin, OutputPin};

/// Level hold time between bus edges, in microseconds.
///
/// Comfortably beyond the setup and hold requirements of both
/// converter chips.
pub const SETTLE_US: u32 = 17;

/// Bus operations the chip drivers consume.
///
/// Split out as a trait so driver unit tests can script bus traffic
/// without assembling pins.
pub trait ConverterBus {
    /// Hold the lines for one settle period.
    fn settle(&mut self);

    /// One clock pulse: high, settle, low, settle.
    fn pulse_clock(&mut self);

    /// One stretched clock pulse held high for `high_us`, then low with
    /// a trailing settle.
    fn pulse_clock_for(&mut self, high_us: u32);

    /// Shift one byte out on DATA1, MSB first, latching each bit before
    /// the rising clock edge.
    fn write_byte(&mut self, byte: u8);

    /// Shift one byte in from DATA1, MSB first, sampling each bit after
    /// the falling clock edge.
    fn read_byte(&mut self) -> u8;

    /// Shift one byte in from DATA1 and DATA2 simultaneously.
    fn read_byte_pair(&mut self) -> (u8, u8);

    /// Sample DATA1 without clocking.
    fn data1_level(&mut self) -> bool;

    /// Drive DATA1 from the MCU.
    fn data1_to_output(&mut self);

    /// Release DATA1 to the addressed chip.
    fn data1_to_input(&mut self);
}

/// Bit-bang bus over three GPIO lines and a delay source.
pub struct SoftSpi<Clk, D1, D2, Dly> {
    clock: Clk,
    data1: D1,
    data2: D2,
    delay: Dly,
}

impl<Clk, D1, D2, Dly> SoftSpi<Clk, D1, D2, Dly>
where
    Clk: OutputPin,
    D1: FlexPin,
    D2: InputPin,
    Dly: DelayNs,
{
    /// Take ownership of the bus lines and park them: clock idling low,
    /// DATA1 released to the chips.
    pub fn new(clock: Clk, data1: D1, data2: D2, delay: Dly) -> Self {
        let mut bus = Self {
            clock,
            data1,
            data2,
            delay,
        };
        bus.clock.set_low();
        bus.data1.set_as_input();
        bus
    }
}

impl<Clk, D1, D2, Dly> ConverterBus for SoftSpi<Clk, D1, D2, Dly>
where
    Clk: OutputPin,
    D1: FlexPin,
    D2: InputPin,
    Dly: DelayNs,
{
    fn settle(&mut self) {
        self.delay.delay_us(SETTLE_US);
    }

    fn pulse_clock(&mut self) {
        self.clock.set_high();
        self.settle();
        self.clock.set_low();
        self.settle();
    }

    fn pulse_clock_for(&mut self, high_us: u32) {
        self.clock.set_high();
        self.delay.delay_us(high_us);
        self.clock.set_low();
        self.settle();
    }

    fn write_byte(&mut self, byte: u8) {
        for bit in (0..8).rev() {
            self.data1.set_state(byte & (1 << bit) != 0);
            self.pulse_clock();
        }
    }

    fn read_byte(&mut self) -> u8 {
        let mut value = 0;
        for _ in 0..8 {
            self.pulse_clock();
            value = (value << 1) | self.data1.is_high() as u8;
        }
        value
    }

    fn read_byte_pair(&mut self) -> (u8, u8) {
        let mut first = 0;
        let mut second = 0;
        for _ in 0..8 {
            self.pulse_clock();
            first = (first << 1) | self.data1.is_high() as u8;
            second = (second << 1) | self.data2.is_high() as u8;
        }
        (first, second)
    }

    fn data1_level(&mut self) -> bool {
        self.data1.is_high()
    }

    fn data1_to_output(&mut self) {
        self.data1.set_as_output();
    }

    fn data1_to_input(&mut self) {
        self.data1.set_as_input();
    }
}
