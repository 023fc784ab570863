//! Analog front end assembly
//!
//! Owns the shared bus and both converter drivers and exposes them to
//! the instrument core as [`AdcPort`] and [`DacPort`]. This is the only
//! place that hands the bus to a chip, so transactions never interleave.

use embedded_hal::delay::DelayNs;
use kathodos_core::{AdcPort, AdcSample, DacPort};
use kathodos_hal::gpio::{FlexPin, InputPin, OutputPin};

use crate::bus::SoftSpi;
use crate::dac1220::Dac1220;
use crate::mcp3550::Mcp3550;

/// The converter board: one bus, one DAC, one ADC pair.
pub struct AnalogFrontEnd<Clk, D1, D2, Dly, DacCs, AdcCs> {
    bus: SoftSpi<Clk, D1, D2, Dly>,
    dac: Dac1220<DacCs>,
    adc: Mcp3550<AdcCs>,
}

impl<Clk, D1, D2, Dly, DacCs, AdcCs> AnalogFrontEnd<Clk, D1, D2, Dly, DacCs, AdcCs>
where
    Clk: OutputPin,
    D1: FlexPin,
    D2: InputPin,
    Dly: DelayNs,
    DacCs: OutputPin,
    AdcCs: OutputPin,
{
    pub fn new(bus: SoftSpi<Clk, D1, D2, Dly>, dac: Dac1220<DacCs>, adc: Mcp3550<AdcCs>) -> Self {
        Self { bus, dac, adc }
    }
}

impl<Clk, D1, D2, Dly, DacCs, AdcCs> AdcPort for AnalogFrontEnd<Clk, D1, D2, Dly, DacCs, AdcCs>
where
    Clk: OutputPin,
    D1: FlexPin,
    D2: InputPin,
    Dly: DelayNs,
    DacCs: OutputPin,
    AdcCs: OutputPin,
{
    fn poll(&mut self) -> Option<AdcSample> {
        self.adc.poll(&mut self.bus)
    }
}

impl<Clk, D1, D2, Dly, DacCs, AdcCs> DacPort for AnalogFrontEnd<Clk, D1, D2, Dly, DacCs, AdcCs>
where
    Clk: OutputPin,
    D1: FlexPin,
    D2: InputPin,
    Dly: DelayNs,
    DacCs: OutputPin,
    AdcCs: OutputPin,
{
    fn reset(&mut self) {
        self.dac.reset(&mut self.bus);
    }

    fn configure(&mut self) {
        self.dac.configure(&mut self.bus);
    }

    fn set_output(&mut self, code: [u8; 3]) {
        self.dac.set_output(&mut self.bus, code);
    }

    fn begin_self_calibration(&mut self) {
        self.dac.begin_self_calibration(&mut self.bus);
    }

    fn read_calibration(&mut self) -> [u8; 6] {
        self.dac.read_calibration(&mut self.bus)
    }

    fn apply_calibration(&mut self, cal: [u8; 6]) {
        self.dac.write_calibration(&mut self.bus, cal);
    }
}
