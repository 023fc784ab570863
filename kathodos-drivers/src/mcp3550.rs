//! MCP3550 dual-channel ADC front end
//!
//! Two MCP3550 delta-sigma converters share the chip-select and clock
//! lines; their data outputs sit on separate lines, so both 24-bit
//! conversion words shift in simultaneously. With the chips selected and
//! the clock idle, DATA1 doubles as the ready flag: the converter drives
//! it low once a conversion has finished.

use kathodos_core::AdcSample;
use kathodos_hal::gpio::OutputPin;

use crate::bus::ConverterBus;

/// The MCP3550 pair behind its shared chip-select line.
pub struct Mcp3550<Cs> {
    cs: Cs,
}

impl<Cs: OutputPin> Mcp3550<Cs> {
    /// Take ownership of the chip-select line, deasserted.
    pub fn new(mut cs: Cs) -> Self {
        cs.set_high();
        Self { cs }
    }

    /// Single non-blocking conversion poll.
    ///
    /// When a conversion is ready both channel words shift in, the next
    /// conversion pair is kicked off by bouncing the select line, and
    /// the sample comes back. Otherwise the chips are deselected again
    /// and the running conversions continue undisturbed.
    pub fn poll<B: ConverterBus>(&mut self, bus: &mut B) -> Option<AdcSample> {
        self.cs.set_low();
        bus.settle();

        let sample = if bus.data1_level() {
            None
        } else {
            let mut first = [0; 3];
            let mut second = [0; 3];
            for i in 0..3 {
                let (byte_a, byte_b) = bus.read_byte_pair();
                first[i] = byte_a;
                second[i] = byte_b;
            }
            // Deselect and reselect so the next conversion starts now
            // rather than on the final deassert below
            self.cs.set_high();
            bus.settle();
            self.cs.set_low();
            bus.settle();
            Some(AdcSample::from_channels(first, second))
        };

        self.cs.set_high();
        bus.settle();
        sample
    }
}
