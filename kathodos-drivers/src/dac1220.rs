//! DAC1220 20-bit DAC driver
//!
//! Register protocol: every transaction opens with one command byte
//! carrying a read flag, the payload length and the register address,
//! followed by the payload MSB first on the shared data line. Beyond
//! plain register access the chip wants a three-pulse clock reset at
//! power-up and offers a self-calibration mode whose results land in two
//! readable calibration registers.

use kathodos_hal::gpio::OutputPin;

use crate::bus::ConverterBus;

/// DAC1220 register addresses.
pub mod reg {
    /// 20-bit output code, left-justified (3 bytes).
    pub const OUTPUT: u8 = 0x00;
    /// Command register: resolution, coding, operating mode (2 bytes).
    pub const COMMAND: u8 = 0x04;
    /// Offset calibration word (3 bytes).
    pub const OFFSET_CAL: u8 = 0x08;
    /// Full-scale calibration word (3 bytes).
    pub const FULLSCALE_CAL: u8 = 0x0C;
}

/// Read flag in the command byte.
const READ_FLAG: u8 = 0x80;

/// Command register value: 20-bit resolution, straight binary coding,
/// normal operation.
const CMR_NORMAL: [u8; 2] = [0x20, 0xA0];
/// Same configuration with the mode bits requesting self-calibration.
const CMR_SELF_CAL: [u8; 2] = [0x20, 0xA1];
/// Output register code for midscale.
const MIDSCALE: [u8; 3] = [0x80, 0x00, 0x00];

/// Clock high times of the reset waveform, in microseconds.
///
/// The chip recognizes the pattern of three increasingly long high
/// stretches; normal traffic never holds the clock high anywhere near
/// this long.
const RESET_PULSES_US: [u32; 3] = [264, 570, 903];

/// Build a command byte.
///
/// Bit 7 selects read, bits 6-5 carry the payload length minus one and
/// the low bits address the register. `payload_len` must be 1 to 4.
pub fn command_byte(read: bool, payload_len: usize, register: u8) -> u8 {
    let mut cmd = ((payload_len as u8 - 1) << 5) | register;
    if read {
        cmd |= READ_FLAG;
    }
    cmd
}

/// DAC1220 behind its chip-select line.
pub struct Dac1220<Cs> {
    cs: Cs,
}

impl<Cs: OutputPin> Dac1220<Cs> {
    /// Take ownership of the chip-select line, deasserted.
    pub fn new(mut cs: Cs) -> Self {
        cs.set_high();
        Self { cs }
    }

    /// Issue the power-on reset waveform.
    pub fn reset<B: ConverterBus>(&mut self, bus: &mut B) {
        self.cs.set_low();
        bus.settle();
        for high_us in RESET_PULSES_US {
            bus.pulse_clock_for(high_us);
        }
        self.cs.set_high();
        bus.settle();
    }

    /// Select full 20-bit resolution with straight-binary coding and
    /// park the output at midscale.
    pub fn configure<B: ConverterBus>(&mut self, bus: &mut B) {
        self.write_register(bus, reg::COMMAND, &CMR_NORMAL);
        self.write_register(bus, reg::OUTPUT, &MIDSCALE);
    }

    /// Write a left-justified 20-bit code to the output register.
    pub fn set_output<B: ConverterBus>(&mut self, bus: &mut B, code: [u8; 3]) {
        self.write_register(bus, reg::OUTPUT, &code);
    }

    /// Start self-calibration.
    ///
    /// The chip raises no completion flag; callers wait out the fixed
    /// calibration time before touching the calibration registers.
    pub fn begin_self_calibration<B: ConverterBus>(&mut self, bus: &mut B) {
        self.write_register(bus, reg::COMMAND, &CMR_SELF_CAL);
    }

    /// Read the offset and full-scale calibration registers back to
    /// back, offset word first.
    pub fn read_calibration<B: ConverterBus>(&mut self, bus: &mut B) -> [u8; 6] {
        let mut cal = [0; 6];
        let (offset, fullscale) = cal.split_at_mut(3);
        self.read_register(bus, reg::OFFSET_CAL, offset);
        self.read_register(bus, reg::FULLSCALE_CAL, fullscale);
        cal
    }

    /// Load previously captured calibration words into the chip.
    pub fn write_calibration<B: ConverterBus>(&mut self, bus: &mut B, cal: [u8; 6]) {
        self.write_register(bus, reg::OFFSET_CAL, &cal[..3]);
        self.write_register(bus, reg::FULLSCALE_CAL, &cal[3..]);
    }

    fn write_register<B: ConverterBus>(&mut self, bus: &mut B, register: u8, payload: &[u8]) {
        self.cs.set_low();
        bus.settle();
        bus.data1_to_output();
        bus.write_byte(command_byte(false, payload.len(), register));
        for &byte in payload {
            bus.write_byte(byte);
        }
        bus.data1_to_input();
        self.cs.set_high();
        bus.settle();
    }

    fn read_register<B: ConverterBus>(&mut self, bus: &mut B, register: u8, out: &mut [u8]) {
        self.cs.set_low();
        bus.settle();
        bus.data1_to_output();
        bus.write_byte(command_byte(true, out.len(), register));
        bus.data1_to_input();
        bus.settle();
        for byte in out.iter_mut() {
            *byte = bus.read_byte();
        }
        self.cs.set_high();
        bus.settle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::tests_support::{MockBus, Op};

    #[test]
    fn test_command_byte_layout() {
        assert_eq!(command_byte(false, 2, reg::COMMAND), 0x24);
        assert_eq!(command_byte(false, 3, reg::OUTPUT), 0x40);
        assert_eq!(command_byte(true, 2, reg::COMMAND), 0xA4);
        assert_eq!(command_byte(true, 3, reg::OFFSET_CAL), 0xC8);
        assert_eq!(command_byte(true, 3, reg::FULLSCALE_CAL), 0xCC);
    }

    #[test]
    fn test_write_framing() {
        let mut bus = MockBus::new(&[]);
        let mut dac = Dac1220::new(MockCs::default());
        dac.set_output(&mut bus, [0x12, 0x34, 0x56]);
        let expected = [
            Op::Settle,
            Op::Data1Out,
            Op::Write(0x40),
            Op::Write(0x12),
            Op::Write(0x34),
            Op::Write(0x56),
            Op::Data1In,
            Op::Settle,
        ];
        assert_eq!(bus.ops(), expected);
        assert!(dac.cs.level);
    }

    #[test]
    fn test_configure_sets_command_register_then_midscale() {
        let mut bus = MockBus::new(&[]);
        let mut dac = Dac1220::new(MockCs::default());
        dac.configure(&mut bus);
        let writes: [u8; 6] = bus.written();
        assert_eq!(writes, [0x24, 0x20, 0xA0, 0x40, 0x80, 0x00]);
    }

    #[test]
    fn test_self_calibration_only_touches_the_mode_bits() {
        let mut bus = MockBus::new(&[]);
        let mut dac = Dac1220::new(MockCs::default());
        dac.begin_self_calibration(&mut bus);
        let writes: [u8; 3] = bus.written();
        assert_eq!(writes, [0x24, 0x20, 0xA1]);
    }

    #[test]
    fn test_read_calibration_concatenates_both_words() {
        let mut bus = MockBus::new(&[0x0C, 0xAF, 0xFE, 0x0B, 0xEE, 0xF5]);
        let mut dac = Dac1220::new(MockCs::default());
        let cal = dac.read_calibration(&mut bus);
        assert_eq!(cal, [0x0C, 0xAF, 0xFE, 0x0B, 0xEE, 0xF5]);
        let writes: [u8; 2] = bus.written();
        assert_eq!(writes, [0xC8, 0xCC]);
        // The turnaround settle sits between releasing DATA1 and reading
        let ops = bus.ops();
        let turnaround = ops
            .windows(3)
            .any(|w| w == [Op::Data1In, Op::Settle, Op::Read]);
        assert!(turnaround);
    }

    #[test]
    fn test_reset_waveform() {
        let mut bus = MockBus::new(&[]);
        let mut dac = Dac1220::new(MockCs::default());
        dac.reset(&mut bus);
        let expected = [
            Op::Settle,
            Op::PulseFor(264),
            Op::PulseFor(570),
            Op::PulseFor(903),
            Op::Settle,
        ];
        assert_eq!(bus.ops(), expected);
        assert!(dac.cs.level);
    }

    #[derive(Default)]
    struct MockCs {
        level: bool,
    }

    impl kathodos_hal::gpio::OutputPin for MockCs {
        fn set_high(&mut self) {
            self.level = true;
        }

        fn set_low(&mut self) {
            self.level = false;
        }

        fn is_set_high(&self) -> bool {
            self.level
        }
    }
}
