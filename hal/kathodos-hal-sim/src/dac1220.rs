//! Bus-level DAC1220 model
//!
//! Mirrors the slice of chip behavior the instrument relies on: command
//! framing sampled off rising clock edges, register writes with the
//! self-calibration side effect, read emission for register reads, and
//! the detector for the three-pulse reset waveform.

const OUTPUT: usize = 0x00;
const COMMAND: usize = 0x04;
const OFFSET_CAL: usize = 0x08;
const FULLSCALE_CAL: usize = 0x0C;

/// Mode bits of the command register's low byte.
const MODE_MASK: u8 = 0x03;
const MODE_SELF_CAL: u8 = 0x01;

/// Acceptance windows for the reset waveform's clock-high times, in
/// microseconds. Stage order matches the waveform: each pulse is longer
/// than the one before.
const RESET_WINDOWS_US: [(u32, u32); 3] = [(240, 320), (540, 650), (850, 1000)];

enum Phase {
    /// Shifting in the command byte.
    Command { byte: u8, bits: u8 },
    /// Shifting in write payload bytes.
    Write {
        at: usize,
        remaining: usize,
        byte: u8,
        bits: u8,
    },
    /// Shifting out read data, MSB first.
    Read { word: u32, remaining: u8 },
    /// Transaction finished, waiting for deselect.
    Done,
}

pub struct Dac1220Model {
    mem: [u8; 16],
    phase: Phase,
    selected: bool,
    out: bool,
    driving: bool,
    reset_stage: usize,
    resets: usize,
    selfcal_runs: usize,
    selfcal_result: [u8; 6],
}

impl Dac1220Model {
    pub fn new() -> Self {
        Self {
            mem: [0; 16],
            phase: Phase::Done,
            selected: false,
            out: false,
            driving: false,
            reset_stage: 0,
            resets: 0,
            selfcal_runs: 0,
            selfcal_result: [0; 6],
        }
    }

    pub fn select(&mut self) {
        self.selected = true;
        self.driving = false;
        self.phase = Phase::Command { byte: 0, bits: 0 };
    }

    pub fn deselect(&mut self) {
        self.selected = false;
        self.driving = false;
        self.phase = Phase::Done;
    }

    /// Rising clock edge with the DATA1 level the chip sees.
    pub fn clock_rise(&mut self, data1: bool) {
        if !self.selected {
            return;
        }
        match std::mem::replace(&mut self.phase, Phase::Done) {
            Phase::Command { mut byte, mut bits } => {
                byte = (byte << 1) | data1 as u8;
                bits += 1;
                self.phase = if bits < 8 {
                    Phase::Command { byte, bits }
                } else {
                    self.decode_command(byte)
                };
            }
            Phase::Write {
                mut at,
                mut remaining,
                mut byte,
                mut bits,
            } => {
                byte = (byte << 1) | data1 as u8;
                bits += 1;
                if bits < 8 {
                    self.phase = Phase::Write {
                        at,
                        remaining,
                        byte,
                        bits,
                    };
                } else {
                    self.mem[at] = byte;
                    at += 1;
                    remaining -= 1;
                    if remaining == 0 {
                        self.service_command_register();
                        self.phase = Phase::Done;
                    } else {
                        self.phase = Phase::Write {
                            at,
                            remaining,
                            byte: 0,
                            bits: 0,
                        };
                    }
                }
            }
            Phase::Read { word, mut remaining } => {
                if remaining > 0 {
                    remaining -= 1;
                    self.out = (word >> remaining) & 1 == 1;
                    self.driving = true;
                }
                self.phase = Phase::Read { word, remaining };
            }
            Phase::Done => {}
        }
    }

    /// Falling clock edge with the measured high time.
    pub fn clock_fall(&mut self, width_us: u32) {
        if !self.selected {
            return;
        }
        let (lo, hi) = RESET_WINDOWS_US[self.reset_stage];
        if (lo..=hi).contains(&width_us) {
            self.reset_stage += 1;
            if self.reset_stage == RESET_WINDOWS_US.len() {
                self.power_on_reset();
            }
        } else {
            // A stray long pulse may still be the start of a new waveform
            let (lo0, hi0) = RESET_WINDOWS_US[0];
            self.reset_stage = if (lo0..=hi0).contains(&width_us) { 1 } else { 0 };
        }
    }

    fn decode_command(&mut self, cmd: u8) -> Phase {
        let read = cmd & 0x80 != 0;
        let len = ((cmd >> 5) & 0x03) as usize + 1;
        let at = (cmd & 0x1F) as usize;
        if read {
            let mut word = 0u32;
            for i in 0..len {
                word = (word << 8) | u32::from(self.mem[at + i]);
            }
            Phase::Read {
                word,
                remaining: (len * 8) as u8,
            }
        } else {
            Phase::Write {
                at,
                remaining: len,
                byte: 0,
                bits: 0,
            }
        }
    }

    fn service_command_register(&mut self) {
        if self.mem[COMMAND + 1] & MODE_MASK == MODE_SELF_CAL {
            self.selfcal_runs += 1;
            self.mem[OFFSET_CAL..OFFSET_CAL + 3].copy_from_slice(&self.selfcal_result[..3]);
            self.mem[FULLSCALE_CAL..FULLSCALE_CAL + 3].copy_from_slice(&self.selfcal_result[3..]);
            // The chip drops back to normal mode when calibration ends
            self.mem[COMMAND + 1] &= !MODE_MASK;
        }
    }

    fn power_on_reset(&mut self) {
        self.mem = [0; 16];
        self.phase = Phase::Done;
        self.driving = false;
        self.reset_stage = 0;
        self.resets += 1;
    }

    pub fn driving(&self) -> bool {
        self.driving
    }

    pub fn out(&self) -> bool {
        self.out
    }

    pub fn output_code(&self) -> [u8; 3] {
        [self.mem[OUTPUT], self.mem[OUTPUT + 1], self.mem[OUTPUT + 2]]
    }

    pub fn calibration(&self) -> [u8; 6] {
        let mut cal = [0; 6];
        cal[..3].copy_from_slice(&self.mem[OFFSET_CAL..OFFSET_CAL + 3]);
        cal[3..].copy_from_slice(&self.mem[FULLSCALE_CAL..FULLSCALE_CAL + 3]);
        cal
    }

    pub fn reset_count(&self) -> usize {
        self.resets
    }

    pub fn selfcal_count(&self) -> usize {
        self.selfcal_runs
    }

    pub fn set_selfcal_result(&mut self, cal: [u8; 6]) {
        self.selfcal_result = cal;
    }
}

impl Default for Dac1220Model {
    fn default() -> Self {
        Self::new()
    }
}
