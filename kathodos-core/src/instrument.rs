//! Command execution
//!
//! [`Instrument`] owns every piece of state a command can touch: the relay
//! panel, the analog front end, the calibration store, and the delay
//! provider for the fixed settle waits. The transport hands each inbound
//! frame to [`Instrument::handle`] and transmits the returned reply.
//! Nothing else mutates instrument state, so command execution needs no
//! locking; mutual exclusion is structural.

use embedded_hal::delay::DelayNs;
use kathodos_hal::gpio::OutputPin;
use kathodos_hal::storage::{BlockStorage, CalSlot};
use kathodos_protocol::{Command, Reply};

use crate::calibration::CalibrationStore;
use crate::panel::{DeviceState, FrontPanel};
use crate::traits::{AdcPort, DacPort};

/// Analog supply settle time at power-up, before and after the DAC reset
pub const POWER_UP_DELAY_MS: u32 = 25;

/// Wait for the DAC's self-calibration to finish
///
/// The chip offers no completion flag; this is a conservative fixed wait.
pub const SELF_CAL_DELAY_MS: u32 = 500;

/// The command-addressable instrument
pub struct Instrument<P, A, S, D> {
    panel: FrontPanel<P>,
    afe: A,
    store: CalibrationStore<S>,
    delay: D,
}

impl<P, A, S, D> Instrument<P, A, S, D>
where
    P: OutputPin,
    A: AdcPort + DacPort,
    S: BlockStorage,
    D: DelayNs,
{
    /// Bring the instrument up
    ///
    /// Power-on sequence: let the analog supplies settle, reset the DAC,
    /// configure it (full resolution, straight binary, midscale), then
    /// load the persisted DAC calibration so the output is trimmed from
    /// the first command on.
    pub fn new(panel: FrontPanel<P>, afe: A, store: CalibrationStore<S>, delay: D) -> Self {
        let mut instrument = Self {
            panel,
            afe,
            store,
            delay,
        };
        instrument.delay.delay_ms(POWER_UP_DELAY_MS);
        instrument.afe.reset();
        instrument.delay.delay_ms(POWER_UP_DELAY_MS);
        instrument.afe.configure();
        let cal = instrument.store.read_slot(CalSlot::DacCalibration);
        instrument.afe.apply_calibration(cal);
        instrument
    }

    /// Execute one inbound frame and produce its reply
    ///
    /// Runs to completion: the reply is only returned once every state
    /// mutation and storage write has finished, so the transport can send
    /// it as the definitive outcome.
    pub fn handle(&mut self, frame: &[u8]) -> Reply {
        let command = match Command::parse(frame) {
            Some(command) => command,
            None => return Reply::Unknown,
        };

        match command {
            Command::CellOn => {
                self.panel.set_cell(true);
                Reply::Ok
            }
            Command::CellOff => {
                self.panel.set_cell(false);
                Reply::Ok
            }
            Command::SetMode(mode) => {
                self.panel.set_mode(mode);
                Reply::Ok
            }
            Command::SetRange(range) => {
                self.panel.select_range(range, &mut self.delay);
                Reply::Ok
            }
            Command::DacSet(code) => {
                self.afe.set_output(code);
                Reply::Ok
            }
            Command::DacCal => {
                self.afe.begin_self_calibration();
                self.delay.delay_ms(SELF_CAL_DELAY_MS);
                let cal = self.afe.read_calibration();
                self.store.write_slot(CalSlot::DacCalibration, &cal);
                Reply::Ok
            }
            Command::AdcRead => match self.afe.poll() {
                Some(sample) => Reply::Data(sample.as_bytes()),
                None => Reply::Wait,
            },
            Command::OffsetRead => Reply::Data(self.store.read_slot(CalSlot::Offset)),
            Command::OffsetSave(value) => {
                self.store.write_slot(CalSlot::Offset, &value);
                Reply::Ok
            }
            Command::DacCalGet => Reply::Data(self.store.read_slot(CalSlot::DacCalibration)),
            Command::DacCalSet(value) => {
                self.store.write_slot(CalSlot::DacCalibration, &value);
                self.afe.apply_calibration(value);
                Reply::Ok
            }
            Command::ShuntCalRead => Reply::Data(self.store.read_slot(CalSlot::ShuntCalibration)),
            Command::ShuntCalSave(value) => {
                self.store.write_slot(CalSlot::ShuntCalibration, &value);
                Reply::Ok
            }
        }
    }

    /// Current switching state
    pub fn state(&self) -> DeviceState {
        self.panel.state()
    }
}
