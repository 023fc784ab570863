//! Front panel relay control
//!
//! The instrument's switching hardware: the cell-connect relay, the
//! potentiostatic/galvanostatic mode relay, and three current-range
//! relays, all plain GPIO-driven outputs.

use embedded_hal::delay::DelayNs;
use kathodos_hal::gpio::OutputPin;
use kathodos_protocol::{Mode, Range};

/// Relay settle time when switching ranges
pub const RANGE_SWITCH_DELAY_MS: u32 = 10;

/// Snapshot of the switching state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    /// Cell-connect relay closed
    pub cell_enabled: bool,
    /// Active control mode
    pub mode: Mode,
    /// Active current-sense range
    pub range: Range,
}

impl DeviceState {
    /// State the panel drives at power-up
    pub const POWER_ON: DeviceState = DeviceState {
        cell_enabled: false,
        mode: Mode::Potentiostatic,
        range: Range::Range1,
    };
}

/// The instrument's relay bank
pub struct FrontPanel<P> {
    cell: P,
    mode: P,
    ranges: [P; 3],
    state: DeviceState,
}

impl<P: OutputPin> FrontPanel<P> {
    /// Take ownership of the relay pins and drive the power-on state:
    /// cell disconnected, potentiostatic, range 1
    pub fn new(cell: P, mode: P, ranges: [P; 3]) -> Self {
        let mut panel = Self {
            cell,
            mode,
            ranges,
            state: DeviceState::POWER_ON,
        };
        panel.cell.set_low();
        panel.mode.set_low();
        for pin in &mut panel.ranges {
            pin.set_low();
        }
        let active = panel.state.range.index();
        panel.ranges[active].set_high();
        panel
    }

    /// Connect or disconnect the cell
    pub fn set_cell(&mut self, enabled: bool) {
        self.cell.set_state(enabled);
        self.state.cell_enabled = enabled;
    }

    /// Select the control mode (relay energized = galvanostatic)
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode.set_state(matches!(mode, Mode::Galvanostatic));
        self.state.mode = mode;
    }

    /// Switch to `range`, make-before-break
    ///
    /// The new range relay is energized first and held for
    /// [`RANGE_SWITCH_DELAY_MS`] before the others release, so the current
    /// sense path never passes through an all-off transient.
    pub fn select_range(&mut self, range: Range, delay: &mut impl DelayNs) {
        self.ranges[range.index()].set_high();
        delay.delay_ms(RANGE_SWITCH_DELAY_MS);
        for (i, pin) in self.ranges.iter_mut().enumerate() {
            if i != range.index() {
                pin.set_low();
            }
        }
        self.state.range = range;
    }

    /// Current switching state
    pub fn state(&self) -> DeviceState {
        self.state
    }
}
