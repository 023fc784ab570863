//! Simulated converter board
//!
//! One shared [`BoardState`] behind an `Rc<RefCell<..>>` carries the MCU
//! pin levels, the virtual clock, both chip models and a trace of every
//! driven edge. Pins, the DATA1 flex pin and the delay source are all
//! cheap handles onto the shared state.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use kathodos_hal::gpio::{FlexPin, InputPin, OutputPin};

use crate::dac1220::Dac1220Model;
use crate::mcp3550::Mcp3550Model;

/// Electrical nets of the simulated board.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Net {
    Cell,
    ModeSelect,
    Range1,
    Range2,
    Range3,
    Clock,
    Data1,
    Data2,
    DacSelect,
    AdcSelect,
}

impl Net {
    const COUNT: usize = 10;

    fn index(self) -> usize {
        self as usize
    }
}

/// One driven level change and the virtual time it happened at.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TraceEntry {
    pub at_us: u64,
    pub net: Net,
    pub high: bool,
}

struct BoardState {
    now_ns: u64,
    levels: [bool; Net::COUNT],
    data1_output: bool,
    clock_high: bool,
    clock_rise_ns: u64,
    dac_selected: bool,
    adc_selected: bool,
    dac: Dac1220Model,
    adc: Mcp3550Model,
    trace: Vec<TraceEntry>,
}

impl BoardState {
    fn new() -> Self {
        Self {
            now_ns: 0,
            levels: [false; Net::COUNT],
            data1_output: false,
            clock_high: false,
            clock_rise_ns: 0,
            dac_selected: false,
            adc_selected: false,
            dac: Dac1220Model::new(),
            adc: Mcp3550Model::new(),
            trace: Vec::new(),
        }
    }

    fn now_us(&self) -> u64 {
        self.now_ns / 1_000
    }

    fn drive(&mut self, net: Net, high: bool) {
        self.trace.push(TraceEntry {
            at_us: self.now_us(),
            net,
            high,
        });
        self.levels[net.index()] = high;
        match net {
            Net::Clock => self.clock_edge(high),
            // Both selects are active low
            Net::DacSelect => {
                let selected = !high;
                if selected && !self.dac_selected {
                    self.dac.select();
                } else if !selected && self.dac_selected {
                    self.dac.deselect();
                }
                self.dac_selected = selected;
            }
            Net::AdcSelect => {
                let selected = !high;
                if selected && !self.adc_selected {
                    self.adc.select();
                } else if !selected && self.adc_selected {
                    self.adc.deselect();
                }
                self.adc_selected = selected;
            }
            _ => {}
        }
    }

    fn clock_edge(&mut self, high: bool) {
        if high && !self.clock_high {
            self.clock_high = true;
            self.clock_rise_ns = self.now_ns;
            if self.dac_selected {
                let bit = self.data1_line();
                self.dac.clock_rise(bit);
            }
        } else if !high && self.clock_high {
            self.clock_high = false;
            let width_us = ((self.now_ns - self.clock_rise_ns) / 1_000) as u32;
            if self.dac_selected {
                self.dac.clock_fall(width_us);
            }
            if self.adc_selected {
                self.adc.clock_fall();
            }
        }
    }

    /// DATA1 as seen on the wire. The MCU wins while it drives the pin;
    /// otherwise whichever chip is selected does; idle is pulled high.
    fn data1_line(&self) -> bool {
        if self.data1_output {
            self.levels[Net::Data1.index()]
        } else if self.adc_selected {
            self.adc.out1()
        } else if self.dac_selected && self.dac.driving() {
            self.dac.out()
        } else {
            true
        }
    }

    fn data2_line(&self) -> bool {
        if self.adc_selected {
            self.adc.out2()
        } else {
            true
        }
    }

    fn line(&self, net: Net) -> bool {
        match net {
            Net::Data1 => self.data1_line(),
            Net::Data2 => self.data2_line(),
            _ => self.levels[net.index()],
        }
    }
}

/// Handle to one simulated board.
pub struct SimBoard {
    state: Rc<RefCell<BoardState>>,
}

impl SimBoard {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(BoardState::new())),
        }
    }

    /// A GPIO attached to the given net.
    pub fn pin(&self, net: Net) -> SimPin {
        SimPin {
            state: Rc::clone(&self.state),
            net,
        }
    }

    /// The bidirectional DATA1 pin.
    pub fn data1(&self) -> SimFlexPin {
        SimFlexPin {
            pin: self.pin(Net::Data1),
        }
    }

    /// A delay source that advances the board's virtual clock.
    pub fn delay(&self) -> SimDelay {
        SimDelay {
            state: Rc::clone(&self.state),
        }
    }

    pub fn now_us(&self) -> u64 {
        self.state.borrow().now_us()
    }

    /// MCU-driven level of a net.
    pub fn level(&self, net: Net) -> bool {
        self.state.borrow().levels[net.index()]
    }

    /// Every driven level change so far, in order.
    pub fn trace(&self) -> Vec<TraceEntry> {
        self.state.borrow().trace.clone()
    }

    pub fn clear_trace(&self) {
        self.state.borrow_mut().trace.clear();
    }

    /// Complete a conversion pair with the given channel words.
    pub fn load_adc_sample(&self, a: [u8; 3], b: [u8; 3]) {
        self.state.borrow_mut().adc.load_sample(a, b);
    }

    /// Conversion restarts the ADC pair has seen.
    pub fn adc_retriggers(&self) -> usize {
        self.state.borrow().adc.retriggers()
    }

    /// Current DAC output register code.
    pub fn dac_output_code(&self) -> [u8; 3] {
        self.state.borrow().dac.output_code()
    }

    /// DAC offset and full-scale calibration registers, offset first.
    pub fn dac_calibration(&self) -> [u8; 6] {
        self.state.borrow().dac.calibration()
    }

    /// Reset waveforms the DAC has accepted.
    pub fn dac_reset_count(&self) -> usize {
        self.state.borrow().dac.reset_count()
    }

    /// Self-calibration runs the DAC has performed.
    pub fn dac_selfcal_count(&self) -> usize {
        self.state.borrow().dac.selfcal_count()
    }

    /// Calibration words the next DAC self-calibration will produce.
    pub fn set_dac_selfcal_result(&self, cal: [u8; 6]) {
        self.state.borrow_mut().dac.set_selfcal_result(cal);
    }
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// GPIO attached to one net of a [`SimBoard`].
#[derive(Clone)]
pub struct SimPin {
    state: Rc<RefCell<BoardState>>,
    net: Net,
}

impl OutputPin for SimPin {
    fn set_high(&mut self) {
        self.state.borrow_mut().drive(self.net, true);
    }

    fn set_low(&mut self) {
        self.state.borrow_mut().drive(self.net, false);
    }

    fn is_set_high(&self) -> bool {
        self.state.borrow().levels[self.net.index()]
    }
}

impl InputPin for SimPin {
    fn is_high(&self) -> bool {
        self.state.borrow().line(self.net)
    }
}

/// The bidirectional DATA1 pin of a [`SimBoard`].
pub struct SimFlexPin {
    pin: SimPin,
}

impl OutputPin for SimFlexPin {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

impl InputPin for SimFlexPin {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

impl FlexPin for SimFlexPin {
    fn set_as_output(&mut self) {
        self.pin.state.borrow_mut().data1_output = true;
    }

    fn set_as_input(&mut self) {
        self.pin.state.borrow_mut().data1_output = false;
    }
}

/// Delay source that advances the board's virtual clock.
pub struct SimDelay {
    state: Rc<RefCell<BoardState>>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.state.borrow_mut().now_ns += u64::from(ns);
    }
}
