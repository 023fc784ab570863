//! GPIO adapters
//!
//! Thin newtypes mapping embassy-rp pin types onto the shared
//! `kathodos-hal` pin traits.

use embassy_rp::gpio::{Flex, Input, Level, Output, Pin, Pull};
use embassy_rp::Peri;
use kathodos_hal::gpio::{FlexPin, InputPin, OutputPin};

/// Push-pull output on one RP2040 pin.
pub struct RpOutput {
    pin: Output<'static>,
}

impl RpOutput {
    pub fn new<P: Pin>(pin: Peri<'static, P>, initial_high: bool) -> Self {
        let level = if initial_high { Level::High } else { Level::Low };
        Self {
            pin: Output::new(pin, level),
        }
    }
}

impl OutputPin for RpOutput {
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

/// Input with pull-up on one RP2040 pin.
pub struct RpInput {
    pin: Input<'static>,
}

impl RpInput {
    pub fn new<P: Pin>(pin: Peri<'static, P>) -> Self {
        Self {
            pin: Input::new(pin, Pull::Up),
        }
    }
}

impl InputPin for RpInput {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

/// Bidirectional pin for the shared data line, pulled up while released.
pub struct RpFlex {
    pin: Flex<'static>,
}

impl RpFlex {
    pub fn new<P: Pin>(pin: Peri<'static, P>) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_pull(Pull::Up);
        pin.set_as_input();
        Self { pin }
    }
}

impl OutputPin for RpFlex {
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

impl InputPin for RpFlex {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

impl FlexPin for RpFlex {
    fn set_as_output(&mut self) {
        self.pin.set_as_output();
    }

    fn set_as_input(&mut self) {
        self.pin.set_as_input();
    }
}
