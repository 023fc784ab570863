//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins that can be implemented
//! by chip-specific HALs. All operations are infallible: a pin that exists
//! can always be driven or read.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Pin whose direction can be switched at runtime
///
/// The shared data line of the instrument bus is driven by the MCU while
/// shifting a command out, then released so the addressed chip can drive
/// it back. While configured as an input, [`OutputPin`] calls only latch
/// the level that will appear once the pin is switched back to output.
pub trait FlexPin: OutputPin + InputPin {
    /// Configure the pin as an output, driving the last set level
    fn set_as_output(&mut self);

    /// Release the pin to high-impedance input
    fn set_as_input(&mut self);
}
