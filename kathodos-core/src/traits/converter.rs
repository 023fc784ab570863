//! Analog front end traits

/// One dual-channel ADC reading
///
/// Channel A occupies the first three bytes, channel B the last three,
/// each a 24-bit conversion word exactly as shifted off the chip (MSB
/// first). Samples travel to the host raw; the device never interprets
/// them numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcSample([u8; 6]);

impl AdcSample {
    /// Pack a sample from the two channel words
    pub fn from_channels(a: [u8; 3], b: [u8; 3]) -> Self {
        AdcSample([a[0], a[1], a[2], b[0], b[1], b[2]])
    }

    /// Channel A conversion word
    pub fn channel_a(&self) -> [u8; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    /// Channel B conversion word
    pub fn channel_b(&self) -> [u8; 3] {
        [self.0[3], self.0[4], self.0[5]]
    }

    /// Raw wire bytes, channel A then channel B
    pub fn as_bytes(&self) -> [u8; 6] {
        self.0
    }
}

/// Non-blocking ADC access
pub trait AdcPort {
    /// Poll for a completed conversion
    ///
    /// Returns the sample and re-arms the next conversion, or `None` while
    /// the converters are still busy. Never blocks: the caller decides
    /// whether to retry or surface a wait indication to the host.
    fn poll(&mut self) -> Option<AdcSample>;
}

/// DAC register access and calibration sequencing
///
/// Calibration values travel as 6 raw bytes: 3 for the offset register
/// followed by 3 for the full-scale register, the same layout the
/// calibration slot stores.
pub trait DacPort {
    /// Run the chip's power-on reset sequence
    fn reset(&mut self);

    /// Select full resolution with straight-binary coding, output at midscale
    fn configure(&mut self);

    /// Write a left-justified 20-bit code to the output register
    fn set_output(&mut self, code: [u8; 3]);

    /// Start the self-calibration routine
    ///
    /// Only initiates it. The chip needs roughly half a second before the
    /// calibration registers are valid, and offers no completion flag; the
    /// caller owns that wait.
    fn begin_self_calibration(&mut self);

    /// Read the offset + full-scale calibration registers
    fn read_calibration(&mut self) -> [u8; 6];

    /// Write the offset + full-scale calibration registers
    fn apply_calibration(&mut self, cal: [u8; 6]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_packing() {
        let sample = AdcSample::from_channels([0x01, 0x02, 0x03], [0xA1, 0xA2, 0xA3]);
        assert_eq!(sample.channel_a(), [0x01, 0x02, 0x03]);
        assert_eq!(sample.channel_b(), [0xA1, 0xA2, 0xA3]);
        assert_eq!(sample.as_bytes(), [0x01, 0x02, 0x03, 0xA1, 0xA2, 0xA3]);
    }
}
