//! Outbound reply frames
//!
//! Every dispatched command produces exactly one reply, fully formed
//! before it is handed to the transport; a reply is never written
//! incrementally and never exceeds [`MAX_REPLY_LEN`] bytes.

/// Longest reply in bytes (a raw 6-byte data block)
pub const MAX_REPLY_LEN: usize = 6;

/// Reply to a single host command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Command matched and executed
    Ok,
    /// No grammar row matched the frame; no state was touched
    Unknown,
    /// ADC conversion not finished; the host is expected to poll again
    Wait,
    /// Six raw bytes: an ADC sample or a calibration block
    Data([u8; 6]),
}

impl Reply {
    /// Wire bytes of this reply
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Reply::Ok => b"OK",
            Reply::Unknown => b"?",
            Reply::Wait => b"WAIT",
            Reply::Data(bytes) => bytes,
        }
    }
}
