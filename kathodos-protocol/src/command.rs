//! Command grammar and parsing
//!
//! The grammar is a declarative table of (literal pattern, exact frame
//! length) rows scanned in order; the first row whose length and prefix
//! both match wins. Rows are mutually exclusive by construction, so the
//! scan order cannot change the outcome. Bytes after the literal pattern
//! are binary argument data and are never re-validated as text.

/// Electrochemical control mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Hold cell voltage, measure current
    Potentiostatic,
    /// Hold cell current, measure voltage
    Galvanostatic,
}

/// Current-sense range, one relay per range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Range {
    Range1,
    Range2,
    Range3,
}

impl Range {
    /// All ranges, in relay-bank order
    pub const ALL: [Range; 3] = [Range::Range1, Range::Range2, Range::Range3];

    /// Zero-based index into the range relay bank
    pub fn index(self) -> usize {
        match self {
            Range::Range1 => 0,
            Range::Range2 => 1,
            Range::Range3 => 2,
        }
    }
}

/// A fully parsed host command
///
/// Payload-carrying variants own their bytes; the payload is copied out of
/// the inbound frame during parsing and forwarded untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Close the cell-connect relay
    CellOn,
    /// Open the cell-connect relay
    CellOff,
    /// Select the control-mode relay
    SetMode(Mode),
    /// Switch the current-sense range (make-before-break)
    SetRange(Range),
    /// Write a 20-bit code, left-justified in 3 bytes, to the DAC output register
    DacSet([u8; 3]),
    /// Run DAC self-calibration and persist the result
    DacCal,
    /// Poll the ADC pair for a completed conversion
    AdcRead,
    /// Read the measurement-offset slot
    OffsetRead,
    /// Write the measurement-offset slot
    OffsetSave([u8; 6]),
    /// Read the DAC calibration slot
    DacCalGet,
    /// Write the DAC calibration slot and load it into the DAC
    DacCalSet([u8; 6]),
    /// Read the shunt-calibration slot
    ShuntCalRead,
    /// Write the shunt-calibration slot
    ShuntCalSave([u8; 6]),
}

/// Discriminant for one grammar row
///
/// Payload bytes are only known at parse time, so the table carries this
/// flat opcode instead of a [`Command`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Opcode {
    CellOn,
    CellOff,
    Potentiostatic,
    Galvanostatic,
    Range1,
    Range2,
    Range3,
    DacSet,
    DacCal,
    AdcRead,
    OffsetRead,
    OffsetSave,
    DacCalGet,
    DacCalSet,
    ShuntCalRead,
    ShuntCalSave,
}

/// One row of the command grammar
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    /// Literal ASCII pattern the frame must start with
    pub pattern: &'static [u8],
    /// Exact total frame length, pattern plus binary payload
    pub frame_len: usize,
    /// Command the row maps to
    pub opcode: Opcode,
}

/// Longest frame in the grammar (`SHUNTCALSAVE ` plus its 6-byte payload)
pub const MAX_COMMAND_LEN: usize = 19;

/// The command grammar
pub const COMMAND_TABLE: [CommandSpec; 16] = [
    CommandSpec {
        pattern: b"CELL ON",
        frame_len: 7,
        opcode: Opcode::CellOn,
    },
    CommandSpec {
        pattern: b"CELL OFF",
        frame_len: 8,
        opcode: Opcode::CellOff,
    },
    CommandSpec {
        pattern: b"POTENTIOSTATIC",
        frame_len: 14,
        opcode: Opcode::Potentiostatic,
    },
    CommandSpec {
        pattern: b"GALVANOSTATIC",
        frame_len: 13,
        opcode: Opcode::Galvanostatic,
    },
    CommandSpec {
        pattern: b"RANGE 1",
        frame_len: 7,
        opcode: Opcode::Range1,
    },
    CommandSpec {
        pattern: b"RANGE 2",
        frame_len: 7,
        opcode: Opcode::Range2,
    },
    CommandSpec {
        pattern: b"RANGE 3",
        frame_len: 7,
        opcode: Opcode::Range3,
    },
    CommandSpec {
        pattern: b"DACSET ",
        frame_len: 10,
        opcode: Opcode::DacSet,
    },
    CommandSpec {
        pattern: b"DACCAL",
        frame_len: 6,
        opcode: Opcode::DacCal,
    },
    CommandSpec {
        pattern: b"ADCREAD",
        frame_len: 7,
        opcode: Opcode::AdcRead,
    },
    CommandSpec {
        pattern: b"OFFSETREAD",
        frame_len: 10,
        opcode: Opcode::OffsetRead,
    },
    CommandSpec {
        pattern: b"OFFSETSAVE ",
        frame_len: 17,
        opcode: Opcode::OffsetSave,
    },
    CommandSpec {
        pattern: b"DACCALGET",
        frame_len: 9,
        opcode: Opcode::DacCalGet,
    },
    CommandSpec {
        pattern: b"DACCALSET ",
        frame_len: 16,
        opcode: Opcode::DacCalSet,
    },
    CommandSpec {
        pattern: b"SHUNTCALREAD",
        frame_len: 12,
        opcode: Opcode::ShuntCalRead,
    },
    CommandSpec {
        pattern: b"SHUNTCALSAVE ",
        frame_len: 19,
        opcode: Opcode::ShuntCalSave,
    },
];

impl Command {
    /// Match a received frame against the grammar
    ///
    /// A row matches when the frame length equals the row's `frame_len`
    /// and the frame starts with the row's literal pattern. Returns `None`
    /// when no row matches; the dispatcher answers that with `?`.
    pub fn parse(frame: &[u8]) -> Option<Command> {
        let spec = COMMAND_TABLE
            .iter()
            .find(|spec| frame.len() == spec.frame_len && frame.starts_with(spec.pattern))?;
        let payload = &frame[spec.pattern.len()..];

        Some(match spec.opcode {
            Opcode::CellOn => Command::CellOn,
            Opcode::CellOff => Command::CellOff,
            Opcode::Potentiostatic => Command::SetMode(Mode::Potentiostatic),
            Opcode::Galvanostatic => Command::SetMode(Mode::Galvanostatic),
            Opcode::Range1 => Command::SetRange(Range::Range1),
            Opcode::Range2 => Command::SetRange(Range::Range2),
            Opcode::Range3 => Command::SetRange(Range::Range3),
            Opcode::DacSet => Command::DacSet(payload.try_into().ok()?),
            Opcode::DacCal => Command::DacCal,
            Opcode::AdcRead => Command::AdcRead,
            Opcode::OffsetRead => Command::OffsetRead,
            Opcode::OffsetSave => Command::OffsetSave(payload.try_into().ok()?),
            Opcode::DacCalGet => Command::DacCalGet,
            Opcode::DacCalSet => Command::DacCalSet(payload.try_into().ok()?),
            Opcode::ShuntCalRead => Command::ShuntCalRead,
            Opcode::ShuntCalSave => Command::ShuntCalSave(payload.try_into().ok()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_commands_parse() {
        assert_eq!(Command::parse(b"CELL ON"), Some(Command::CellOn));
        assert_eq!(Command::parse(b"CELL OFF"), Some(Command::CellOff));
        assert_eq!(
            Command::parse(b"POTENTIOSTATIC"),
            Some(Command::SetMode(Mode::Potentiostatic))
        );
        assert_eq!(
            Command::parse(b"GALVANOSTATIC"),
            Some(Command::SetMode(Mode::Galvanostatic))
        );
        assert_eq!(
            Command::parse(b"RANGE 1"),
            Some(Command::SetRange(Range::Range1))
        );
        assert_eq!(
            Command::parse(b"RANGE 2"),
            Some(Command::SetRange(Range::Range2))
        );
        assert_eq!(
            Command::parse(b"RANGE 3"),
            Some(Command::SetRange(Range::Range3))
        );
        assert_eq!(Command::parse(b"DACCAL"), Some(Command::DacCal));
        assert_eq!(Command::parse(b"ADCREAD"), Some(Command::AdcRead));
        assert_eq!(Command::parse(b"OFFSETREAD"), Some(Command::OffsetRead));
        assert_eq!(Command::parse(b"DACCALGET"), Some(Command::DacCalGet));
        assert_eq!(Command::parse(b"SHUNTCALREAD"), Some(Command::ShuntCalRead));
    }

    #[test]
    fn test_payload_commands_copy_bytes_verbatim() {
        assert_eq!(
            Command::parse(b"DACSET \x10\x20\x30"),
            Some(Command::DacSet([0x10, 0x20, 0x30]))
        );
        assert_eq!(
            Command::parse(b"OFFSETSAVE \x01\x02\x03\x04\x05\x06"),
            Some(Command::OffsetSave([1, 2, 3, 4, 5, 6]))
        );
        assert_eq!(
            Command::parse(b"DACCALSET \xFF\x00\xAA\x55\x80\x7F"),
            Some(Command::DacCalSet([0xFF, 0x00, 0xAA, 0x55, 0x80, 0x7F]))
        );
        assert_eq!(
            Command::parse(b"SHUNTCALSAVE \x00\x00\x00\x00\x00\x00"),
            Some(Command::ShuntCalSave([0; 6]))
        );
    }

    #[test]
    fn test_payload_may_contain_any_byte_value() {
        // Payloads that happen to spell ASCII (or contain NUL) are still binary
        assert_eq!(
            Command::parse(b"DACSET ABC"),
            Some(Command::DacSet(*b"ABC"))
        );
        assert_eq!(
            Command::parse(b"DACSET \x00\x00\x00"),
            Some(Command::DacSet([0, 0, 0]))
        );
    }

    #[test]
    fn test_unknown_frames_do_not_parse() {
        assert_eq!(Command::parse(b""), None);
        assert_eq!(Command::parse(b"?"), None);
        assert_eq!(Command::parse(b"CELL"), None);
        assert_eq!(Command::parse(b"cell on"), None);
        assert_eq!(Command::parse(b"RANGE 4"), None);
        assert_eq!(Command::parse(b"ADC READ"), None);
        assert_eq!(Command::parse(b"\xAA\xBB\xCC\xDD\xEE\xFF\x11"), None);
    }

    #[test]
    fn test_length_must_match_exactly() {
        // Right prefix, wrong total length
        assert_eq!(Command::parse(b"CELL ON "), None);
        assert_eq!(Command::parse(b"DACSET \x10\x20"), None);
        assert_eq!(Command::parse(b"DACSET \x10\x20\x30\x40"), None);
        assert_eq!(Command::parse(b"OFFSETSAVE \x01\x02\x03\x04\x05"), None);
        assert_eq!(Command::parse(b"SHUNTCALSAVE \x01\x02\x03\x04\x05\x06\x07"), None);
    }

    #[test]
    fn test_table_lengths_are_consistent() {
        for spec in &COMMAND_TABLE {
            assert!(spec.pattern.is_ascii());
            assert!(spec.frame_len >= spec.pattern.len());
            assert!(spec.frame_len <= MAX_COMMAND_LEN);
            let payload_len = spec.frame_len - spec.pattern.len();
            match spec.opcode {
                Opcode::DacSet => assert_eq!(payload_len, 3),
                Opcode::OffsetSave | Opcode::DacCalSet | Opcode::ShuntCalSave => {
                    assert_eq!(payload_len, 6)
                }
                _ => assert_eq!(payload_len, 0),
            }
        }
    }

    #[test]
    fn test_table_rows_are_mutually_exclusive() {
        // No two rows of equal frame length may share a prefix, otherwise
        // scan order would matter.
        for (i, a) in COMMAND_TABLE.iter().enumerate() {
            for b in &COMMAND_TABLE[i + 1..] {
                if a.frame_len != b.frame_len {
                    continue;
                }
                assert!(
                    !a.pattern.starts_with(b.pattern) && !b.pattern.starts_with(a.pattern),
                    "ambiguous rows: {:?} / {:?}",
                    core::str::from_utf8(a.pattern),
                    core::str::from_utf8(b.pattern),
                );
            }
        }
    }

    #[test]
    fn test_range_index() {
        assert_eq!(Range::Range1.index(), 0);
        assert_eq!(Range::Range2.index(), 1);
        assert_eq!(Range::Range3.index(), 2);
        for (i, range) in Range::ALL.iter().enumerate() {
            assert_eq!(range.index(), i);
        }
    }
}
