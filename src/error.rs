//! Errors reported while setting up a decoder.
//!
//! Decoding itself never fails: unexpected traffic is reported as warning
//! annotations and the session carries on.

use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderError {
    /// A register pointer past the last register (0x12)
    RegisterPointerOutOfRange(u8),
    /// Subtype option other than `SN` or `M`
    UnknownSubtype,
    /// First-day-of-week option other than `Monday`, `Sunday` or `Saturday`
    UnknownFirstDayOfWeek,
}

impl fmt::Display for DecoderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecoderError::RegisterPointerOutOfRange(v) => {
                write!(f, "register pointer 0x{:02X} is out of range", v)
            }
            DecoderError::UnknownSubtype => f.write_str("unknown DS3231 subtype"),
            DecoderError::UnknownFirstDayOfWeek => f.write_str("unknown first day of week"),
        }
    }
}

impl core::error::Error for DecoderError {}
