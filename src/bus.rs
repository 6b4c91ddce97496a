//! Bus primitives delivered by the I2C framer.

use core::fmt;

use alloc::vec::Vec;

use crate::annotation::Span;

/// Transfer direction of an addressed access, seen from the master.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Write,
    Read,
}

impl Direction {
    /// Past-tense verb used as the prefix of block labels.
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Direction::Write => "Wrote",
            Direction::Read => "Read",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// One framed I2C event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Primitive {
    Start,
    StartRepeat,
    Stop,
    /// 7-bit slave address with the R/W bit clear
    AddressWrite(u8),
    /// 7-bit slave address with the R/W bit set
    AddressRead(u8),
    DataWrite(u8),
    DataRead(u8),
    /// Per-bit positions of the next data byte, most significant bit first
    Bits(Vec<Span>),
}
