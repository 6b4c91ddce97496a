//! Bit and BCD extraction primitives shared by every register handler.

use core::fmt;

use crate::registers::{Hours, TimeRepresentation};

/// Decodes a BCD byte after applying `mask`.
///
/// The high and low nibbles are taken as independent decimal digits, so
/// non-BCD nibbles are not rejected (`0x1A` decodes to 20).
#[must_use]
pub fn bcd(byte: u8, mask: u8) -> u8 {
    let masked = byte & mask;
    (masked >> 4) * 10 + (masked & 0x0F)
}

/// Returns bits `high..=low` of `byte`, shifted down to bit 0.
///
/// # Panics
/// Panics if `high < low` or `high > 7`.
#[must_use]
pub fn bit_range(byte: u8, high: u8, low: u8) -> u8 {
    assert!(high >= low && high <= 7, "invalid bit range {}..{}", high, low);
    let width = high - low + 1;
    let mask = if width == 8 { 0xFF } else { (1u8 << width) - 1 };
    (byte >> low) & mask
}

/// Two's-complement view of a register byte.
#[must_use]
pub fn signed(byte: u8) -> i8 {
    if byte < 128 {
        byte as i8
    } else {
        (i16::from(byte) - 256) as i8
    }
}

/// AM/PM indicator of a 12-hour value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Meridiem::Am => "AM",
            Meridiem::Pm => "PM",
        }
    }
}

/// An hours value as stored on the device: 0-23, or 1-12 with a meridiem.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Hour {
    pub value: u8,
    pub meridiem: Option<Meridiem>,
}

impl Hour {
    #[must_use]
    pub fn representation(&self) -> TimeRepresentation {
        match self.meridiem {
            Some(_) => TimeRepresentation::TwelveHour,
            None => TimeRepresentation::TwentyFourHour,
        }
    }

    /// Folds the value onto the 0-23 clock.
    #[must_use]
    pub fn to_24h(&self) -> u8 {
        match (self.value, self.meridiem) {
            (h, None) => h,
            (12, Some(Meridiem::Am)) => 0,
            (12, Some(Meridiem::Pm)) => 12,
            (h, Some(Meridiem::Am)) => h,
            (h, Some(Meridiem::Pm)) => h + 12,
        }
    }

    /// The suffix appended after a rendered time, empty in 24-hour mode.
    #[must_use]
    pub fn suffix(&self) -> &'static str {
        self.meridiem.map_or("", Meridiem::as_str)
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.value)
    }
}

/// Decodes an hours register (clock or alarm).
///
/// Bit 6 selects 12-hour mode, in which bit 5 is PM and bits 4..0 hold the
/// BCD hour; otherwise bits 5..0 hold the BCD hour.
#[must_use]
pub fn hour(byte: u8) -> Hour {
    Hours::from(byte).hour()
}
