//! Session configuration supplied by the host.

use core::str::FromStr;

use chrono::Weekday;

use crate::error::DecoderError;
use crate::registers::RegAddr;

/// DS3231 variant on the bus.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Subtype {
    /// DS3231SN, TCXO with selectable square wave rate
    #[default]
    SN,
    /// DS3231M, MEMS resonator; the rate bits are reserved
    M,
}

impl FromStr for Subtype {
    type Err = DecoderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SN" => Ok(Subtype::SN),
            "M" => Ok(Subtype::M),
            _ => Err(DecoderError::UnknownSubtype),
        }
    }
}

/// Which weekday the device's day index 1 stands for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FirstDayOfWeek {
    #[default]
    Monday,
    Sunday,
    Saturday,
}

impl FirstDayOfWeek {
    /// Maps a day register index (1-7) to a weekday.
    #[must_use]
    pub fn weekday(self, index: u8) -> Option<Weekday> {
        if !(1..=7).contains(&index) {
            return None;
        }
        let mut day = match self {
            FirstDayOfWeek::Monday => Weekday::Mon,
            FirstDayOfWeek::Sunday => Weekday::Sun,
            FirstDayOfWeek::Saturday => Weekday::Sat,
        };
        for _ in 1..index {
            day = day.succ();
        }
        Some(day)
    }
}

impl FromStr for FirstDayOfWeek {
    type Err = DecoderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Monday" => Ok(FirstDayOfWeek::Monday),
            "Sunday" => Ok(FirstDayOfWeek::Sunday),
            "Saturday" => Ok(FirstDayOfWeek::Saturday),
            _ => Err(DecoderError::UnknownFirstDayOfWeek),
        }
    }
}

/// Full English name of a weekday.
#[must_use]
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Decoder options, fixed for the lifetime of a session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub subtype: Subtype,
    /// Register pointer assumed when the capture starts mid-transaction
    pub register_pointer: u8,
    pub first_day_of_week: FirstDayOfWeek,
}

impl Config {
    /// Checks that the initial register pointer names a register.
    ///
    /// # Errors
    /// Returns [`DecoderError::RegisterPointerOutOfRange`] past 0x12.
    pub fn validate(&self) -> Result<(), DecoderError> {
        RegAddr::try_from(self.register_pointer).map(|_| ())
    }
}
