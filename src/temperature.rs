//! Temperature block (registers 0x11-0x12).

use core::fmt;

use crate::bus::Direction;
use crate::registers::TemperatureFraction;

/// A temperature reading combined from the MSB and LSB registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureRecord {
    pub direction: Direction,
    /// Signed 10-bit value in units of 0.25 degC
    pub quarter_degrees: i16,
}

impl TemperatureRecord {
    /// Combines the raw register bytes.
    ///
    /// The MSB is taken unsigned, the two fraction bits are appended and the
    /// resulting 10-bit quantity is sign-corrected once.
    #[must_use]
    pub fn from_registers(direction: Direction, msb: u8, lsb: u8) -> Self {
        let mut theta = (i16::from(msb) << 2) + i16::from(TemperatureFraction::from(lsb).quarters());
        if theta >= 512 {
            theta -= 1024;
        }
        Self {
            direction,
            quarter_degrees: theta,
        }
    }

    #[must_use]
    pub fn celsius(&self) -> f32 {
        f32::from(self.quarter_degrees) / 4.0
    }
}

impl fmt::Display for TemperatureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} block data: Temperature: {:.2}",
            self.direction,
            self.celsius()
        )
    }
}
