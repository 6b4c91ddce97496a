//! Register map and bitfield views of the DS3231 register file.
//!
//! [`RegAddr`] is the static register table: every address 0x00-0x12 with
//! its display names and its role inside a multi-register block. The
//! bitfield types below are read-only views used by the decoder to pull
//! flags and values out of a captured register byte.

use bitfield::bitfield;

use crate::block::BlockKind;
use crate::error::DecoderError;
use crate::field::{self, Hour, Meridiem};

/// Number of registers in the DS3231 register file.
pub const REGISTER_COUNT: usize = 19;

/// Register addresses for the DS3231 RTC.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Seconds register (0-59)
    Seconds = 0x00,
    /// Minutes register (0-59)
    Minutes = 0x01,
    /// Hours register (1-12 + AM/PM or 0-23)
    Hours = 0x02,
    /// Day register (1-7)
    Day = 0x03,
    /// Date register (1-31)
    Date = 0x04,
    /// Month register (1-12)
    Month = 0x05,
    /// Year register (0-99)
    Year = 0x06,
    /// Alarm 1 seconds register
    Alarm1Seconds = 0x07,
    /// Alarm 1 minutes register
    Alarm1Minutes = 0x08,
    /// Alarm 1 hours register
    Alarm1Hours = 0x09,
    /// Alarm 1 day/date register
    Alarm1DayDate = 0x0A,
    /// Alarm 2 minutes register
    Alarm2Minutes = 0x0B,
    /// Alarm 2 hours register
    Alarm2Hours = 0x0C,
    /// Alarm 2 day/date register
    Alarm2DayDate = 0x0D,
    /// Control register
    Control = 0x0E,
    /// Control/Status register
    ControlStatus = 0x0F,
    /// Aging offset register
    AgingOffset = 0x10,
    /// Temperature MSB register
    MSBTemp = 0x11,
    /// Temperature LSB register
    LSBTemp = 0x12,
}

impl RegAddr {
    /// All registers in address order.
    pub const ALL: [RegAddr; REGISTER_COUNT] = [
        RegAddr::Seconds,
        RegAddr::Minutes,
        RegAddr::Hours,
        RegAddr::Day,
        RegAddr::Date,
        RegAddr::Month,
        RegAddr::Year,
        RegAddr::Alarm1Seconds,
        RegAddr::Alarm1Minutes,
        RegAddr::Alarm1Hours,
        RegAddr::Alarm1DayDate,
        RegAddr::Alarm2Minutes,
        RegAddr::Alarm2Hours,
        RegAddr::Alarm2DayDate,
        RegAddr::Control,
        RegAddr::ControlStatus,
        RegAddr::AgingOffset,
        RegAddr::MSBTemp,
        RegAddr::LSBTemp,
    ];

    /// The register the device's pointer moves to after an access.
    ///
    /// The pointer wraps from 0x12 back to 0x00.
    #[must_use]
    pub fn next(self) -> RegAddr {
        Self::ALL[(self as usize + 1) % REGISTER_COUNT]
    }

    /// Register names, most to least verbose.
    #[must_use]
    pub fn names(self) -> &'static [&'static str] {
        match self {
            RegAddr::Seconds => &["Seconds", "Sec", "S"],
            RegAddr::Minutes => &["Minutes", "Min", "M"],
            RegAddr::Hours => &["Hours", "H"],
            RegAddr::Day => &["Day of week", "Day", "D"],
            RegAddr::Date => &["Date", "D"],
            RegAddr::Month => &["Month", "Mon", "M"],
            RegAddr::Year => &["Year", "Y"],
            RegAddr::Alarm1Seconds => &["Alarm1 Seconds", "Al1 Sec", "A1S"],
            RegAddr::Alarm1Minutes => &["Alarm1 Minutes", "Al1 Min", "A1M"],
            RegAddr::Alarm1Hours => &["Alarm1 Hours", "Al1 Hr", "A1H"],
            RegAddr::Alarm1DayDate => &["Alarm1 Date or Day of week", "Al1 Day / DOW", "A1DD"],
            RegAddr::Alarm2Minutes => &["Alarm2 Minutes", "Al2 Min", "A2M"],
            RegAddr::Alarm2Hours => &["Alarm2 Hours", "Al2 Hr", "A2H"],
            RegAddr::Alarm2DayDate => &["Alarm2 Date or Day of week", "Al2 Day / DOW", "A2DD"],
            RegAddr::Control => &["Control", "Ctrl", "C"],
            RegAddr::ControlStatus => &["Control / Status", "Ctrl/Stat", "C/S"],
            RegAddr::AgingOffset => &["Aging offset", "Aging", "A"],
            RegAddr::MSBTemp => &["Temperature MSB", "tm", "t"],
            RegAddr::LSBTemp => &["Temperature LSB", "tl", "t"],
        }
    }

    /// The block this register belongs to and its position inside it.
    ///
    /// Control, Control/Status and Aging Offset are standalone registers.
    #[must_use]
    pub fn block_role(self) -> Option<(BlockKind, u8)> {
        let addr = self as u8;
        let block = match self {
            RegAddr::Seconds
            | RegAddr::Minutes
            | RegAddr::Hours
            | RegAddr::Day
            | RegAddr::Date
            | RegAddr::Month
            | RegAddr::Year => BlockKind::DateTime,
            RegAddr::Alarm1Seconds
            | RegAddr::Alarm1Minutes
            | RegAddr::Alarm1Hours
            | RegAddr::Alarm1DayDate => BlockKind::Alarm1,
            RegAddr::Alarm2Minutes | RegAddr::Alarm2Hours | RegAddr::Alarm2DayDate => {
                BlockKind::Alarm2
            }
            RegAddr::MSBTemp | RegAddr::LSBTemp => BlockKind::Temperature,
            RegAddr::Control | RegAddr::ControlStatus | RegAddr::AgingOffset => return None,
        };
        Some((block, addr - block.first() as u8))
    }
}

impl TryFrom<u8> for RegAddr {
    type Error = DecoderError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(v))
            .copied()
            .ok_or(DecoderError::RegisterPointerOutOfRange(v))
    }
}

impl From<RegAddr> for u8 {
    fn from(v: RegAddr) -> Self {
        v as u8
    }
}

/// Time representation format selected by bit 6 of an hours register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeRepresentation {
    /// 24-hour format (0-23)
    TwentyFourHour = 0,
    /// 12-hour format (1-12 + AM/PM)
    TwelveHour = 1,
}
impl From<u8> for TimeRepresentation {
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => TimeRepresentation::TwentyFourHour,
            1 => TimeRepresentation::TwelveHour,
            _ => panic!("Invalid value for TimeRepresentation: {}", v),
        }
    }
}

/// INT/SQW pin function selected by the INTCN bit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptControl {
    /// Output square wave on INT/SQW pin
    SquareWave = 0,
    /// Output alarm interrupt on INT/SQW pin
    Interrupt = 1,
}
impl From<u8> for InterruptControl {
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => InterruptControl::SquareWave,
            1 => InterruptControl::Interrupt,
            _ => panic!("Invalid value for InterruptControl: {}", v),
        }
    }
}

/// Square wave output rate (RS2/RS1), DS3231SN only.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SquareWaveFrequency {
    /// 1 Hz square wave output
    Hz1 = 0b00,
    /// 1.024 kHz square wave output
    Hz1024 = 0b01,
    /// 4.096 kHz square wave output
    Hz4096 = 0b10,
    /// 8.192 kHz square wave output
    Hz8192 = 0b11,
}
impl From<u8> for SquareWaveFrequency {
    /// # Panics
    /// Panics if the value does not fit in two bits.
    fn from(v: u8) -> Self {
        match v {
            0b00 => SquareWaveFrequency::Hz1,
            0b01 => SquareWaveFrequency::Hz1024,
            0b10 => SquareWaveFrequency::Hz4096,
            0b11 => SquareWaveFrequency::Hz8192,
            _ => panic!("Invalid value for SquareWaveFrequency: {}", v),
        }
    }
}
impl SquareWaveFrequency {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SquareWaveFrequency::Hz1 => "1Hz",
            SquareWaveFrequency::Hz1024 => "1024Hz",
            SquareWaveFrequency::Hz4096 => "4096Hz",
            SquareWaveFrequency::Hz8192 => "8192Hz",
        }
    }
}

/// Day/Date select for alarm registers (DY/DT bit).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DayDateSelect {
    /// Match against date of the month (1-31)
    Date = 0,
    /// Match against day of the week (1-7)
    Day = 1,
}
impl From<u8> for DayDateSelect {
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => DayDateSelect::Date,
            1 => DayDateSelect::Day,
            _ => panic!("Invalid value for DayDateSelect: {}", v),
        }
    }
}

// Generates From<u8> for a register view
macro_rules! from_register_u8 {
    ($($typ:ident),+ $(,)?) => {
        $(
            impl From<u8> for $typ {
                fn from(v: u8) -> Self {
                    paste::paste!([< $typ >](v))
                }
            }
        )+
    };
}

bitfield! {
    /// Seconds register, also the layout of Alarm 1 seconds.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Seconds(u8);
    impl Debug;
    /// A1M1 on the alarm register, always 0 on the clock register
    pub alarm_mask, _: 7;
}

impl Seconds {
    /// Seconds (0-59)
    #[must_use]
    pub fn value(&self) -> u8 {
        field::bcd(self.0, 0x7F)
    }
}

bitfield! {
    /// Minutes register, also the layout of both alarm minutes registers.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Minutes(u8);
    impl Debug;
    /// A1M2/A2M2 on the alarm registers
    pub alarm_mask, _: 7;
}

impl Minutes {
    /// Minutes (0-59)
    #[must_use]
    pub fn value(&self) -> u8 {
        field::bcd(self.0, 0x7F)
    }
}

bitfield! {
    /// Hours register, also the layout of both alarm hours registers.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Hours(u8);
    impl Debug;
    /// A1M3/A2M3 on the alarm registers
    pub alarm_mask, _: 7;
    /// Time representation format (12/24 hour)
    pub into TimeRepresentation, time_representation, _: 6, 6;
    /// PM flag (12-hour) or 20-hour bit (24-hour)
    pub pm_or_twenty_hours, _: 5;
}

impl Hours {
    /// Decodes the hour in the register's own representation.
    ///
    /// In 12-hour mode bit 5 is the PM flag and bits 4..0 hold the BCD hour;
    /// in 24-hour mode bits 5..0 hold the BCD hour.
    #[must_use]
    pub fn hour(&self) -> Hour {
        match self.time_representation() {
            TimeRepresentation::TwelveHour => Hour {
                value: field::bcd(self.0, 0x1F),
                meridiem: Some(if self.pm_or_twenty_hours() {
                    Meridiem::Pm
                } else {
                    Meridiem::Am
                }),
            },
            TimeRepresentation::TwentyFourHour => Hour {
                value: field::bcd(self.0, 0x3F),
                meridiem: None,
            },
        }
    }
}

/// Day of week register (1-7).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Day(pub u8);

impl Day {
    /// Weekday index, 1 is the configured first day of the week
    #[must_use]
    pub fn index(&self) -> u8 {
        field::bit_range(self.0, 2, 0)
    }
}

/// Date register (1-31).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Date(pub u8);

impl Date {
    #[must_use]
    pub fn value(&self) -> u8 {
        field::bcd(self.0, 0x3F)
    }
}

bitfield! {
    /// Month register (1-12) with century flag.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Month(u8);
    impl Debug;
    /// Century flag, toggled when the year wraps from 99 to 00
    pub century, _: 7;
}

impl Month {
    #[must_use]
    pub fn value(&self) -> u8 {
        field::bcd(self.0, 0x1F)
    }
}

/// Year register (0-99).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Year(pub u8);

impl Year {
    /// Offset from 2000
    #[must_use]
    pub fn offset(&self) -> u8 {
        field::bcd(self.0, 0xFF)
    }
}

bitfield! {
    /// Alarm Day/Date register (used by both Alarm 1 and Alarm 2).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmDayDate(u8);
    impl Debug;
    /// A1M4/A2M4
    pub alarm_mask, _: 7;
    /// Day/Date select (1=day of week, 0=date of month)
    pub into DayDateSelect, day_date_select, _: 6, 6;
}

impl AlarmDayDate {
    /// Weekday index when DY/DT=1
    #[must_use]
    pub fn day(&self) -> u8 {
        field::bit_range(self.0, 2, 0)
    }

    /// Date of month when DY/DT=0
    #[must_use]
    pub fn date(&self) -> u8 {
        field::bcd(self.0, 0x3F)
    }
}

bitfield! {
    /// Control register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control(u8);
    impl Debug;
    /// /EOSC, set when the oscillator is stopped on battery power
    pub not_enable_oscillator, _: 7;
    /// Enable square wave output on battery power
    pub battery_backed_square_wave, _: 6;
    /// Force temperature conversion
    pub convert_temperature, _: 5;
    /// Square wave output frequency selection (reserved on DS3231M)
    pub into SquareWaveFrequency, square_wave_frequency, _: 4, 3;
    /// INT/SQW pin function control
    pub into InterruptControl, interrupt_control, _: 2, 2;
    /// Enable alarm 2 interrupt
    pub alarm2_interrupt_enable, _: 1;
    /// Enable alarm 1 interrupt
    pub alarm1_interrupt_enable, _: 0;
}

bitfield! {
    /// Control/Status register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Status(u8);
    impl Debug;
    /// Oscillator stop flag
    pub oscillator_stop_flag, _: 7;
    /// Enable 32kHz output
    pub enable_32khz_output, _: 3;
    /// Device busy flag (TCXO conversion in progress)
    pub busy, _: 2;
    /// Alarm 2 triggered flag
    pub alarm2_flag, _: 1;
    /// Alarm 1 triggered flag
    pub alarm1_flag, _: 0;
}

bitfield! {
    /// Aging offset register for oscillator adjustment.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AgingOffset(u8);
    impl Debug;
    /// Aging offset value (-128 to +127)
    pub i8, aging_offset, _: 7, 0;
}

/// Temperature fraction register.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TemperatureFraction(pub u8);

impl TemperatureFraction {
    /// Quarter degrees (0-3) from bits 7..6
    #[must_use]
    pub fn quarters(&self) -> u8 {
        field::bit_range(self.0, 7, 6)
    }
}

from_register_u8!(
    Seconds,
    Minutes,
    Hours,
    Day,
    Date,
    Month,
    Year,
    AlarmDayDate,
    Control,
    Status,
    AgingOffset,
    TemperatureFraction,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reg_addr_try_from() {
        for (i, reg) in RegAddr::ALL.iter().enumerate() {
            assert_eq!(RegAddr::try_from(i as u8).unwrap(), *reg);
            assert_eq!(u8::from(*reg), i as u8);
        }
        assert!(matches!(
            RegAddr::try_from(0x13),
            Err(DecoderError::RegisterPointerOutOfRange(0x13))
        ));
        assert!(RegAddr::try_from(0xFF).is_err());
    }

    #[test]
    fn test_reg_addr_next_wraps() {
        assert_eq!(RegAddr::Seconds.next(), RegAddr::Minutes);
        assert_eq!(RegAddr::Year.next(), RegAddr::Alarm1Seconds);
        assert_eq!(RegAddr::AgingOffset.next(), RegAddr::MSBTemp);
        assert_eq!(RegAddr::LSBTemp.next(), RegAddr::Seconds);
    }

    #[test]
    fn test_reg_addr_next_advances_modulo_register_count() {
        for start in RegAddr::ALL {
            for n in 0..50usize {
                let mut reg = start;
                for _ in 0..n {
                    reg = reg.next();
                }
                assert_eq!(reg as usize, (start as usize + n) % REGISTER_COUNT);
            }
        }
    }

    #[test]
    fn test_block_roles() {
        assert_eq!(RegAddr::Seconds.block_role(), Some((BlockKind::DateTime, 0)));
        assert_eq!(RegAddr::Year.block_role(), Some((BlockKind::DateTime, 6)));
        assert_eq!(RegAddr::Alarm1Seconds.block_role(), Some((BlockKind::Alarm1, 0)));
        assert_eq!(RegAddr::Alarm1DayDate.block_role(), Some((BlockKind::Alarm1, 3)));
        assert_eq!(RegAddr::Alarm2Minutes.block_role(), Some((BlockKind::Alarm2, 0)));
        assert_eq!(RegAddr::Alarm2DayDate.block_role(), Some((BlockKind::Alarm2, 2)));
        assert_eq!(RegAddr::MSBTemp.block_role(), Some((BlockKind::Temperature, 0)));
        assert_eq!(RegAddr::LSBTemp.block_role(), Some((BlockKind::Temperature, 1)));
        assert_eq!(RegAddr::Control.block_role(), None);
        assert_eq!(RegAddr::ControlStatus.block_role(), None);
        assert_eq!(RegAddr::AgingOffset.block_role(), None);
    }

    #[test]
    fn test_every_register_has_names() {
        for reg in RegAddr::ALL {
            assert!(!reg.names().is_empty());
        }
        assert_eq!(RegAddr::ControlStatus.names()[0], "Control / Status");
    }

    #[test]
    fn test_time_register_views() {
        assert_eq!(Seconds::from(0x59).value(), 59);
        assert!(!Seconds::from(0x59).alarm_mask());
        assert_eq!(Minutes::from(0x45).value(), 45);

        let hours = Hours::from(0x72);
        assert_eq!(hours.time_representation(), TimeRepresentation::TwelveHour);
        assert!(hours.pm_or_twenty_hours());
        assert_eq!(hours.hour().meridiem, Some(Meridiem::Pm));

        let hours = Hours::from(0x23);
        assert_eq!(hours.time_representation(), TimeRepresentation::TwentyFourHour);
        assert_eq!(hours.hour().value, 23);

        assert_eq!(Day::from(0xF3).index(), 3);
        assert_eq!(Date::from(0x31).value(), 31);

        let month = Month::from(0x81);
        assert!(month.century());
        assert_eq!(month.value(), 1);
        assert_eq!(Month::from(0x12).value(), 12);

        assert_eq!(Year::from(0x99).offset(), 99);
    }

    #[test]
    fn test_alarm_register_views() {
        let seconds = Seconds::from(0xB9);
        assert!(seconds.alarm_mask());
        assert_eq!(seconds.value(), 39);

        let day_date = AlarmDayDate::from(0xC3);
        assert!(day_date.alarm_mask());
        assert_eq!(day_date.day_date_select(), DayDateSelect::Day);
        assert_eq!(day_date.day(), 3);

        let day_date = AlarmDayDate::from(0x29);
        assert!(!day_date.alarm_mask());
        assert_eq!(day_date.day_date_select(), DayDateSelect::Date);
        assert_eq!(day_date.date(), 29);
    }

    #[test]
    fn test_control_register_view() {
        let control = Control::from(0xFF);
        assert!(control.not_enable_oscillator());
        assert!(control.battery_backed_square_wave());
        assert!(control.convert_temperature());
        assert_eq!(control.square_wave_frequency(), SquareWaveFrequency::Hz8192);
        assert_eq!(control.interrupt_control(), InterruptControl::Interrupt);
        assert!(control.alarm2_interrupt_enable());
        assert!(control.alarm1_interrupt_enable());

        let control = Control::from(0x1C);
        assert!(!control.not_enable_oscillator());
        assert_eq!(control.square_wave_frequency(), SquareWaveFrequency::Hz8192);
        assert_eq!(control.interrupt_control(), InterruptControl::Interrupt);
        assert!(!control.alarm1_interrupt_enable());

        assert_eq!(
            Control::from(0x08).square_wave_frequency(),
            SquareWaveFrequency::Hz1024
        );
        assert_eq!(SquareWaveFrequency::Hz4096.label(), "4096Hz");
    }

    #[test]
    fn test_status_register_view() {
        let status = Status::from(0x8F);
        assert!(status.oscillator_stop_flag());
        assert!(status.enable_32khz_output());
        assert!(status.busy());
        assert!(status.alarm2_flag());
        assert!(status.alarm1_flag());

        let status = Status::from(0x88);
        assert!(status.oscillator_stop_flag());
        assert!(status.enable_32khz_output());
        assert!(!status.busy());
        assert!(!status.alarm1_flag());
    }

    #[test]
    fn test_signed_register_views() {
        assert_eq!(AgingOffset::from(0xF6).aging_offset(), -10);
        assert_eq!(AgingOffset::from(0x7F).aging_offset(), 127);
        assert_eq!(AgingOffset::from(0x80).aging_offset(), -128);
        assert_eq!(TemperatureFraction::from(0xC0).quarters(), 3);
        assert_eq!(TemperatureFraction::from(0x55).quarters(), 1);
    }

    #[test]
    #[should_panic(expected = "Invalid value for DayDateSelect: 2")]
    fn test_invalid_day_date_select_conversion() {
        let _ = DayDateSelect::from(2);
    }

    #[test]
    #[should_panic(expected = "Invalid value for SquareWaveFrequency: 4")]
    fn test_invalid_square_wave_frequency_conversion() {
        let _ = SquareWaveFrequency::from(4);
    }
}
