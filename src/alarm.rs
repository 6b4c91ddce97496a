//! Alarm blocks (registers 0x07-0x0A and 0x0B-0x0D).
//!
//! Each alarm register carries a mask bit in bit 7. Together the mask bits
//! select how often the alarm fires:
//!
//! | A1M1 | A1M2 | A1M3 | A1M4 | Alarm 1 fires           |
//! |------|------|------|------|-------------------------|
//! | 1    | 1    | 1    | 1    | every second            |
//! | 0    | 1    | 1    | 1    | when seconds match      |
//! | 0    | 0    | 1    | 1    | when mm:ss match        |
//! | 0    | 0    | 0    | 1    | when hh:mm:ss match     |
//! | 0    | 0    | 0    | 0    | when day/date and time match |
//!
//! Alarm 2 has no seconds register and uses A2M2..A2M4 the same way, one
//! level shallower. Any other combination is reported as an invalid setting.

use core::fmt;

use chrono::Weekday;

use crate::bus::Direction;
use crate::config::FirstDayOfWeek;
use crate::datetime::WeekdayLabel;
use crate::field::Hour;
use crate::registers::{AlarmDayDate, DayDateSelect, Hours, Minutes, Seconds};

/// Recurrence selected by the Alarm 1 mask bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm1Mode {
    EverySecond,
    /// Seconds match
    EveryMinute,
    /// Minutes and seconds match
    EveryHour,
    /// Hours, minutes and seconds match
    Daily,
    /// Day or date, hours, minutes and seconds match
    DayOrDate,
    Invalid,
}

impl Alarm1Mode {
    /// Interprets the four alarm 1 mask bits.
    ///
    /// # Arguments
    /// * `a1m1` - Bit 7 of the alarm 1 seconds register
    /// * `a1m2` - Bit 7 of the alarm 1 minutes register
    /// * `a1m3` - Bit 7 of the alarm 1 hours register
    /// * `a1m4` - Bit 7 of the alarm 1 day/date register
    ///
    /// # Returns
    /// * The matching mode, or [`Alarm1Mode::Invalid`] for a combination the
    ///   device does not define
    #[must_use]
    pub fn from_masks(a1m1: bool, a1m2: bool, a1m3: bool, a1m4: bool) -> Self {
        match (a1m1, a1m2, a1m3, a1m4) {
            (true, true, true, true) => Alarm1Mode::EverySecond,
            (false, true, true, true) => Alarm1Mode::EveryMinute,
            (false, false, true, true) => Alarm1Mode::EveryHour,
            (false, false, false, true) => Alarm1Mode::Daily,
            (false, false, false, false) => Alarm1Mode::DayOrDate,
            _ => Alarm1Mode::Invalid,
        }
    }
}

/// Recurrence selected by the Alarm 2 mask bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm2Mode {
    EveryMinute,
    /// Minutes match
    EveryHour,
    /// Hours and minutes match
    EveryDay,
    /// Day or date, hours and minutes match
    DayOrDate,
    Invalid,
}

impl Alarm2Mode {
    /// Interprets the three alarm 2 mask bits.
    ///
    /// # Arguments
    /// * `a2m2` - Bit 7 of the alarm 2 minutes register
    /// * `a2m3` - Bit 7 of the alarm 2 hours register
    /// * `a2m4` - Bit 7 of the alarm 2 day/date register
    ///
    /// # Returns
    /// * The matching mode, or [`Alarm2Mode::Invalid`] for a combination the
    ///   device does not define
    #[must_use]
    pub fn from_masks(a2m2: bool, a2m3: bool, a2m4: bool) -> Self {
        match (a2m2, a2m3, a2m4) {
            (true, true, true) => Alarm2Mode::EveryMinute,
            (false, true, true) => Alarm2Mode::EveryHour,
            (false, false, true) => Alarm2Mode::EveryDay,
            (false, false, false) => Alarm2Mode::DayOrDate,
            _ => Alarm2Mode::Invalid,
        }
    }
}

/// Content of an alarm day/date register, as chosen by its DY/DT bit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DayDate {
    Day { index: u8, weekday: Option<Weekday> },
    Date(u8),
}

impl DayDate {
    fn from_register(byte: u8, first_day_of_week: FirstDayOfWeek) -> Self {
        let reg = AlarmDayDate::from(byte);
        match reg.day_date_select() {
            DayDateSelect::Day => DayDate::Day {
                index: reg.day(),
                weekday: first_day_of_week.weekday(reg.day()),
            },
            DayDateSelect::Date => DayDate::Date(reg.date()),
        }
    }
}

/// A complete Alarm 1 burst.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Alarm1Record {
    pub direction: Direction,
    pub mode: Alarm1Mode,
    pub seconds: u8,
    pub minutes: u8,
    pub hours: Hour,
    pub day_date: DayDate,
}

impl Alarm1Record {
    /// Builds the record from registers 0x07-0x0A.
    ///
    /// # Arguments
    /// * `direction` - Direction of the transfer that carried the block
    /// * `data` - Raw register bytes, alarm 1 seconds first
    /// * `first_day_of_week` - Week ordering used to name a day-of-week alarm
    #[must_use]
    pub fn from_registers(
        direction: Direction,
        data: [u8; 4],
        first_day_of_week: FirstDayOfWeek,
    ) -> Self {
        let seconds = Seconds::from(data[0]);
        let minutes = Minutes::from(data[1]);
        let hours = Hours::from(data[2]);
        let day_date = AlarmDayDate::from(data[3]);
        Alarm1Record {
            direction,
            mode: Alarm1Mode::from_masks(
                seconds.alarm_mask(),
                minutes.alarm_mask(),
                hours.alarm_mask(),
                day_date.alarm_mask(),
            ),
            seconds: seconds.value(),
            minutes: minutes.value(),
            hours: hours.hour(),
            day_date: DayDate::from_register(data[3], first_day_of_week),
        }
    }
}

impl fmt::Display for Alarm1Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Alarm1: ", self.direction)?;
        let (h, m, s, ampm) = (self.hours, self.minutes, self.seconds, self.hours.suffix());
        match self.mode {
            Alarm1Mode::EverySecond => f.write_str("every second"),
            Alarm1Mode::EveryMinute => write!(f, "every minute, second={:02}", s),
            Alarm1Mode::EveryHour => write!(f, "every hour, mm:ss={:02}:{:02}", m, s),
            Alarm1Mode::Daily => write!(f, "daily, hh:mm:ss={}:{:02}:{:02}{}", h, m, s, ampm),
            Alarm1Mode::DayOrDate => {
                match self.day_date {
                    DayDate::Day { index, weekday } => write!(f, "{}", WeekdayLabel(weekday, index))?,
                    DayDate::Date(date) => write!(f, "{}. of every month", date)?,
                }
                write!(f, ", {}:{:02}:{:02}{}", h, m, s, ampm)
            }
            Alarm1Mode::Invalid => f.write_str("invalid setting"),
        }
    }
}

/// A complete Alarm 2 burst.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Alarm2Record {
    pub direction: Direction,
    pub mode: Alarm2Mode,
    pub minutes: u8,
    pub hours: Hour,
    pub day_date: DayDate,
}

impl Alarm2Record {
    /// Builds the record from registers 0x0B-0x0D.
    ///
    /// # Arguments
    /// * `direction` - Direction of the transfer that carried the block
    /// * `data` - Raw register bytes, alarm 2 minutes first
    /// * `first_day_of_week` - Week ordering used to name a day-of-week alarm
    #[must_use]
    pub fn from_registers(
        direction: Direction,
        data: [u8; 3],
        first_day_of_week: FirstDayOfWeek,
    ) -> Self {
        let minutes = Minutes::from(data[0]);
        let hours = Hours::from(data[1]);
        let day_date = AlarmDayDate::from(data[2]);
        Alarm2Record {
            direction,
            mode: Alarm2Mode::from_masks(
                minutes.alarm_mask(),
                hours.alarm_mask(),
                day_date.alarm_mask(),
            ),
            minutes: minutes.value(),
            hours: hours.hour(),
            day_date: DayDate::from_register(data[2], first_day_of_week),
        }
    }
}

impl fmt::Display for Alarm2Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Alarm2: ", self.direction)?;
        let (h, m, ampm) = (self.hours, self.minutes, self.hours.suffix());
        match self.mode {
            Alarm2Mode::EveryMinute => f.write_str("every minute"),
            Alarm2Mode::EveryHour => write!(f, "every hour, minute={:02}", m),
            Alarm2Mode::EveryDay => write!(f, "every day, hh:mm={}:{:02}{}", h, m, ampm),
            Alarm2Mode::DayOrDate => {
                f.write_str("every ")?;
                match self.day_date {
                    DayDate::Day { index, weekday } => write!(f, "{}", WeekdayLabel(weekday, index))?,
                    DayDate::Date(date) => write!(f, "{}. of month", date)?,
                }
                write!(f, ", hh:mm={}:{:02}{}", h, m, ampm)
            }
            Alarm2Mode::Invalid => f.write_str("invalid setting"),
        }
    }
}
