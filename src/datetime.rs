//! Date/time block (registers 0x00-0x06).
//!
//! A [`DateTimeRecord`] is assembled from the seven clock registers once a
//! complete, in-order burst has been observed. It keeps the values exactly as
//! the device encodes them (12-hour values stay 12-hour) and can be folded
//! into a chrono [`NaiveDateTime`] when the registers hold a real date.
//!
//! The year is always reported as 2000 + offset; the century bit is exposed
//! but not added in.

use core::fmt;

use chrono::{NaiveDate, NaiveDateTime, Weekday};

use crate::bus::Direction;
use crate::config::{weekday_name, FirstDayOfWeek};
use crate::field::Hour;
use crate::registers::{Date, Day, Hours, Minutes, Month, Seconds, Year};

/// A complete date/time burst.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DateTimeRecord {
    pub direction: Direction,
    pub seconds: u8,
    pub minutes: u8,
    pub hours: Hour,
    /// Raw day register index (1-7 on a well-behaved master)
    pub weekday_index: u8,
    /// `weekday_index` under the configured week ordering
    pub weekday: Option<Weekday>,
    pub date: u8,
    pub month: u8,
    /// Years since 2000
    pub year_offset: u8,
    pub century: bool,
}

impl DateTimeRecord {
    /// Builds the record from the raw register bytes, Seconds first.
    ///
    /// # Arguments
    /// * `direction` - Direction of the transfer that carried the block
    /// * `data` - Registers 0x00-0x06 as captured
    /// * `first_day_of_week` - Week ordering used to name the day register
    #[must_use]
    pub fn from_registers(
        direction: Direction,
        data: [u8; 7],
        first_day_of_week: FirstDayOfWeek,
    ) -> Self {
        let weekday_index = Day::from(data[3]).index();
        let month = Month::from(data[5]);
        DateTimeRecord {
            direction,
            seconds: Seconds::from(data[0]).value(),
            minutes: Minutes::from(data[1]).value(),
            hours: Hours::from(data[2]).hour(),
            weekday_index,
            weekday: first_day_of_week.weekday(weekday_index),
            date: Date::from(data[4]).value(),
            month: month.value(),
            year_offset: Year::from(data[6]).offset(),
            century: month.century(),
        }
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        2000 + i32::from(self.year_offset)
    }

    /// Converts to a chrono date and time.
    ///
    /// Returns `None` when the registers do not describe a valid calendar
    /// date or time of day.
    #[must_use]
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        let hours = u32::from(self.hours.to_24h());
        debug!(
            "h={} m={} s={} d={} m={} y={}",
            hours,
            self.minutes,
            self.seconds,
            self.date,
            self.month,
            self.year()
        );
        NaiveDate::from_ymd_opt(self.year(), u32::from(self.month), u32::from(self.date))
            .and_then(|d| d.and_hms_opt(hours, u32::from(self.minutes), u32::from(self.seconds)))
    }
}

/// Renders a weekday, or the raw index when it does not name one.
pub(crate) struct WeekdayLabel(pub Option<Weekday>, pub u8);

impl fmt::Display for WeekdayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(day) => f.write_str(weekday_name(day)),
            None => write!(f, "invalid ({})", self.1),
        }
    }
}

impl fmt::Display for DateTimeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Date / time: {}, {:02}.{:02}.{:04} {}:{:02}:{:02}{}",
            self.direction,
            WeekdayLabel(self.weekday, self.weekday_index),
            self.date,
            self.month,
            self.year(),
            self.hours,
            self.minutes,
            self.seconds,
            self.hours.suffix()
        )
    }
}
