//! Decoder output: annotations and the sink that receives them.

use core::fmt;

use alloc::string::String;
use alloc::vec::Vec;

use crate::alarm::{Alarm1Record, Alarm2Record};
use crate::block::BlockKind;
use crate::datetime::DateTimeRecord;
use crate::registers::RegAddr;
use crate::temperature::TemperatureRecord;

/// A range of sample positions in the captured trace.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    #[must_use]
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }
}

/// Bitfield categories of per-bit annotations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Seconds,
    Reserved,
    Minutes,
    /// 12/24 hour mode select
    HourMode,
    /// AM/PM
    Meridiem,
    Hours,
    Day,
    Date,
    Century,
    Month,
    Year,
    /// DY/DT
    DayDate,
    /// /EOSC
    EnableOscillator,
    /// BBSQW
    BatteryBackedSquareWave,
    /// CONV
    ConvertTemperature,
    /// RS2/RS1
    Rate,
    /// INTCN
    InterruptControl,
    /// A2IE
    Alarm2InterruptEnable,
    /// A1IE
    Alarm1InterruptEnable,
    /// OSF
    OscillatorStopFlag,
    /// EN32kHz
    Enable32kHz,
    /// BSY
    Busy,
    /// A2F
    Alarm2Flag,
    /// A1F
    Alarm1Flag,
    A1M1,
    A1M2,
    A1M3,
    A1M4,
    A2M2,
    A2M3,
    A2M4,
    TemperatureMsb,
    TemperatureLsb,
    AgingOffset,
}

/// Conditions the decoder recovered from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Warning {
    /// A transaction addressed a device other than the DS3231.
    ForeignDevice(u8),
    /// A data byte arrived while the register pointer was past 0x12.
    RegisterOutOfRange(u8),
}

/// Aggregated content of a completed block.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    DateTime(DateTimeRecord),
    Alarm1(Alarm1Record),
    Alarm2(Alarm2Record),
    Temperature(TemperatureRecord),
}

impl Record {
    /// Returns the category tag of the block.
    ///
    /// # Returns
    /// * The [`BlockKind`] whose registers produced this record
    #[must_use]
    pub fn kind(&self) -> BlockKind {
        match self {
            Record::DateTime(_) => BlockKind::DateTime,
            Record::Alarm1(_) => BlockKind::Alarm1,
            Record::Alarm2(_) => BlockKind::Alarm2,
            Record::Temperature(_) => BlockKind::Temperature,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::DateTime(record) => fmt::Display::fmt(record, f),
            Record::Alarm1(record) => fmt::Display::fmt(record, f),
            Record::Alarm2(record) => fmt::Display::fmt(record, f),
            Record::Temperature(record) => fmt::Display::fmt(record, f),
        }
    }
}

/// What an annotation describes.
#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    /// One whole register byte.
    Register(RegAddr),
    /// One bitfield within a register byte.
    Field(Field),
    /// A completed multi-register block.
    Block(Record),
    Warning(Warning),
}

/// A decoded event positioned on the trace.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub span: Span,
    pub kind: Kind,
    /// Labels from most to least verbose; the renderer picks what fits.
    pub labels: Vec<String>,
}

impl Annotation {
    /// The most verbose label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.labels.first().map_or("", String::as_str)
    }

    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(self.kind, Kind::Warning(_))
    }

    /// The aggregated record, for block annotations.
    #[must_use]
    pub fn record(&self) -> Option<&Record> {
        match &self.kind {
            Kind::Block(record) => Some(record),
            _ => None,
        }
    }
}

/// Receives annotations as the decoder emits them.
pub trait Sink {
    fn put(&mut self, annotation: Annotation);
}

impl Sink for Vec<Annotation> {
    fn put(&mut self, annotation: Annotation) {
        self.push(annotation);
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn put(&mut self, annotation: Annotation) {
        (**self).put(annotation);
    }
}

// Builds a label list from string-like expressions
macro_rules! labels {
    ($($label:expr),+ $(,)?) => {
        alloc::vec![$(alloc::string::String::from($label)),+]
    };
}
pub(crate) use labels;

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use crate::bus::Direction;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink: Vec<Annotation> = Vec::new();
        for i in 0..3 {
            sink.put(Annotation {
                span: Span::new(i, i + 1),
                kind: Kind::Warning(Warning::ForeignDevice(0x50)),
                labels: labels!["a", "b"],
            });
        }
        assert_eq!(sink.len(), 3);
        assert_eq!(sink[2].span, Span::new(2, 3));
        assert!(sink[0].is_warning());
        assert_eq!(sink[0].label(), "a");
        assert_eq!(sink[0].record(), None);
    }

    #[test]
    fn test_sink_through_mutable_reference() {
        fn feed(mut sink: impl Sink) {
            sink.put(Annotation {
                span: Span::default(),
                kind: Kind::Register(RegAddr::Year),
                labels: vec![],
            });
        }

        let mut collected: Vec<Annotation> = Vec::new();
        feed(&mut collected);
        feed(&mut collected);
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].label(), "");
    }

    #[test]
    fn test_record_display_matches_inner_record() {
        let temperature = TemperatureRecord::from_registers(Direction::Read, 0x19, 0xC0);
        let record = Record::Temperature(temperature);
        assert_eq!(record.to_string(), temperature.to_string());
        assert_eq!(record.to_string(), "Read block data: Temperature: 25.75");
        assert_eq!(record.kind(), BlockKind::Temperature);
    }
}
