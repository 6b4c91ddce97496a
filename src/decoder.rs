//! Decoder session: register dispatch and per-register annotation.
//!
//! A [`Decoder`] is fed one framed bus primitive at a time. The transaction
//! state machine decides what the primitive means; data bytes addressed to
//! the DS3231 are dispatched to the handler of the register under the
//! device's auto-incrementing register pointer, and every contiguous burst
//! over a date/time, alarm or temperature group is summarized as a block.
//!
//! ```
//! use ds3231_decoder::{Decoder, Primitive, Span};
//!
//! let mut decoder = Decoder::default();
//! let trace = [
//!     Primitive::Start,
//!     Primitive::AddressWrite(0x68),
//!     Primitive::DataWrite(0x11),
//!     Primitive::StartRepeat,
//!     Primitive::AddressRead(0x68),
//!     Primitive::DataRead(0x19),
//!     Primitive::DataRead(0xC0),
//!     Primitive::Stop,
//! ];
//! let annotations = decoder.decode_trace(
//!     trace.into_iter().enumerate().map(|(i, p)| (Span::new(i as u64, i as u64 + 1), p)),
//! );
//! let block = annotations.iter().find(|a| a.record().is_some()).unwrap();
//! assert_eq!(block.label(), "Read block data: Temperature: 25.75");
//! ```

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::alarm::{Alarm1Record, Alarm2Record};
use crate::annotation::{labels, Annotation, Field, Kind, Record, Sink, Span, Warning};
use crate::block::{BlockKind, BlockTracker};
use crate::bus::{Direction, Primitive};
use crate::config::{Config, Subtype};
use crate::datetime::{DateTimeRecord, WeekdayLabel};
use crate::error::DecoderError;
use crate::registers::{
    AlarmDayDate, Control, DayDateSelect, InterruptControl, Month, RegAddr, Status,
    TimeRepresentation, REGISTER_COUNT,
};
use crate::state::{Action, TransactionState};
use crate::temperature::TemperatureRecord;
use crate::{field, registers};

/// Annotation writer for the byte currently being decoded.
struct Emitter<'a> {
    sink: &'a mut dyn Sink,
    span: Span,
    bits: Option<&'a [Span]>,
}

impl Emitter<'_> {
    /// Span of bits `high..=low`, or of the whole byte without bit metadata.
    fn bit_span(&self, high: u8, low: u8) -> Span {
        match self.bits {
            Some(bits) if bits.len() >= 8 => Span::new(
                bits[usize::from(7 - high)].start,
                bits[usize::from(7 - low)].end,
            ),
            _ => self.span,
        }
    }

    fn put(&mut self, span: Span, kind: Kind, labels: Vec<String>) {
        self.sink.put(Annotation { span, kind, labels });
    }

    fn register(&mut self, reg: RegAddr) {
        let labels = reg.names().iter().map(|s| String::from(*s)).collect();
        self.put(self.span, Kind::Register(reg), labels);
    }

    fn field(&mut self, high: u8, low: u8, field: Field, labels: Vec<String>) {
        self.put(self.bit_span(high, low), Kind::Field(field), labels);
    }

    fn flag(&mut self, bit: u8, field: Field, labels: Vec<String>) {
        self.field(bit, bit, field, labels);
    }

    fn reserved(&mut self, bits: &[u8]) {
        for &bit in bits {
            self.flag(bit, Field::Reserved, labels!["Reserved bit", "Reserved", "Rsvd", "R"]);
        }
    }

    fn block(&mut self, span: Span, record: Record) {
        let names = record.kind().names();
        let labels = labels![record.to_string(), names[0], names[1]];
        self.put(span, Kind::Block(record), labels);
    }

    fn warning(&mut self, warning: Warning, label: String) {
        self.put(self.span, Kind::Warning(warning), labels![label]);
    }
}

fn bit(byte: u8, n: u8) -> u8 {
    field::bit_range(byte, n, n)
}

fn abled(on: bool) -> &'static str {
    if on {
        "en"
    } else {
        "dis"
    }
}

fn seconds_field(out: &mut Emitter<'_>, byte: u8) {
    let s = registers::Seconds::from(byte).value();
    out.field(
        6,
        0,
        Field::Seconds,
        labels![format!("Second: {}", s), format!("Sec: {}", s), format!("S: {}", s), "S"],
    );
}

fn minutes_field(out: &mut Emitter<'_>, byte: u8) {
    let m = registers::Minutes::from(byte).value();
    out.field(
        6,
        0,
        Field::Minutes,
        labels![format!("Minute: {}", m), format!("Min: {}", m), format!("M: {}", m), "M"],
    );
}

// Mode, meridiem and value bits shared by the clock and alarm hours registers
fn hours_fields(out: &mut Emitter<'_>, byte: u8) {
    let hour = field::hour(byte);
    let h = hour.value;
    match hour.representation() {
        TimeRepresentation::TwelveHour => {
            out.flag(6, Field::HourMode, labels!["12-hour mode", "12h mode", "12h"]);
            let ampm = hour.suffix();
            out.flag(5, Field::Meridiem, labels![ampm, &ampm[..1]]);
            out.field(4, 0, Field::Hours, labels![format!("Hour: {}", h), format!("H: {}", h), "H"]);
        }
        TimeRepresentation::TwentyFourHour => {
            out.flag(6, Field::HourMode, labels!["24-hour mode", "24h mode", "24h"]);
            out.field(5, 0, Field::Hours, labels![format!("Hour: {}", h), format!("H: {}", h), "H"]);
        }
    }
}

fn mask_flag(out: &mut Emitter<'_>, field: Field, name: &str, byte: u8) {
    let m = bit(byte, 7);
    out.flag(7, field, labels![format!("{}: {}", name, m), name]);
}

fn alarm_day_date_fields(config: &Config, out: &mut Emitter<'_>, byte: u8) {
    let reg = AlarmDayDate::from(byte);
    let dydt = bit(byte, 6);
    out.flag(6, Field::DayDate, labels![format!("DYDT: {}", dydt), "DYDT"]);
    match reg.day_date_select() {
        DayDateSelect::Day => {
            let w = reg.day();
            let ws = WeekdayLabel(config.first_day_of_week.weekday(w), w);
            out.field(
                2,
                0,
                Field::Day,
                labels![format!("Weekday: {}", ws), format!("WD: {}", w), "WD", "W"],
            );
        }
        DayDateSelect::Date => {
            let d = reg.date();
            out.field(
                5,
                0,
                Field::Date,
                labels![format!("Date / Day: {}", d), format!("D: {}", d), "D"],
            );
        }
    }
}

fn handle_seconds(_: &Config, out: &mut Emitter<'_>, byte: u8) {
    out.reserved(&[7]);
    seconds_field(out, byte);
}

fn handle_minutes(_: &Config, out: &mut Emitter<'_>, byte: u8) {
    out.reserved(&[7]);
    minutes_field(out, byte);
}

fn handle_hours(_: &Config, out: &mut Emitter<'_>, byte: u8) {
    out.reserved(&[7]);
    hours_fields(out, byte);
}

fn handle_day(config: &Config, out: &mut Emitter<'_>, byte: u8) {
    out.reserved(&[7, 6, 5, 4, 3]);
    let w = registers::Day::from(byte).index();
    let ws = WeekdayLabel(config.first_day_of_week.weekday(w), w);
    out.field(
        2,
        0,
        Field::Day,
        labels![format!("Weekday: {}", ws), format!("WD: {}", ws), "WD", "W"],
    );
}

fn handle_date(_: &Config, out: &mut Emitter<'_>, byte: u8) {
    out.reserved(&[7, 6]);
    let d = registers::Date::from(byte).value();
    out.field(5, 0, Field::Date, labels![format!("Date: {}", d), format!("D: {}", d), "D"]);
}

fn handle_month(_: &Config, out: &mut Emitter<'_>, byte: u8) {
    let month = Month::from(byte);
    let c = u8::from(month.century());
    out.flag(
        7,
        Field::Century,
        labels![
            format!("Century overflow: {}", c),
            format!("Cent OVF: {}", c),
            format!("CO: {}", c),
            "CO"
        ],
    );
    out.reserved(&[6, 5]);
    let m = month.value();
    out.field(
        4,
        0,
        Field::Month,
        labels![format!("Month: {}", m), format!("Mon: {}", m), format!("M: {}", m), "M"],
    );
}

fn handle_year(_: &Config, out: &mut Emitter<'_>, byte: u8) {
    let y = registers::Year::from(byte).offset();
    out.field(
        7,
        0,
        Field::Year,
        labels![format!("Year: {}", 2000 + u16::from(y)), format!("Y: {}", y), "Y"],
    );
}

fn handle_alarm1_seconds(_: &Config, out: &mut Emitter<'_>, byte: u8) {
    mask_flag(out, Field::A1M1, "A1M1", byte);
    seconds_field(out, byte);
}

fn handle_alarm1_minutes(_: &Config, out: &mut Emitter<'_>, byte: u8) {
    mask_flag(out, Field::A1M2, "A1M2", byte);
    minutes_field(out, byte);
}

fn handle_alarm1_hours(_: &Config, out: &mut Emitter<'_>, byte: u8) {
    mask_flag(out, Field::A1M3, "A1M3", byte);
    hours_fields(out, byte);
}

fn handle_alarm1_day_date(config: &Config, out: &mut Emitter<'_>, byte: u8) {
    mask_flag(out, Field::A1M4, "A1M4", byte);
    alarm_day_date_fields(config, out, byte);
}

fn handle_alarm2_minutes(_: &Config, out: &mut Emitter<'_>, byte: u8) {
    mask_flag(out, Field::A2M2, "A2M2", byte);
    minutes_field(out, byte);
}

fn handle_alarm2_hours(_: &Config, out: &mut Emitter<'_>, byte: u8) {
    mask_flag(out, Field::A2M3, "A2M3", byte);
    hours_fields(out, byte);
}

fn handle_alarm2_day_date(config: &Config, out: &mut Emitter<'_>, byte: u8) {
    mask_flag(out, Field::A2M4, "A2M4", byte);
    alarm_day_date_fields(config, out, byte);
}

fn handle_control(config: &Config, out: &mut Emitter<'_>, byte: u8) {
    let control = Control::from(byte);

    let eo = u8::from(control.not_enable_oscillator());
    out.flag(
        7,
        Field::EnableOscillator,
        labels![
            format!("Enable oscillator: {}", eo),
            format!("enab osc: {}", eo),
            format!("EO: {}", eo),
            "EO"
        ],
    );

    let bbsqw = control.battery_backed_square_wave();
    let b = u8::from(bbsqw);
    out.flag(
        6,
        Field::BatteryBackedSquareWave,
        labels![
            format!("Battery backed square wave {}abled", abled(bbsqw)),
            format!("BBSQWE: {}abled", abled(bbsqw)),
            format!("SQWE: {}", b),
            format!("S: {}", b),
            "S"
        ],
    );

    let fc = u8::from(control.convert_temperature());
    out.flag(
        5,
        Field::ConvertTemperature,
        labels![
            format!("Forced temperature conversion: {}", fc),
            format!("frc tconv: {}", fc),
            format!("FC: {}", fc),
            "FC"
        ],
    );

    match config.subtype {
        Subtype::SN => {
            let r = control.square_wave_frequency().label();
            out.field(
                4,
                3,
                Field::Rate,
                labels![
                    format!("Square wave output rate: {}", r),
                    format!("Square wave rate: {}", r),
                    format!("SQW rate: {}", r),
                    format!("Rate: {}", r),
                    format!("RA: {}", r),
                    "RA",
                    "R"
                ],
            );
        }
        // The DS3231M always runs the square wave at 1Hz
        Subtype::M => out.reserved(&[4, 3]),
    }

    let intcn = control.interrupt_control();
    let pin = match intcn {
        InterruptControl::Interrupt => "alarm interrupt",
        InterruptControl::SquareWave => "square wave",
    };
    let ip = intcn as u8;
    out.flag(
        2,
        Field::InterruptControl,
        labels![
            format!("Int/SQW pin: {}", pin),
            format!("Int on pin: {}", ip),
            format!("IP: {}", ip),
            "IP"
        ],
    );

    let a2ie = control.alarm2_interrupt_enable();
    out.flag(
        1,
        Field::Alarm2InterruptEnable,
        labels![
            format!("Alarm2 interrupt {}abled", abled(a2ie)),
            format!("Al2 INT {}abled", abled(a2ie)),
            format!("Al2 INT: {}", u8::from(a2ie)),
            format!("A2I: {}", u8::from(a2ie)),
            "A2I"
        ],
    );

    let a1ie = control.alarm1_interrupt_enable();
    out.flag(
        0,
        Field::Alarm1InterruptEnable,
        labels![
            format!("Alarm1 interrupt {}abled", abled(a1ie)),
            format!("Al1 INT {}abled", abled(a1ie)),
            format!("Al1 INT: {}", u8::from(a1ie)),
            format!("A1I: {}", u8::from(a1ie)),
            "A1I"
        ],
    );
}

fn handle_control_status(_: &Config, out: &mut Emitter<'_>, byte: u8) {
    let status = Status::from(byte);
    out.reserved(&[6, 5, 4]);

    let osf = u8::from(status.oscillator_stop_flag());
    out.flag(
        7,
        Field::OscillatorStopFlag,
        labels![
            format!("Oscillator stop flag: {}", osf),
            format!("Osc stop: {}", osf),
            format!("OS: {}", osf),
            "OS"
        ],
    );
    let en32 = u8::from(status.enable_32khz_output());
    out.flag(
        3,
        Field::Enable32kHz,
        labels![
            format!("Enable 32kHz output: {}", en32),
            format!("En 32k out: {}", en32),
            format!("32k: {}", en32),
            "32k"
        ],
    );
    let bsy = u8::from(status.busy());
    out.flag(
        2,
        Field::Busy,
        labels![
            format!("Busy TXCO: {}", bsy),
            format!("TXCO: {}", bsy),
            format!("TX: {}", bsy),
            "TX"
        ],
    );
    let a2f = u8::from(status.alarm2_flag());
    out.flag(
        1,
        Field::Alarm2Flag,
        labels![
            format!("Alarm2 flag: {}", a2f),
            format!("Al2 flg: {}", a2f),
            format!("A2F: {}", a2f),
            "A2"
        ],
    );
    let a1f = u8::from(status.alarm1_flag());
    out.flag(
        0,
        Field::Alarm1Flag,
        labels![
            format!("Alarm1 flag: {}", a1f),
            format!("Al1 flg: {}", a1f),
            format!("A1F: {}", a1f),
            "A1"
        ],
    );
}

fn handle_aging_offset(_: &Config, out: &mut Emitter<'_>, byte: u8) {
    let ao = registers::AgingOffset::from(byte).aging_offset();
    out.field(
        7,
        0,
        Field::AgingOffset,
        labels![format!("Offset: {}", ao), format!("Ofs: {}", ao), format!("O: {}", ao), "O"],
    );
}

fn handle_msb_temp(_: &Config, out: &mut Emitter<'_>, byte: u8) {
    let tm = field::signed(byte);
    out.field(
        7,
        0,
        Field::TemperatureMsb,
        labels![format!("tempMSB: {}", tm), format!("tm: {}", tm), "t"],
    );
}

fn handle_lsb_temp(_: &Config, out: &mut Emitter<'_>, byte: u8) {
    out.reserved(&[0, 1, 2, 3, 4, 5]);
    let tl = registers::TemperatureFraction::from(byte).quarters();
    out.field(
        7,
        6,
        Field::TemperatureLsb,
        labels![format!("tempLSB: {}", tl), format!("tl: {}", tl), "t"],
    );
}

type Handler = fn(&Config, &mut Emitter<'_>, u8);

// Builds the register-indexed handler table
macro_rules! handler_table {
    ($($reg:ident => $name:ident),+ $(,)?) => {
        paste::paste! {
            static HANDLERS: [(RegAddr, Handler); REGISTER_COUNT] = [
                $((RegAddr::$reg, [<handle_ $name>] as Handler)),+
            ];
        }
    };
}

handler_table! {
    Seconds => seconds,
    Minutes => minutes,
    Hours => hours,
    Day => day,
    Date => date,
    Month => month,
    Year => year,
    Alarm1Seconds => alarm1_seconds,
    Alarm1Minutes => alarm1_minutes,
    Alarm1Hours => alarm1_hours,
    Alarm1DayDate => alarm1_day_date,
    Alarm2Minutes => alarm2_minutes,
    Alarm2Hours => alarm2_hours,
    Alarm2DayDate => alarm2_day_date,
    Control => control,
    ControlStatus => control_status,
    AgingOffset => aging_offset,
    MSBTemp => msb_temp,
    LSBTemp => lsb_temp,
}

/// One decoding session.
#[derive(Debug, Clone)]
pub struct Decoder {
    config: Config,
    state: TransactionState,
    /// Device register pointer; may hold an out-of-range value after a
    /// pointer write past 0x12.
    pointer: u8,
    block: BlockTracker,
    /// Last byte seen for every register, read back when a block completes
    registers: [u8; REGISTER_COUNT],
    bits: Option<Vec<Span>>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl Decoder {
    /// Starts a session.
    ///
    /// # Arguments
    /// * `config` - Subtype, initial register pointer and week ordering
    ///
    /// # Errors
    /// Returns [`DecoderError::RegisterPointerOutOfRange`] if the configured
    /// initial register pointer is past 0x12.
    pub fn new(config: Config) -> Result<Self, DecoderError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: Config) -> Self {
        Decoder {
            config,
            state: TransactionState::Idle,
            pointer: config.register_pointer,
            block: BlockTracker::NotInBlock,
            registers: [0; REGISTER_COUNT],
            bits: None,
        }
    }

    /// Returns the session to its initial state.
    pub fn reset(&mut self) {
        debug!("reset");
        *self = Self::with_config(self.config);
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    #[must_use]
    pub fn register_pointer(&self) -> u8 {
        self.pointer
    }

    /// Decodes one primitive, emitting annotations to `sink`.
    ///
    /// `BITS` metadata is held until the next primitive and then dropped. A
    /// second `BITS` before that replaces the first.
    ///
    /// # Arguments
    /// * `span` - Sample positions covered by the primitive
    /// * `primitive` - The framed bus event
    /// * `sink` - Receives every annotation the primitive produces
    pub fn decode<S: Sink>(&mut self, span: Span, primitive: Primitive, sink: &mut S) {
        if let Primitive::Bits(bits) = primitive {
            self.bits = Some(bits);
            return;
        }
        let bits = self.bits.take();

        let (next, action) = self.state.on(&primitive);
        if next != self.state {
            debug!("state {:?} -> {:?}", self.state, next);
            self.state = next;
        }

        let mut out = Emitter {
            sink,
            span,
            bits: bits.as_deref(),
        };
        match action {
            Action::None => {}
            Action::ForeignDevice(addr) => {
                warn!("ignoring traffic for device {:#x}", addr);
                out.warning(
                    Warning::ForeignDevice(addr),
                    format!("Ignoring non-DS3231 data (slave 0x{:02X})", addr),
                );
            }
            Action::SetPointer(reg) => {
                debug!("register pointer {:#x}", reg);
                self.pointer = reg;
            }
            Action::Dispatch(byte, direction) => self.dispatch(&mut out, byte, direction),
        }
    }

    /// Decodes a whole trace and collects the annotations.
    ///
    /// # Arguments
    /// * `trace` - Primitives with their spans, in trace order
    ///
    /// # Returns
    /// * Every annotation emitted, in emission order
    pub fn decode_trace<I>(&mut self, trace: I) -> Vec<Annotation>
    where
        I: IntoIterator<Item = (Span, Primitive)>,
    {
        let mut annotations = Vec::new();
        for (span, primitive) in trace {
            self.decode(span, primitive, &mut annotations);
        }
        annotations
    }

    fn dispatch(&mut self, out: &mut Emitter<'_>, byte: u8, direction: Direction) {
        let Ok(reg) = RegAddr::try_from(self.pointer) else {
            warn!("register pointer {:#x} out of range", self.pointer);
            out.warning(
                Warning::RegisterOutOfRange(self.pointer),
                format!("Ignoring out-of-range register 0x{:02X}", self.pointer),
            );
            return;
        };
        trace!("{:?} {:?} {:#x}", direction, reg, byte);

        let index = usize::from(u8::from(reg));
        self.registers[index] = byte;
        out.register(reg);
        let (_, handler) = HANDLERS[index];
        handler(&self.config, out, byte);

        match reg.block_role() {
            Some((block, position)) => {
                if let Some(span) = self.block.step(block, position, direction, out.span) {
                    let record = self.record(block, direction);
                    out.block(span, record);
                }
            }
            None => self.block.clear(),
        }

        self.pointer = u8::from(reg.next());
    }

    fn window<const N: usize>(&self, first: RegAddr) -> [u8; N] {
        let first = usize::from(u8::from(first));
        core::array::from_fn(|i| self.registers[first + i])
    }

    fn record(&self, block: BlockKind, direction: Direction) -> Record {
        let first_day_of_week = self.config.first_day_of_week;
        match block {
            BlockKind::DateTime => Record::DateTime(DateTimeRecord::from_registers(
                direction,
                self.window(RegAddr::Seconds),
                first_day_of_week,
            )),
            BlockKind::Alarm1 => Record::Alarm1(Alarm1Record::from_registers(
                direction,
                self.window(RegAddr::Alarm1Seconds),
                first_day_of_week,
            )),
            BlockKind::Alarm2 => Record::Alarm2(Alarm2Record::from_registers(
                direction,
                self.window(RegAddr::Alarm2Minutes),
                first_day_of_week,
            )),
            BlockKind::Temperature => {
                let [msb, lsb] = self.window(RegAddr::MSBTemp);
                Record::Temperature(TemperatureRecord::from_registers(direction, msb, lsb))
            }
        }
    }
}
