//! A protocol decoder for DS3231 real-time clock traffic on an I2C bus.
//!
//! The decoder consumes framed I2C primitives (START, address, data bytes,
//! STOP and per-bit sample positions) and produces [`Annotation`]s: one per
//! register byte, one per bit field, one summary per date/time, alarm or
//! temperature block, and warnings for traffic it ignores.
//!
//! Primitives come either from a logic analyzer front end (feed them to
//! [`Decoder::decode`]) or from a live bus wrapped in a [`Tap`], which
//! forwards a driver's transfers and decodes them as they complete.
//!
//! ```
//! use ds3231_decoder::{Annotation, Config, Decoder, FirstDayOfWeek, Primitive, Span};
//!
//! let config = Config {
//!     first_day_of_week: FirstDayOfWeek::Sunday,
//!     ..Config::default()
//! };
//! let mut decoder = Decoder::new(config).unwrap();
//! let mut annotations: Vec<Annotation> = Vec::new();
//! for (i, primitive) in [
//!     Primitive::Start,
//!     Primitive::AddressWrite(0x68),
//!     Primitive::DataWrite(0x03),
//!     Primitive::DataWrite(0x01),
//!     Primitive::Stop,
//! ]
//! .into_iter()
//! .enumerate()
//! {
//!     decoder.decode(Span::new(i as u64, i as u64 + 1), primitive, &mut annotations);
//! }
//! assert!(annotations.iter().any(|a| a.label() == "Weekday: Sunday"));
//! ```
#![no_std]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod alarm;
mod annotation;
mod block;
mod bus;
mod config;
pub mod datetime;
mod decoder;
mod error;
pub mod field;
pub mod registers;
mod state;
mod tap;
pub mod temperature;

#[cfg(feature = "async")]
pub mod asynch;

pub use annotation::{Annotation, Field, Kind, Record, Sink, Span, Warning};
pub use block::{BlockKind, BlockTracker};
pub use bus::{Direction, Primitive};
pub use config::{weekday_name, Config, FirstDayOfWeek, Subtype};
pub use decoder::Decoder;
pub use error::DecoderError;
pub use registers::RegAddr;
pub use state::{Action, TransactionState, DS3231_I2C_ADDRESS};
pub use tap::Tap;
