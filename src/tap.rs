//! Live decoding of an I2C bus.
//!
//! A [`Tap`] wraps the bus handed to a DS3231 driver. Every transfer is
//! forwarded unchanged; once it succeeds, the traffic is replayed into a
//! [`Decoder`] as framed primitives so the driver's register accesses show
//! up as annotations.
//!
//! Replayed primitives carry synthetic sample positions: one unit per
//! START/STOP condition and nine per byte (eight data bits and the
//! acknowledge), with a `BITS` primitive before every data byte.

use alloc::vec::Vec;

use embedded_hal::i2c::{ErrorType, I2c, Operation};

use crate::annotation::{Sink, Span};
use crate::bus::{Direction, Primitive};
use crate::decoder::Decoder;

/// Feeds one transfer into a decoder.
pub(crate) struct Replay<'a, S: Sink> {
    decoder: &'a mut Decoder,
    sink: &'a mut S,
    clock: &'a mut u64,
    address: u8,
    direction: Option<Direction>,
}

impl<'a, S: Sink> Replay<'a, S> {
    pub(crate) fn new(
        decoder: &'a mut Decoder,
        sink: &'a mut S,
        clock: &'a mut u64,
        address: u8,
    ) -> Self {
        Replay {
            decoder,
            sink,
            clock,
            address,
            direction: None,
        }
    }

    fn emit(&mut self, width: u64, primitive: Primitive) {
        let span = Span::new(*self.clock, *self.clock + width);
        self.decoder.decode(span, primitive, &mut *self.sink);
    }

    fn condition(&mut self, primitive: Primitive) {
        self.emit(1, primitive);
        *self.clock += 1;
    }

    fn byte(&mut self, primitive: Primitive) {
        let t = *self.clock;
        let bits: Vec<Span> = (t..t + 8).map(|s| Span::new(s, s + 1)).collect();
        self.emit(8, Primitive::Bits(bits));
        self.emit(8, primitive);
        *self.clock += 9;
    }

    // START (or repeated START) and address when the direction changes
    fn select(&mut self, direction: Direction) {
        if self.direction == Some(direction) {
            return;
        }
        let start = match self.direction {
            None => Primitive::Start,
            Some(_) => Primitive::StartRepeat,
        };
        self.condition(start);
        let address = match direction {
            Direction::Write => Primitive::AddressWrite(self.address),
            Direction::Read => Primitive::AddressRead(self.address),
        };
        self.emit(8, address);
        *self.clock += 9;
        self.direction = Some(direction);
    }

    pub(crate) fn write(&mut self, bytes: &[u8]) {
        self.select(Direction::Write);
        for &b in bytes {
            self.byte(Primitive::DataWrite(b));
        }
    }

    pub(crate) fn read(&mut self, bytes: &[u8]) {
        self.select(Direction::Read);
        for &b in bytes {
            self.byte(Primitive::DataRead(b));
        }
    }

    pub(crate) fn operations(&mut self, operations: &[Operation<'_>]) {
        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.write(bytes),
                Operation::Read(buffer) => self.read(buffer),
            }
        }
    }

    pub(crate) fn finish(mut self) {
        if self.direction.is_some() {
            self.condition(Primitive::Stop);
        }
    }
}

/// A pass-through I2C bus that decodes the traffic it carries.
pub struct Tap<I2C, S> {
    pub(crate) i2c: I2C,
    pub(crate) decoder: Decoder,
    pub(crate) sink: S,
    pub(crate) clock: u64,
}

impl<I2C, S: Sink> Tap<I2C, S> {
    /// Wraps `i2c`, decoding with `decoder` into `sink`.
    ///
    /// # Arguments
    /// * `i2c` - The bus handed on to the driver's transfers
    /// * `decoder` - Session that decodes the replayed traffic
    /// * `sink` - Receives the annotations
    pub fn new(i2c: I2C, decoder: Decoder, sink: S) -> Self {
        Self {
            i2c,
            decoder,
            sink,
            clock: 0,
        }
    }

    #[must_use]
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Releases the bus, the decoder and the sink.
    ///
    /// # Returns
    /// * `(i2c, decoder, sink)`
    pub fn into_parts(self) -> (I2C, Decoder, S) {
        (self.i2c, self.decoder, self.sink)
    }

    pub(crate) fn replay(&mut self, address: u8) -> Replay<'_, S> {
        trace!("replaying transfer to {:#x} at {}", address, self.clock);
        Replay::new(&mut self.decoder, &mut self.sink, &mut self.clock, address)
    }
}

impl<I2C: ErrorType, S> ErrorType for Tap<I2C, S> {
    type Error = I2C::Error;
}

impl<I2C: I2c, S: Sink> I2c for Tap<I2C, S> {
    fn read(&mut self, address: u8, read: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.read(address, read)?;
        let mut replay = self.replay(address);
        replay.read(read);
        replay.finish();
        Ok(())
    }

    fn write(&mut self, address: u8, write: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, write)?;
        let mut replay = self.replay(address);
        replay.write(write);
        replay.finish();
        Ok(())
    }

    fn write_read(&mut self, address: u8, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(address, write, read)?;
        let mut replay = self.replay(address);
        replay.write(write);
        replay.read(read);
        replay.finish();
        Ok(())
    }

    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.i2c.transaction(address, operations)?;
        let mut replay = self.replay(address);
        replay.operations(operations);
        replay.finish();
        Ok(())
    }
}
