//! Async bus tap.
//!
//! Implements `embedded-hal-async`'s `I2c` for [`Tap`] so that async DS3231
//! drivers can be decoded the same way as blocking ones. Only available with
//! the `async` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use ds3231_decoder::{Decoder, Tap};
//!
//! let mut tap = Tap::new(i2c, Decoder::default(), Vec::new());
//! let mut rtc = ds3231::asynch::DS3231::new(&mut tap, 0x68);
//! let datetime = rtc.datetime().await?;
//! for annotation in tap.sink() {
//!     println!("{}", annotation.label());
//! }
//! ```

use embedded_hal_async::i2c::{I2c, Operation};

use crate::annotation::Sink;
use crate::tap::Tap;

impl<I2C: I2c, S: Sink> I2c for Tap<I2C, S> {
    async fn read(&mut self, address: u8, read: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.read(address, read).await?;
        let mut replay = self.replay(address);
        replay.read(read);
        replay.finish();
        Ok(())
    }

    async fn write(&mut self, address: u8, write: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, write).await?;
        let mut replay = self.replay(address);
        replay.write(write);
        replay.finish();
        Ok(())
    }

    async fn write_read(
        &mut self,
        address: u8,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write_read(address, write, read).await?;
        let mut replay = self.replay(address);
        replay.write(write);
        replay.read(read);
        replay.finish();
        Ok(())
    }

    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.i2c.transaction(address, operations).await?;
        let mut replay = self.replay(address);
        replay.operations(operations);
        replay.finish();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use crate::annotation::{Annotation, Field, Kind};
    use crate::decoder::Decoder;
    use crate::registers::RegAddr;
    use alloc::vec;
    use alloc::vec::Vec;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const DEVICE_ADDRESS: u8 = 0x68;

    async fn setup_mock(expectations: &[I2cTrans]) -> Tap<I2cMock, Vec<Annotation>> {
        Tap::new(I2cMock::new(expectations), Decoder::default(), Vec::new())
    }

    fn block_labels(annotations: &[Annotation]) -> Vec<&str> {
        annotations
            .iter()
            .filter(|a| a.record().is_some())
            .map(Annotation::label)
            .collect()
    }

    #[tokio::test]
    async fn test_async_read_datetime() {
        let mut tap = setup_mock(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![0x00, 0x30, 0x15, 0x04, 0x14, 0x03, 0x24],
        )])
        .await;

        let mut data = [0; 7];
        tap.write_read(DEVICE_ADDRESS, &[RegAddr::Seconds as u8], &mut data)
            .await
            .unwrap();

        assert_eq!(
            block_labels(tap.sink()),
            vec!["Read Date / time: Thursday, 14.03.2024 15:30:00"]
        );
        let (mut i2c, _, _) = tap.into_parts();
        i2c.done();
    }

    #[tokio::test]
    async fn test_async_set_alarm2() {
        let mut tap = setup_mock(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![RegAddr::Alarm2Minutes as u8, 0x30, 0x06, 0x80],
        )])
        .await;

        tap.write(
            DEVICE_ADDRESS,
            &[RegAddr::Alarm2Minutes as u8, 0x30, 0x06, 0x80],
        )
        .await
        .unwrap();

        assert_eq!(
            block_labels(tap.sink()),
            vec!["Wrote Alarm2: every day, hh:mm=06:30"]
        );
        let (mut i2c, _, _) = tap.into_parts();
        i2c.done();
    }

    #[tokio::test]
    async fn test_async_register_reads() {
        let mut tap = setup_mock(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x80],
            ),
            I2cTrans::read(DEVICE_ADDRESS, vec![0xF6]),
        ])
        .await;

        let mut data = [0];
        tap.write_read(DEVICE_ADDRESS, &[RegAddr::ControlStatus as u8], &mut data)
            .await
            .unwrap();
        // The pointer has moved on to the aging offset register
        tap.read(DEVICE_ADDRESS, &mut data).await.unwrap();

        let labels: Vec<&str> = tap
            .sink()
            .iter()
            .filter(|a| {
                matches!(
                    a.kind,
                    Kind::Field(Field::OscillatorStopFlag) | Kind::Field(Field::AgingOffset)
                )
            })
            .map(Annotation::label)
            .collect();
        assert_eq!(labels, vec!["Oscillator stop flag: 1", "Offset: -10"]);
        assert_eq!(tap.decoder().register_pointer(), 0x11);

        let (mut i2c, _, _) = tap.into_parts();
        i2c.done();
    }
}
