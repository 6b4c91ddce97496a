//! Protocol-level transaction tracking.
//!
//! The state machine only decides what a bus primitive means; register
//! decoding and annotation happen in the decoder.

use crate::bus::{Direction, Primitive};

/// I2C address of the DS3231.
pub const DS3231_I2C_ADDRESS: u8 = 0x68;

/// Where the decoder is inside an addressed transaction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransactionState {
    #[default]
    Idle,
    /// START seen, waiting for the slave address
    AwaitingAddress,
    /// Addressed for write, the next byte selects the register
    AwaitingRegisterPointer,
    WritingRegisters,
    ReadingRegisters,
}

/// Side effect requested by a transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    None,
    /// The transaction addressed another device.
    ForeignDevice(u8),
    /// Load the register pointer.
    SetPointer(u8),
    /// Decode a register byte at the current pointer.
    Dispatch(u8, Direction),
}

impl TransactionState {
    /// Applies one primitive.
    ///
    /// Primitives that do not match a transition out of the current state are
    /// ignored: the state is kept and no action is requested.
    #[must_use]
    pub fn on(self, primitive: &Primitive) -> (TransactionState, Action) {
        use TransactionState::*;

        match (self, primitive) {
            (Idle, Primitive::Start) => (AwaitingAddress, Action::None),

            (AwaitingAddress, Primitive::AddressWrite(addr)) => {
                if *addr == DS3231_I2C_ADDRESS {
                    (AwaitingRegisterPointer, Action::None)
                } else {
                    (Idle, Action::ForeignDevice(*addr))
                }
            }
            (AwaitingAddress, Primitive::AddressRead(addr)) => {
                if *addr == DS3231_I2C_ADDRESS {
                    (ReadingRegisters, Action::None)
                } else {
                    (Idle, Action::ForeignDevice(*addr))
                }
            }

            (AwaitingRegisterPointer, Primitive::DataWrite(b)) => {
                (WritingRegisters, Action::SetPointer(*b))
            }
            (AwaitingRegisterPointer, Primitive::Stop) => (Idle, Action::None),

            (WritingRegisters, Primitive::StartRepeat) => (AwaitingAddress, Action::None),
            (WritingRegisters, Primitive::DataWrite(b)) => {
                (WritingRegisters, Action::Dispatch(*b, Direction::Write))
            }
            (WritingRegisters, Primitive::Stop) => (Idle, Action::None),

            (ReadingRegisters, Primitive::DataRead(b)) => {
                (ReadingRegisters, Action::Dispatch(*b, Direction::Read))
            }
            (ReadingRegisters, Primitive::Stop) => (Idle, Action::None),

            (state, _) => (state, Action::None),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::vec;
    use TransactionState::*;

    #[test]
    fn test_write_transaction() {
        let (s, a) = Idle.on(&Primitive::Start);
        assert_eq!((s, a), (AwaitingAddress, Action::None));
        let (s, a) = s.on(&Primitive::AddressWrite(0x68));
        assert_eq!((s, a), (AwaitingRegisterPointer, Action::None));
        let (s, a) = s.on(&Primitive::DataWrite(0x0E));
        assert_eq!((s, a), (WritingRegisters, Action::SetPointer(0x0E)));
        let (s, a) = s.on(&Primitive::DataWrite(0x1C));
        assert_eq!((s, a), (WritingRegisters, Action::Dispatch(0x1C, Direction::Write)));
        let (s, a) = s.on(&Primitive::Stop);
        assert_eq!((s, a), (Idle, Action::None));
    }

    #[test]
    fn test_write_then_repeated_start_read() {
        let (s, _) = Idle.on(&Primitive::Start);
        let (s, _) = s.on(&Primitive::AddressWrite(0x68));
        let (s, _) = s.on(&Primitive::DataWrite(0x00));
        let (s, a) = s.on(&Primitive::StartRepeat);
        assert_eq!((s, a), (AwaitingAddress, Action::None));
        let (s, a) = s.on(&Primitive::AddressRead(0x68));
        assert_eq!((s, a), (ReadingRegisters, Action::None));
        let (s, a) = s.on(&Primitive::DataRead(0x30));
        assert_eq!((s, a), (ReadingRegisters, Action::Dispatch(0x30, Direction::Read)));
        assert_eq!(s.on(&Primitive::Stop), (Idle, Action::None));
    }

    #[test]
    fn test_foreign_device() {
        let (s, _) = Idle.on(&Primitive::Start);
        assert_eq!(
            s.on(&Primitive::AddressWrite(0x50)),
            (Idle, Action::ForeignDevice(0x50))
        );
        assert_eq!(
            s.on(&Primitive::AddressRead(0x57)),
            (Idle, Action::ForeignDevice(0x57))
        );
    }

    #[test]
    fn test_pointer_only_write() {
        let (s, _) = AwaitingRegisterPointer.on(&Primitive::Stop);
        assert_eq!(s, Idle);
    }

    #[test]
    fn test_unexpected_primitives_are_ignored() {
        let cases = vec![
            (Idle, Primitive::Stop),
            (Idle, Primitive::DataWrite(1)),
            (Idle, Primitive::AddressWrite(0x68)),
            (AwaitingAddress, Primitive::DataRead(1)),
            (AwaitingAddress, Primitive::Start),
            (AwaitingRegisterPointer, Primitive::DataRead(1)),
            (AwaitingRegisterPointer, Primitive::StartRepeat),
            (WritingRegisters, Primitive::DataRead(1)),
            (WritingRegisters, Primitive::Start),
            (ReadingRegisters, Primitive::DataWrite(1)),
            (ReadingRegisters, Primitive::StartRepeat),
            (ReadingRegisters, Primitive::Bits(vec![])),
        ];
        for (state, primitive) in cases {
            assert_eq!(state.on(&primitive), (state, Action::None), "{:?} {:?}", state, primitive);
        }
    }
}
