//! Aggregation of contiguous register accesses into semantic blocks.
//!
//! Each block spans a fixed run of registers that a master normally reads or
//! writes in one burst. The tracker follows the run register by register and
//! reports the full span once the last register of the block is reached
//! without a gap, reordering or change of direction.

use crate::annotation::Span;
use crate::bus::Direction;
use crate::registers::RegAddr;

/// The multi-register groups the decoder aggregates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlockKind {
    /// Registers 0x00-0x06
    DateTime,
    /// Registers 0x07-0x0A
    Alarm1,
    /// Registers 0x0B-0x0D
    Alarm2,
    /// Registers 0x11-0x12
    Temperature,
}

impl BlockKind {
    /// First register of the block.
    #[must_use]
    pub fn first(self) -> RegAddr {
        match self {
            BlockKind::DateTime => RegAddr::Seconds,
            BlockKind::Alarm1 => RegAddr::Alarm1Seconds,
            BlockKind::Alarm2 => RegAddr::Alarm2Minutes,
            BlockKind::Temperature => RegAddr::MSBTemp,
        }
    }

    /// Number of registers in the block.
    #[must_use]
    pub fn len(self) -> u8 {
        match self {
            BlockKind::DateTime => 7,
            BlockKind::Alarm1 => 4,
            BlockKind::Alarm2 => 3,
            BlockKind::Temperature => 2,
        }
    }

    /// Block names, most to least verbose.
    #[must_use]
    pub fn names(self) -> &'static [&'static str] {
        match self {
            BlockKind::DateTime => &["Date Time", "DT"],
            BlockKind::Alarm1 => &["Alarm1", "A1"],
            BlockKind::Alarm2 => &["Alarm2", "A2"],
            BlockKind::Temperature => &["Temperature", "T"],
        }
    }
}

/// Where the current run of register accesses stands.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BlockTracker {
    /// No candidate block, or the last one was broken or completed.
    #[default]
    NotInBlock,
    /// Registers `0..=index` of `block` have been seen in order.
    InBlock {
        block: BlockKind,
        index: u8,
        direction: Direction,
        start: u64,
    },
}

impl BlockTracker {
    /// Records an access to register `index` of `block`.
    ///
    /// Returns the span of the whole block when this access completes it.
    /// The first register always (re)starts a block; any other register
    /// continues it only if it directly follows the previous one in the same
    /// direction. The tracker is cleared after the last register whether or
    /// not the block completed.
    pub fn step(&mut self, block: BlockKind, index: u8, direction: Direction, span: Span) -> Option<Span> {
        if index == 0 {
            *self = BlockTracker::InBlock {
                block,
                index,
                direction,
                start: span.start,
            };
            return None;
        }

        let start = match *self {
            BlockTracker::InBlock {
                block: current,
                index: previous,
                direction: current_direction,
                start,
            } if current == block && previous + 1 == index && current_direction == direction => {
                start
            }
            _ => {
                *self = BlockTracker::NotInBlock;
                return None;
            }
        };

        if index + 1 == block.len() {
            *self = BlockTracker::NotInBlock;
            debug!("block {:?} complete", block);
            Some(Span::new(start, span.end))
        } else {
            *self = BlockTracker::InBlock {
                block,
                index,
                direction,
                start,
            };
            None
        }
    }

    /// Abandons any candidate block.
    pub fn clear(&mut self) {
        *self = BlockTracker::NotInBlock;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(i: u64) -> Span {
        Span::new(i * 10, i * 10 + 9)
    }

    #[test]
    fn test_block_layout_matches_register_roles() {
        for block in [
            BlockKind::DateTime,
            BlockKind::Alarm1,
            BlockKind::Alarm2,
            BlockKind::Temperature,
        ] {
            let mut reg = block.first();
            for index in 0..block.len() {
                assert_eq!(reg.block_role(), Some((block, index)));
                reg = reg.next();
            }
            assert_ne!(reg.block_role().map(|(b, _)| b), Some(block));
        }
    }

    #[test]
    fn test_complete_block() {
        let mut tracker = BlockTracker::default();
        for i in 0..6 {
            assert_eq!(tracker.step(BlockKind::DateTime, i, Direction::Write, span(u64::from(i))), None);
        }
        assert_eq!(
            tracker.step(BlockKind::DateTime, 6, Direction::Write, span(6)),
            Some(Span::new(0, 69))
        );
        assert_eq!(tracker, BlockTracker::NotInBlock);
    }

    #[test]
    fn test_gap_breaks_block() {
        let mut tracker = BlockTracker::default();
        tracker.step(BlockKind::Alarm1, 0, Direction::Read, span(0));
        tracker.step(BlockKind::Alarm1, 1, Direction::Read, span(1));
        assert_eq!(tracker.step(BlockKind::Alarm1, 3, Direction::Read, span(2)), None);
        assert_eq!(tracker, BlockTracker::NotInBlock);
    }

    #[test]
    fn test_direction_change_breaks_block() {
        let mut tracker = BlockTracker::default();
        tracker.step(BlockKind::Alarm2, 0, Direction::Write, span(0));
        tracker.step(BlockKind::Alarm2, 1, Direction::Read, span(1));
        assert_eq!(tracker.step(BlockKind::Alarm2, 2, Direction::Read, span(2)), None);
    }

    #[test]
    fn test_other_block_breaks_block() {
        let mut tracker = BlockTracker::default();
        tracker.step(BlockKind::DateTime, 0, Direction::Read, span(0));
        tracker.step(BlockKind::Alarm1, 1, Direction::Read, span(1));
        assert_eq!(tracker, BlockTracker::NotInBlock);
    }

    #[test]
    fn test_last_register_without_start_does_not_complete() {
        let mut tracker = BlockTracker::default();
        assert_eq!(tracker.step(BlockKind::Temperature, 1, Direction::Read, span(0)), None);
    }

    #[test]
    fn test_restart_on_first_register() {
        let mut tracker = BlockTracker::default();
        tracker.step(BlockKind::Temperature, 0, Direction::Read, span(0));
        tracker.step(BlockKind::Temperature, 0, Direction::Read, span(5));
        assert_eq!(
            tracker.step(BlockKind::Temperature, 1, Direction::Read, span(6)),
            Some(Span::new(50, 69))
        );
    }

    #[test]
    fn test_clear() {
        let mut tracker = BlockTracker::default();
        tracker.step(BlockKind::Temperature, 0, Direction::Read, span(0));
        tracker.clear();
        assert_eq!(tracker.step(BlockKind::Temperature, 1, Direction::Read, span(1)), None);
    }
}
