use crate::error::Error;
use core::num::NonZeroUsize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl TryFrom<i64> for Direction {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Next),
            -1 => Ok(Self::Previous),
            _ => Err(Error::InvalidDirection(value)),
        }
    }
}

/// Computes the cursor after one step in `direction`. The result is clamped to
/// `[0, len - 1]`: stepping past either end stays on that end instead of wrapping around.
pub fn advance(current: usize, direction: Direction, len: NonZeroUsize) -> usize {
    let last = len.get() - 1;
    let next = match direction {
        Direction::Next => current.saturating_add(1),
        Direction::Previous => current.saturating_sub(1),
    };
    next.min(last)
}
