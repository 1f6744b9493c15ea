use core::fmt::{self, Display};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Attempted to read past the bounds of the question bank.
    IndexOutOfRange { index: usize, len: usize },
    /// A quiz cannot be started without questions.
    EmptyBank,
    /// Navigation only accepts `+1` and `-1`.
    InvalidDirection(i64),
    /// The record at this position violates the question invariants.
    InvalidQuestion { position: usize },
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "Question {index} is out of range for a quiz of {len} questions.")
            }
            Self::EmptyBank => f.write_str("No questions available."),
            Self::InvalidDirection(value) => write!(f, "Invalid navigation direction {value}."),
            Self::InvalidQuestion { position } => write!(f, "Question {position} is malformed."),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
