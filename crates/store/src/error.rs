use core::fmt::{self, Display};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Splitter parameters cannot produce chunks.
    InvalidConfig(&'static str),
    /// No pages were provided for indexing.
    NoDocuments,
    /// A collection cannot be built from zero chunks.
    Empty,
    /// Every chunk needs exactly one vector.
    CountMismatch { chunks: usize, vectors: usize },
    /// Vectors within a collection (and queries against it) must share one dimension.
    DimensionMismatch { expected: usize, found: usize },
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(reason) => write!(f, "Invalid splitter configuration: {reason}."),
            Self::NoDocuments => f.write_str("No documents found!"),
            Self::Empty => f.write_str("The documents did not contain any indexable text."),
            Self::CountMismatch { chunks, vectors } => {
                write!(f, "Received {vectors} embeddings for {chunks} chunks.")
            }
            Self::DimensionMismatch { expected, found } => {
                write!(f, "Expected embeddings of dimension {expected} but found {found}.")
            }
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
