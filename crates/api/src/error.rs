use core::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    /// The uploaded bytes are not a readable PDF.
    UnreadableDocument,
    /// The PDF parsed but no page contained extractable text.
    NoText,
    /// Accepting the upload would exceed the pending page limit of a session.
    TooManyPages { limit: usize },
    BlankTopic,
    InvalidCount,
    /// The embedding service failed or returned an unexpected payload.
    Embedding,
    /// The language model could not be reached or returned an error status.
    Generation,
    /// The language model replied with something that is not a question record.
    MalformedQuestion,
    Store(store::error::Error),
    Quiz(quiz::error::Error),
}

impl From<store::error::Error> for Error {
    fn from(err: store::error::Error) -> Self {
        Self::Store(err)
    }
}

impl From<quiz::error::Error> for Error {
    fn from(err: quiz::error::Error) -> Self {
        Self::Quiz(err)
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        log::warn!("rejected document: {err}");
        Self::UnreadableDocument
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnreadableDocument => f.write_str("The uploaded file is not a readable PDF."),
            Self::NoText => f.write_str("The uploaded PDF does not contain any extractable text."),
            Self::TooManyPages { limit } => {
                write!(f, "At most {limit} pages can be loaded at once. Start a new quiz to clear them.")
            }
            Self::BlankTopic => f.write_str("Please enter a topic for the quiz."),
            Self::InvalidCount => f.write_str("The number of questions must be between 1 and 10."),
            Self::Embedding => f.write_str("Failed to embed the documents. Please try again later."),
            Self::Generation => f.write_str("Failed to generate quiz questions. Please try again later."),
            Self::MalformedQuestion => f.write_str("The generated question was malformed."),
            Self::Store(err) => Display::fmt(err, f),
            Self::Quiz(err) => Display::fmt(err, f),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
