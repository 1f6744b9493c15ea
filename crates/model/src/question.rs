use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};
use serde::{Deserialize, Serialize};

/// One selectable answer of a multiple-choice question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Choice {
    /// Single-character label such as `A` or `B`.
    pub key: String,
    pub value: String,
}

impl Display for Choice {
    /// Renders the choice the way it is presented to the user: `B) Paris`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}) {}", self.key, self.value)
    }
}

/// A generated multiple-choice question. Records are immutable once they enter a quiz.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    /// Question text to be displayed.
    pub question: String,
    /// Possible answers in display order.
    pub choices: Vec<Choice>,
    /// Key of the correct choice.
    pub answer: String,
    /// Shown to the user after grading.
    pub explanation: String,
}

/// Reasons a question record is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Invalid {
    BlankQuestion,
    NoChoices,
    /// The choice at this position has a key that is not exactly one visible character.
    MalformedKey(usize),
    /// The choice at this position reuses an earlier key.
    DuplicateKey(usize),
    UnknownAnswer,
}

impl Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankQuestion => f.write_str("question text is blank"),
            Self::NoChoices => f.write_str("question has no choices"),
            Self::MalformedKey(pos) => write!(f, "choice {pos} has a malformed key"),
            Self::DuplicateKey(pos) => write!(f, "choice {pos} repeats an earlier key"),
            Self::UnknownAnswer => f.write_str("answer does not name any choice"),
        }
    }
}

impl Question {
    /// Checks the record invariants: non-empty text and choices, unique single-character
    /// keys, and an answer that names one of the keys.
    pub fn validate(&self) -> Result<(), Invalid> {
        if self.question.trim().is_empty() {
            return Err(Invalid::BlankQuestion);
        }

        if self.choices.is_empty() {
            return Err(Invalid::NoChoices);
        }

        for (pos, choice) in self.choices.iter().enumerate() {
            let mut chars = choice.key.chars();
            let well_formed = matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_whitespace());
            if !well_formed {
                return Err(Invalid::MalformedKey(pos));
            }
            if self.choices[..pos].iter().any(|prev| prev.key == choice.key) {
                return Err(Invalid::DuplicateKey(pos));
            }
        }

        if !self.choices.iter().any(|choice| choice.key == self.answer) {
            return Err(Invalid::UnknownAnswer);
        }

        Ok(())
    }
}
