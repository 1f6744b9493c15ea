use crate::error::{Error, Result};
use alloc::{boxed::Box, vec::Vec};
use core::num::NonZeroUsize;
use model::Question;

/// The ordered, immutable set of questions for one quiz.
#[derive(Debug)]
pub struct QuestionBank(Box<[Question]>);

impl TryFrom<Vec<Question>> for QuestionBank {
    type Error = Error;

    fn try_from(questions: Vec<Question>) -> Result<Self> {
        if questions.is_empty() {
            return Err(Error::EmptyBank);
        }

        if let Some(position) = questions.iter().position(|question| question.validate().is_err()) {
            return Err(Error::InvalidQuestion { position });
        }

        Ok(Self(questions.into_boxed_slice()))
    }
}

impl QuestionBank {
    pub fn size(&self) -> NonZeroUsize {
        // Construction rejects empty banks.
        NonZeroUsize::new(self.0.len()).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn at(&self, index: usize) -> Result<&Question> {
        self.0.get(index).ok_or(Error::IndexOutOfRange { index, len: self.0.len() })
    }
}
