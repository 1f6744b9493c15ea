use model::Question;
use serde::Serialize;

/// Outcome of a single submission. Never stored beyond the question it grades.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub correct: bool,
    pub explanation: alloc::string::String,
}

/// Grades a rendered selection such as `B) Paris` against the question.
///
/// A selection is correct when it *starts with* the answer key. This tolerates the
/// `key) value` rendering without parsing it apart, but it also means the value text is
/// never compared: `B) anything` is accepted whenever the answer is `B`.
pub fn grade(selected: &str, question: &Question) -> Grade {
    Grade {
        correct: selected.starts_with(question.answer.as_str()),
        explanation: question.explanation.clone(),
    }
}
