use crate::{
    bank::QuestionBank,
    error::Result,
    grader::{self, Grade},
    navigator::{self, Direction},
};
use alloc::vec::Vec;
use model::{Choice, Question};
use serde::Serialize;

#[derive(Debug, PartialEq, Eq)]
pub enum Phase {
    /// The current question is displayed without feedback.
    AwaitingAnswer,
    /// A selection was submitted for the current question.
    Graded(Grade),
}

/// Everything the presentation layer needs to render the current question.
#[derive(Debug, Serialize)]
pub struct View<'q> {
    pub question: &'q str,
    pub choices: &'q [Choice],
    pub index: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<&'q Grade>,
}

/// One user's pass through a generated quiz. A session only exists once it has at
/// least one question, so there is no representable state with an undefined cursor.
#[derive(Debug)]
pub struct QuizSession {
    bank: QuestionBank,
    cursor: usize,
    phase: Phase,
}

impl QuizSession {
    /// Starts a quiz at the first question. Fails with [`EmptyBank`](crate::error::Error::EmptyBank)
    /// before any navigation state exists when `questions` is empty.
    pub fn start(questions: Vec<Question>) -> Result<Self> {
        let bank = QuestionBank::try_from(questions)?;
        Ok(Self { bank, cursor: 0, phase: Phase::AwaitingAnswer })
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn len(&self) -> usize {
        self.bank.size().get()
    }

    pub fn current(&self) -> Result<&Question> {
        self.bank.at(self.cursor)
    }

    pub fn view(&self) -> Result<View<'_>> {
        let Question { question, choices, .. } = self.current()?;
        let grade = match &self.phase {
            Phase::Graded(grade) => Some(grade),
            Phase::AwaitingAnswer => None,
        };
        Ok(View { question, choices, index: self.cursor, total: self.len(), grade })
    }

    /// Grades the selection against the current question. The cursor does not move.
    pub fn submit(&mut self, selected: &str) -> Result<Grade> {
        let grade = grader::grade(selected, self.bank.at(self.cursor)?);
        self.phase = Phase::Graded(grade.clone());
        Ok(grade)
    }

    /// Moves the cursor one step and clears any previous grading outcome.
    pub fn navigate(&mut self, direction: Direction) -> usize {
        self.cursor = navigator::advance(self.cursor, direction, self.bank.size());
        self.phase = Phase::AwaitingAnswer;
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Phase, Question, QuizSession};
    use crate::error::Error;
    use model::Choice;

    fn question(n: usize) -> Question {
        Question {
            question: format!("Question {n}?"),
            choices: vec![
                Choice { key: "A".into(), value: "First".into() },
                Choice { key: "B".into(), value: "Second".into() },
                Choice { key: "C".into(), value: "Third".into() },
            ],
            answer: "C".into(),
            explanation: format!("Explanation {n}."),
        }
    }

    fn three() -> QuizSession {
        QuizSession::start(vec![question(0), question(1), question(2)]).unwrap()
    }

    #[test]
    fn rejects_empty_quiz() {
        assert_eq!(QuizSession::start(Vec::new()).unwrap_err(), Error::EmptyBank);
    }

    #[test]
    fn starts_awaiting_first_answer() {
        let session = three();
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.phase(), &Phase::AwaitingAnswer);
        let view = session.view().unwrap();
        assert_eq!(view.question, "Question 0?");
        assert_eq!(view.index, 0);
        assert_eq!(view.total, 3);
        assert_eq!(view.choices.len(), 3);
        assert!(view.grade.is_none());
    }

    #[test]
    fn walks_and_clamps_at_both_ends() {
        let mut session = three();
        assert_eq!(session.navigate(Direction::Next), 1);
        assert_eq!(session.navigate(Direction::Next), 2);
        assert_eq!(session.navigate(Direction::Next), 2);
        assert_eq!(session.navigate(Direction::Previous), 1);
        assert_eq!(session.navigate(Direction::Previous), 0);
        assert_eq!(session.navigate(Direction::Previous), 0);
        assert_eq!(session.current().unwrap().question, "Question 0?");
    }

    #[test]
    fn submit_grades_without_advancing() {
        let mut session = three();
        session.navigate(Direction::Next);

        let grade = session.submit("A) First").unwrap();
        assert!(!grade.correct);
        assert_eq!(grade.explanation, "Explanation 1.");
        assert_eq!(session.cursor(), 1);

        let grade = session.submit("C) Third").unwrap();
        assert!(grade.correct);
        assert_eq!(session.phase(), &Phase::Graded(grade.clone()));
        assert_eq!(session.view().unwrap().grade, Some(&grade));
    }

    #[test]
    fn navigation_clears_grade() {
        let mut session = three();
        session.submit("C) Third").unwrap();
        session.navigate(Direction::Next);
        assert_eq!(session.phase(), &Phase::AwaitingAnswer);
        assert!(session.view().unwrap().grade.is_none());

        // Clamped moves still count as navigation.
        session.navigate(Direction::Next);
        session.submit("A) First").unwrap();
        session.navigate(Direction::Next);
        assert_eq!(session.cursor(), 2);
        assert_eq!(session.phase(), &Phase::AwaitingAnswer);
    }
}
