#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod bank;
pub mod error;
pub mod grader;
pub mod navigator;
pub mod session;

pub use bank::QuestionBank;
pub use grader::{grade, Grade};
pub use navigator::{advance, Direction};
pub use session::{Phase, QuizSession, View};
