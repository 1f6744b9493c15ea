#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod document;
pub mod question;

pub use document::{Chunk, Page};
pub use question::{Choice, Invalid, Question};
