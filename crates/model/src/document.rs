use alloc::boxed::Box;
use serde::{Deserialize, Serialize};

/// Text extracted from a single page of an uploaded document.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Page {
    /// File name the page was uploaded under.
    pub source: Box<str>,
    /// One-based page number within the source.
    pub number: u32,
    pub content: Box<str>,
}

/// A slice of page text small enough to be embedded as one vector.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Chunk {
    pub source: Box<str>,
    pub page: u32,
    pub text: Box<str>,
}
