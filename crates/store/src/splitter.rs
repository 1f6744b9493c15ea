use crate::error::{Error, Result};
use model::{Chunk, Page};
use std::collections::VecDeque;

/// Splits text on a fixed separator and greedily merges the pieces back into chunks of
/// bounded length. Lengths are measured in characters.
#[derive(Clone, Debug)]
pub struct CharacterSplitter {
    separator: Box<str>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for CharacterSplitter {
    fn default() -> Self {
        Self { separator: "\n\n".into(), chunk_size: 1000, chunk_overlap: 200 }
    }
}

impl CharacterSplitter {
    pub fn new(separator: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if separator.is_empty() {
            return Err(Error::InvalidConfig("separator must not be empty"));
        }
        if chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk size must be greater than zero"));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::InvalidConfig("chunk overlap must be less than chunk size"));
        }
        Ok(Self { separator: separator.into(), chunk_size, chunk_overlap })
    }

    /// Splits every page, tagging each chunk with the page it came from.
    pub fn split_pages(&self, pages: &[Page]) -> Result<Vec<Chunk>> {
        if pages.is_empty() {
            return Err(Error::NoDocuments);
        }

        Ok(pages
            .iter()
            .flat_map(|page| {
                self.split_text(&page.content).into_iter().map(|text| Chunk {
                    source: page.source.clone(),
                    page: page.number,
                    text: text.into_boxed_str(),
                })
            })
            .collect())
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        let separator_len = self.separator.chars().count();
        let mut chunks = Vec::new();
        let mut window = VecDeque::<&str>::new();
        let mut total = 0;

        for piece in text.split(&*self.separator).filter(|piece| !piece.is_empty()) {
            let len = piece.chars().count();
            let joiner = if window.is_empty() { 0 } else { separator_len };
            if total + joiner + len > self.chunk_size && !window.is_empty() {
                self.push_joined(&mut chunks, &window);

                // Keep a tail of at most `chunk_overlap` characters that still leaves
                // room for the incoming piece.
                loop {
                    let joiner = if window.is_empty() { 0 } else { separator_len };
                    let crowded = total > 0 && total + joiner + len > self.chunk_size;
                    if total <= self.chunk_overlap && !crowded {
                        break;
                    }
                    let Some(front) = window.pop_front() else { break };
                    let joiner = if window.is_empty() { 0 } else { separator_len };
                    total -= front.chars().count() + joiner;
                }
            }

            let joiner = if window.is_empty() { 0 } else { separator_len };
            window.push_back(piece);
            total += len + joiner;
        }

        self.push_joined(&mut chunks, &window);
        chunks
    }

    fn push_joined(&self, chunks: &mut Vec<String>, window: &VecDeque<&str>) {
        let joined = window.iter().copied().collect::<Vec<_>>().join(&*self.separator);
        let trimmed = joined.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_owned());
        }
    }
}
