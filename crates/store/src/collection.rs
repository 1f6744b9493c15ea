use crate::error::{Error, Result};
use model::Chunk;

struct Entry {
    chunk: Chunk,
    vector: Box<[f32]>,
    norm: f32,
}

/// An exact-search vector collection held entirely in memory.
pub struct Collection {
    entries: Box<[Entry]>,
    dimension: usize,
}

fn norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}

impl Collection {
    /// Builds a collection from chunks and their embeddings, paired by position.
    pub fn from_documents(chunks: Vec<Chunk>, vectors: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.len() != vectors.len() {
            return Err(Error::CountMismatch { chunks: chunks.len(), vectors: vectors.len() });
        }

        let dimension = vectors.first().ok_or(Error::Empty)?.len();
        let entries = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| {
                if vector.len() != dimension {
                    return Err(Error::DimensionMismatch { expected: dimension, found: vector.len() });
                }
                let norm = norm(&vector);
                Ok(Entry { chunk, vector: vector.into_boxed_slice(), norm })
            })
            .collect::<Result<_>>()?;

        Ok(Self { entries, dimension })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns up to `k` chunks ordered by decreasing relevance. Relevance maps cosine
    /// similarity from `[-1, 1]` onto `[0, 1]`; a zero vector on either side scores `0.5`.
    pub fn similarity_search_with_relevance_scores(&self, query: &[f32], k: usize) -> Result<Vec<(&Chunk, f32)>> {
        if query.len() != self.dimension {
            return Err(Error::DimensionMismatch { expected: self.dimension, found: query.len() });
        }

        let query_norm = norm(query);
        let mut scored: Vec<_> = self
            .entries
            .iter()
            .map(|entry| {
                let denom = entry.norm * query_norm;
                let cosine = if denom > 0.0 {
                    let dot: f32 = entry.vector.iter().zip(query).map(|(a, b)| a * b).sum();
                    (dot / denom).clamp(-1.0, 1.0)
                } else {
                    0.0
                };
                (&entry.chunk, (1.0 + cosine) / 2.0)
            })
            .collect();

        // Stable sort keeps insertion order among ties.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        Ok(scored)
    }
}
