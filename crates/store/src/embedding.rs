use core::hash::Hasher;
use rustc_hash::FxHasher;

/// Bag-of-words feature hashing. Requires no model or network access, which makes it
/// the fallback when no embedding service is configured.
#[derive(Clone, Copy, Debug)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self { dimension: 512 }
    }
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Option<Self> {
        (dimension > 0).then_some(Self { dimension })
    }

    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embeds the text as an L2-normalized vector of token counts.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimension];
        for token in text.split(|c: char| !c.is_alphanumeric()).filter(|token| !token.is_empty()) {
            let mut hasher = FxHasher::default();
            for c in token.chars().flat_map(char::to_lowercase) {
                hasher.write_u32(c.into());
            }
            let bucket = (hasher.finish() % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }

    pub fn embed_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<f32>> {
        texts.iter().map(|text| self.embed(text.as_ref())).collect()
    }
}
