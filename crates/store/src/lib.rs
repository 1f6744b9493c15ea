//! In-memory retrieval over uploaded document text: splitting pages into chunks,
//! a local embedding fallback, and an exact cosine-similarity collection.

pub mod collection;
pub mod embedding;
pub mod error;
pub mod splitter;

pub use collection::Collection;
pub use embedding::HashingEmbedder;
pub use splitter::CharacterSplitter;
