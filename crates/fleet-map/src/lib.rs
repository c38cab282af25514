//! Header normalization for the fleet import pipeline.

pub mod normalizer;
pub mod synonyms;

pub use normalizer::HeaderNormalizer;
pub use synonyms::{SynonymTable, normalize_text};
