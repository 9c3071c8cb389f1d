mod normalize;
mod normalizer;

pub mod extractors;

pub use normalize::{bound_metadata, normalize_segments};
pub use normalizer::{parse_document_file, DocumentNormalizer};
