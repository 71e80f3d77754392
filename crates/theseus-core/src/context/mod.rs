//! Context extraction seam.

pub mod extractor;

pub use extractor::ContextExtractor;
