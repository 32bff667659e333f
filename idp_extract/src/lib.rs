//! idp_extract - the two document extractors (C6, C7).
//!
//! The Text Extractor is a single LLM call: load, compose, budget, invoke,
//! parse, persist. The Image Extractor is the hardest part of the pipeline
//! (`§4.7`): rasterize, page-chunk, prime with any multimodal few-shot,
//! dispatch chunks with bounded parallelism, parse each chunk independently,
//! and fold the per-chunk answers into one document answer in page order
//! regardless of completion order.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial crate: text_extractor + image_extractor.

pub mod image_extractor;
pub mod text_extractor;
mod util;

pub use image_extractor::ImageExtractor;
pub use text_extractor::TextExtractor;

/// Returns the crate semantic version at compile time.
pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
