//! idp_prompting - tokenizer, prompt composer, and response parser.
//!
//! These are the three pure, CPU-bound components of the extraction
//! pipeline: nothing in this crate suspends on I/O except the filesystem
//! template loader, which is isolated behind a port.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial crate: tokenizer + composer + parser.

pub mod composer;
pub mod lenient_json;
pub mod parser;
pub mod tokenizer;

/// Returns the crate semantic version at compile time.
pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
