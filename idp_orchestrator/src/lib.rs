//! idp_orchestrator - the per-batch state machine (C8).
//!
//! Given an `ExtractionRequest` and a batch of document references, the
//! `Orchestrator` routes each document to the extractor its `parsing_mode`
//! selects, isolates per-document failures so one bad document never aborts
//! the batch, and returns a `BatchResult` in input order. It is the one
//! component in the workspace that depends on every other crate; nothing
//! depends on it.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial crate: Orchestrator + OCR/managed-IDP
//!   collaborator ports + unconfigured fallback adapters.

pub mod adapters;
pub mod orchestrator;
pub mod ports;

pub use orchestrator::{Orchestrator, DEFAULT_MAX_CONCURRENT_DOCUMENTS};
pub use ports::{ManagedIdpOutcome, ManagedIdpPort, OcrPort};

/// Returns the crate semantic version at compile time.
pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_crate_version_non_empty() {
        assert!(!super::crate_version().is_empty());
    }
}
