//! idp_store - the artifact store gateway (C5).
//!
//! Every read/write in the extraction pipeline goes through
//! [`ports::ArtifactStorePort`]: original uploads, OCR/text-conversion
//! output, per-document results, and few-shot assets all live under one
//! logical namespace (`§6.2`). The S3 adapter is the production backend; the
//! filesystem adapter backs the optional stdio-facade variant and the test
//! suite.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial crate: port, reference resolution,
//!   S3 + filesystem adapters.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod reference;

pub use domain::UploadGrant;
pub use ports::ArtifactStorePort;

/// Returns the crate semantic version at compile time.
pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
