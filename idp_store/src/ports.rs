//! Port abstracting the artifact store (C5).
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial ArtifactStorePort: head/get/put/copy,
//!   upload-grant issuance, reference resolution.

/// Object-store operations every extractor and the orchestrator depend on.
///
/// All writes target the implementation's configured "primary" namespace
/// (`§4.5`). `resolve` is the one operation whose behavior differs between
/// adapters: the S3 adapter copies/downloads external references into the
/// primary bucket; the filesystem adapter additionally searches a small
/// allowlist of project-relative directories for bare file names.
#[async_trait::async_trait]
pub trait ArtifactStorePort: std::marker::Send + std::marker::Sync {
    /// Returns whether `key` exists in the primary namespace.
    async fn head(&self, key: &str) -> std::result::Result<bool, idp_core::IdpError>;

    /// Reads the full contents of `key` from the primary namespace.
    async fn get(&self, key: &str) -> std::result::Result<std::vec::Vec<u8>, idp_core::IdpError>;

    /// Writes `bytes` to `key` in the primary namespace, overwriting any
    /// existing object (writes are idempotent by construction, `§3`).
    async fn put(
        &self,
        key: &str,
        bytes: std::vec::Vec<u8>,
        content_type: &str,
    ) -> std::result::Result<(), idp_core::IdpError>;

    /// Copies `src` to `dst`, both within the primary namespace.
    async fn copy(&self, src: &str, dst: &str) -> std::result::Result<(), idp_core::IdpError>;

    /// Issues a short-lived upload grant for `key`, valid for at least `ttl`.
    async fn issue_upload_grant(
        &self,
        key: &str,
        ttl: std::time::Duration,
    ) -> std::result::Result<crate::domain::UploadGrant, idp_core::IdpError>;

    /// Resolves an inbound document reference to a canonical key in the
    /// primary namespace, materializing external content when necessary
    /// (`§4.5`).
    async fn resolve(&self, reference: &str) -> std::result::Result<std::string::String, idp_core::IdpError>;
}
