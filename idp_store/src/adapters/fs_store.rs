//! Filesystem-backed artifact store: backs the optional stdio-facade variant
//! (`§4.5`) and the test suite. All keys are paths relative to a configured
//! root directory.
//!
//! `resolve` additionally searches [`crate::reference::LOCAL_SEARCH_DIRS`]
//! for a bare file name that doesn't exist at the root, mirroring
//! `mcp_stdio_server.py`'s `_resolve_file_path` fallback search.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial filesystem adapter.

use crate::reference::{classify_reference, uploaded_key, ReferenceShape, LOCAL_SEARCH_DIRS};

/// Filesystem-backed implementation of [`crate::ArtifactStorePort`].
#[derive(Clone)]
pub struct FsArtifactStore {
    root: std::path::PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> std::path::PathBuf {
        self.root.join(key)
    }

    /// Finds an existing file for a bare name: first at the root, then under
    /// each of [`LOCAL_SEARCH_DIRS`] relative to the root.
    fn find_existing(&self, bare_name: &str) -> std::option::Option<std::path::PathBuf> {
        let direct = self.path_for(bare_name);
        if direct.is_file() {
            return std::option::Option::Some(direct);
        }
        for dir in LOCAL_SEARCH_DIRS {
            let candidate = self.root.join(dir).join(bare_name);
            if candidate.is_file() {
                return std::option::Option::Some(candidate);
            }
        }
        std::option::Option::None
    }
}

#[async_trait::async_trait]
impl crate::ArtifactStorePort for FsArtifactStore {
    async fn head(&self, key: &str) -> std::result::Result<bool, idp_core::IdpError> {
        std::result::Result::Ok(self.path_for(key).is_file())
    }

    async fn get(&self, key: &str) -> std::result::Result<std::vec::Vec<u8>, idp_core::IdpError> {
        tokio::fs::read(self.path_for(key))
            .await
            .map_err(|err| idp_core::IdpError::ArtifactUnavailable(std::format!("{key}: {err}")))
    }

    async fn put(
        &self,
        key: &str,
        bytes: std::vec::Vec<u8>,
        _content_type: &str,
    ) -> std::result::Result<(), idp_core::IdpError> {
        let path = self.path_for(key);
        if let std::option::Option::Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| idp_core::IdpError::ArtifactUnavailable(err.to_string()))?;
        }
        tokio::fs::write(path, bytes)
            .await
            .map_err(|err| idp_core::IdpError::ArtifactUnavailable(err.to_string()))
    }

    async fn copy(&self, src: &str, dst: &str) -> std::result::Result<(), idp_core::IdpError> {
        let dst_path = self.path_for(dst);
        if let std::option::Option::Some(parent) = dst_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| idp_core::IdpError::ArtifactUnavailable(err.to_string()))?;
        }
        tokio::fs::copy(self.path_for(src), dst_path)
            .await
            .map_err(|err| idp_core::IdpError::ArtifactUnavailable(std::format!("{src} -> {dst}: {err}")))?;
        std::result::Result::Ok(())
    }

    async fn issue_upload_grant(
        &self,
        key: &str,
        _ttl: std::time::Duration,
    ) -> std::result::Result<crate::domain::UploadGrant, idp_core::IdpError> {
        // The stdio facade has no HTTP front door; the "grant" is simply the
        // absolute path the caller should write to directly.
        let mut fields = std::collections::BTreeMap::new();
        fields.insert("key".to_string(), key.to_string());
        std::result::Result::Ok(crate::domain::UploadGrant {
            url: self.path_for(key).to_string_lossy().into_owned(),
            fields,
        })
    }

    async fn resolve(&self, reference: &str) -> std::result::Result<std::string::String, idp_core::IdpError> {
        match classify_reference(reference, "") {
            ReferenceShape::BareKey(name) => match self.find_existing(&name) {
                std::option::Option::Some(path) => std::result::Result::Ok(
                    path.strip_prefix(&self.root)
                        .unwrap_or(&path)
                        .to_string_lossy()
                        .into_owned(),
                ),
                std::option::Option::None => std::result::Result::Err(idp_core::IdpError::ArtifactUnavailable(
                    std::format!("no such file: {name} (searched root and {LOCAL_SEARCH_DIRS:?})"),
                )),
            },
            ReferenceShape::SameBucketUri(key) | ReferenceShape::ExternalUri { key, .. } => {
                std::result::Result::Ok(key)
            }
            ReferenceShape::PresignedUrl(url) => {
                let response = reqwest::get(&url)
                    .await
                    .map_err(|err| idp_core::IdpError::ArtifactUnavailable(err.to_string()))?;
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|err| idp_core::IdpError::ArtifactUnavailable(err.to_string()))?;
                let key = uploaded_key(url.split('?').next().unwrap_or(&url));
                self.put(&key, bytes.to_vec(), "application/octet-stream").await?;
                std::result::Result::Ok(key)
            }
        }
    }
}
