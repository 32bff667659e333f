//! S3-backed artifact store: the production adapter for C5.
//!
//! `get`/`put`/`head`/`copy` map directly onto the matching S3 operations.
//! `resolve` follows the three reference shapes from `reference::classify_reference`:
//! a same-bucket `s3://` URI or bare key is used as-is, an external-bucket
//! URI is server-side copied into the primary bucket (`CopyObject`), and a
//! presigned URL is downloaded and re-uploaded under a freshly minted
//! `uploaded/` key.
//!
//! `issue_upload_grant` presigns a `PutObject` request. The SDK does not
//! expose `generate_presigned_post`'s form-field policy the way boto3 does,
//! so the grant is a presigned-PUT URL whose `fields` map carries only the
//! canonical `key` the caller must echo back (documented in DESIGN.md).
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial S3 adapter: CRUD + presigned upload +
//!   reference resolution.

use crate::reference::{classify_reference, uploaded_key, ReferenceShape};

/// S3-backed implementation of [`crate::ArtifactStorePort`].
#[derive(Clone)]
pub struct S3ArtifactStore {
    client: aws_sdk_s3::Client,
    http: reqwest::Client,
    primary_bucket: std::string::String,
}

impl S3ArtifactStore {
    pub fn new(client: aws_sdk_s3::Client, primary_bucket: impl Into<std::string::String>) -> Self {
        Self {
            client,
            http: reqwest::Client::new(),
            primary_bucket: primary_bucket.into(),
        }
    }

    /// Builds a store from the default AWS credential/region chain.
    pub async fn from_env(primary_bucket: impl Into<std::string::String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_s3::Client::new(&config), primary_bucket)
    }

    async fn download_bytes(&self, bucket: &str, key: &str) -> std::result::Result<std::vec::Vec<u8>, idp_core::IdpError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| idp_core::IdpError::ArtifactUnavailable(std::format!("{err:?}")))?;
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|err| idp_core::IdpError::ArtifactUnavailable(std::format!("{err:?}")))?;
        std::result::Result::Ok(bytes.into_bytes().to_vec())
    }

    async fn materialize_presigned_url(&self, url: &str) -> std::result::Result<std::string::String, idp_core::IdpError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| idp_core::IdpError::ArtifactUnavailable(err.to_string()))?;
        if !response.status().is_success() {
            return std::result::Result::Err(idp_core::IdpError::ArtifactUnavailable(std::format!(
                "presigned URL fetch returned status {}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| idp_core::IdpError::ArtifactUnavailable(err.to_string()))?;
        let key = uploaded_key(url.split('?').next().unwrap_or(url));
        self.put(&key, bytes.to_vec(), "application/octet-stream").await?;
        std::result::Result::Ok(key)
    }
}

#[async_trait::async_trait]
impl crate::ArtifactStorePort for S3ArtifactStore {
    async fn head(&self, key: &str) -> std::result::Result<bool, idp_core::IdpError> {
        match self.client.head_object().bucket(&self.primary_bucket).key(key).send().await {
            std::result::Result::Ok(_) => std::result::Result::Ok(true),
            std::result::Result::Err(err) => {
                let message = std::format!("{err:?}");
                if message.contains("NotFound") || message.contains("404") {
                    std::result::Result::Ok(false)
                } else {
                    std::result::Result::Err(idp_core::IdpError::ArtifactUnavailable(message))
                }
            }
        }
    }

    async fn get(&self, key: &str) -> std::result::Result<std::vec::Vec<u8>, idp_core::IdpError> {
        self.download_bytes(&self.primary_bucket, key).await
    }

    async fn put(
        &self,
        key: &str,
        bytes: std::vec::Vec<u8>,
        content_type: &str,
    ) -> std::result::Result<(), idp_core::IdpError> {
        self.client
            .put_object()
            .bucket(&self.primary_bucket)
            .key(key)
            .content_type(content_type)
            .body(aws_sdk_s3::primitives::ByteStream::from(bytes))
            .send()
            .await
            .map_err(|err| idp_core::IdpError::ArtifactUnavailable(std::format!("{err:?}")))?;
        std::result::Result::Ok(())
    }

    async fn copy(&self, src: &str, dst: &str) -> std::result::Result<(), idp_core::IdpError> {
        let copy_source = std::format!("{}/{}", self.primary_bucket, src);
        self.client
            .copy_object()
            .bucket(&self.primary_bucket)
            .copy_source(copy_source)
            .key(dst)
            .send()
            .await
            .map_err(|err| idp_core::IdpError::ArtifactUnavailable(std::format!("{err:?}")))?;
        std::result::Result::Ok(())
    }

    async fn issue_upload_grant(
        &self,
        key: &str,
        ttl: std::time::Duration,
    ) -> std::result::Result<crate::domain::UploadGrant, idp_core::IdpError> {
        let ttl = std::cmp::max(ttl, crate::domain::upload_grant::MIN_UPLOAD_GRANT_TTL);
        let presigning_config = aws_sdk_s3::presigning::PresigningConfig::expires_in(ttl)
            .map_err(|err| idp_core::IdpError::ArtifactUnavailable(err.to_string()))?;
        let presigned = self
            .client
            .put_object()
            .bucket(&self.primary_bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|err| idp_core::IdpError::ArtifactUnavailable(std::format!("{err:?}")))?;

        let mut fields = std::collections::BTreeMap::new();
        fields.insert("key".to_string(), key.to_string());
        std::result::Result::Ok(crate::domain::UploadGrant {
            url: presigned.uri().to_string(),
            fields,
        })
    }

    async fn resolve(&self, reference: &str) -> std::result::Result<std::string::String, idp_core::IdpError> {
        match classify_reference(reference, &self.primary_bucket) {
            ReferenceShape::BareKey(key) => std::result::Result::Ok(key),
            ReferenceShape::SameBucketUri(key) => std::result::Result::Ok(key),
            ReferenceShape::ExternalUri { bucket, key } => {
                let dst = uploaded_key(&key);
                tracing::debug!(bucket, key, dst, "copying external-bucket reference into primary bucket");
                let copy_source = std::format!("{bucket}/{key}");
                self.client
                    .copy_object()
                    .bucket(&self.primary_bucket)
                    .copy_source(copy_source)
                    .key(&dst)
                    .send()
                    .await
                    .map_err(|err| idp_core::IdpError::ArtifactUnavailable(std::format!("{err:?}")))?;
                std::result::Result::Ok(dst)
            }
            ReferenceShape::PresignedUrl(url) => self.materialize_presigned_url(&url).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_classification_is_delegated_to_reference_module() {
        // `resolve`'s branch selection is exercised indirectly through
        // `reference::classify_reference`'s own unit tests; this asserts the
        // adapter constructs cleanly against a primary bucket name.
        let store = S3ArtifactStore {
            client: aws_sdk_s3::Client::new(&aws_config::SdkConfig::builder().build()),
            http: reqwest::Client::new(),
            primary_bucket: "my-bucket".to_string(),
        };
        assert_eq!(store.primary_bucket, "my-bucket");
    }
}
