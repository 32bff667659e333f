//! Pure helpers for classifying and minting artifact references.
//!
//! Grounded on `mcp_stdio_server.py`'s `is_presigned_url` / `is_s3_uri` /
//! `_resolve_file_path` and on the `uploaded/{stem}_{unique_id}{ext}` key
//! shape used by `upload_local_file` / `process_s3_uri` in that file.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial classify_reference/uploaded_key.

/// The three inbound reference shapes a caller may hand to `documents`
/// (`§4.5`), plus the trivial bare-key case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceShape {
    /// A key already relative to the primary namespace, e.g. `"invoices/a.pdf"`.
    BareKey(std::string::String),
    /// An `s3://bucket/key` URI whose bucket is the primary bucket.
    SameBucketUri(std::string::String),
    /// An `s3://bucket/key` URI whose bucket is some other bucket.
    ExternalUri {
        bucket: std::string::String,
        key: std::string::String,
    },
    /// An HTTP(S) presigned URL, to be downloaded and re-uploaded.
    PresignedUrl(std::string::String),
}

/// Classifies `reference` against `primary_bucket`. Mirrors the original's
/// `is_s3_uri`/`is_presigned_url` checks: an `s3://` prefix always wins over
/// an `http`/`https` prefix, and anything else is treated as a bare key.
pub fn classify_reference(reference: &str, primary_bucket: &str) -> ReferenceShape {
    if let std::option::Option::Some(rest) = reference.strip_prefix("s3://") {
        let mut parts = rest.splitn(2, '/');
        let bucket = parts.next().unwrap_or_default();
        let key = parts.next().unwrap_or_default();
        return if bucket == primary_bucket {
            ReferenceShape::SameBucketUri(key.to_string())
        } else {
            ReferenceShape::ExternalUri {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }
        };
    }
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return ReferenceShape::PresignedUrl(reference.to_string());
    }
    ReferenceShape::BareKey(reference.to_string())
}

/// Builds the canonical key materialized references land under:
/// `uploaded/{stem}_{8-hex-digit-suffix}{ext}`. The suffix disambiguates
/// repeated uploads of files sharing a name without requiring a lookup.
pub fn uploaded_key(original: &str) -> std::string::String {
    let file_name = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);
    let (stem, ext) = match file_name.rfind('.') {
        std::option::Option::Some(idx) => (&file_name[..idx], &file_name[idx..]),
        std::option::Option::None => (file_name, ""),
    };
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let suffix = &suffix[..8];
    format!("uploaded/{stem}_{suffix}{ext}")
}

/// Allowlisted directories searched, in order, for a bare file name when
/// resolving references against a local filesystem (`§4.5`; grounded on
/// `_resolve_file_path`'s `["demo/originals", "originals", "documents",
/// "files"]` search list).
pub const LOCAL_SEARCH_DIRS: &[&str] = &["demo/originals", "originals", "documents", "files"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bare_key() {
        let shape = classify_reference("invoices/a.pdf", "primary-bucket");
        assert_eq!(shape, ReferenceShape::BareKey("invoices/a.pdf".to_string()));
    }

    #[test]
    fn test_classify_same_bucket_uri() {
        let shape = classify_reference("s3://primary-bucket/invoices/a.pdf", "primary-bucket");
        assert_eq!(shape, ReferenceShape::SameBucketUri("invoices/a.pdf".to_string()));
    }

    #[test]
    fn test_classify_external_uri() {
        let shape = classify_reference("s3://other-bucket/invoices/a.pdf", "primary-bucket");
        assert_eq!(
            shape,
            ReferenceShape::ExternalUri {
                bucket: "other-bucket".to_string(),
                key: "invoices/a.pdf".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_presigned_url() {
        let shape = classify_reference("https://bucket.s3.amazonaws.com/key?X-Amz-Signature=abc", "primary-bucket");
        assert_eq!(
            shape,
            ReferenceShape::PresignedUrl("https://bucket.s3.amazonaws.com/key?X-Amz-Signature=abc".to_string())
        );
    }

    #[test]
    fn test_uploaded_key_preserves_stem_and_extension() {
        let key = uploaded_key("local/path/invoice.pdf");
        assert!(key.starts_with("uploaded/invoice_"));
        assert!(key.ends_with(".pdf"));
        assert_eq!(key.len(), "uploaded/invoice_".len() + 8 + ".pdf".len());
    }

    #[test]
    fn test_uploaded_key_without_extension() {
        let key = uploaded_key("README");
        assert!(key.starts_with("uploaded/README_"));
        assert!(!key.contains('.'));
    }

    #[test]
    fn test_uploaded_key_disambiguates_repeats() {
        let a = uploaded_key("a.pdf");
        let b = uploaded_key("a.pdf");
        assert_ne!(a, b);
    }
}
