//! A short-lived presigned-POST grant for the front end's upload surface.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial UploadGrant, matching the `POST /url`
//!   response shape of `§6.3`.

/// A one-time presigned-POST grant. `fields` always carries a `key` entry:
/// the canonical artifact reference the caller must echo back in a
/// subsequent `ExtractionRequest.documents` entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UploadGrant {
    pub url: std::string::String,
    pub fields: std::collections::BTreeMap<std::string::String, std::string::String>,
}

impl UploadGrant {
    pub fn key(&self) -> std::option::Option<&str> {
        self.fields.get("key").map(std::string::String::as_str)
    }
}

/// Minimum time-to-live an upload grant must honor (`§6.3`: "TTL: ≥5 minutes").
pub const MIN_UPLOAD_GRANT_TTL: std::time::Duration = std::time::Duration::from_secs(5 * 60);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_accessor() {
        let mut fields = std::collections::BTreeMap::new();
        fields.insert("key".to_string(), "originals/a.pdf".to_string());
        let grant = UploadGrant {
            url: "https://example-bucket.s3.amazonaws.com/".to_string(),
            fields,
        };
        assert_eq!(grant.key(), std::option::Option::Some("originals/a.pdf"));
    }
}
