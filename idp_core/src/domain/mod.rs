//! Canonical data model for the document extraction pipeline.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial domain module, one file per record
//!   type in the data model.

pub mod attribute_spec;
pub mod document_result;
pub mod extraction_request;
pub mod few_shot;
pub mod model_params;
pub mod parsing_mode;

pub use attribute_spec::{AttributeSet, AttributeSpec, AttributeType};
pub use document_result::{BatchResult, DocumentResult};
pub use extraction_request::ExtractionRequest;
pub use few_shot::FewShotExample;
pub use model_params::ModelParams;
pub use parsing_mode::ParsingMode;

/// Derives the deterministic output key for an extraction result from its
/// input key: `attributes/<stem>.json`, where `<stem>` drops the input's
/// leading path segment and its extension.
///
/// Writes under this key are idempotent by construction: the same input key
/// always derives the same output key, so a retried orchestration overwrites
/// rather than duplicates.
///
/// # Examples
///
/// ```
/// let key = idp_core::domain::output_key_for("originals/invoice.txt");
/// assert_eq!(key, "attributes/invoice.json");
/// ```
pub fn output_key_for(input_key: &str) -> String {
    let stem = input_key
        .rsplit_once('/')
        .map(|(_, tail)| tail)
        .unwrap_or(input_key);
    let stem = stem.rsplit_once('.').map(|(head, _)| head).unwrap_or(stem);
    std::format!("attributes/{stem}.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_key_strips_prefix_and_extension() {
        assert_eq!(
            output_key_for("originals/invoice.txt"),
            "attributes/invoice.json"
        );
        assert_eq!(
            output_key_for("uploaded/invoice_1a2b3c4d.pdf"),
            "attributes/invoice_1a2b3c4d.json"
        );
    }

    #[test]
    fn test_output_key_with_no_path_prefix() {
        assert_eq!(output_key_for("invoice.txt"), "attributes/invoice.json");
    }
}
