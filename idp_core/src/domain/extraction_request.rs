//! The inbound unit of work: a batch of documents plus a shared extraction
//! specification.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial ExtractionRequest, ported from the
//!   inbound request contract (§6.1 of the extraction interface).

use crate::domain::attribute_spec::AttributeSet;
use crate::domain::few_shot::FewShotExample;
use crate::domain::model_params::ModelParams;
use crate::domain::parsing_mode::ParsingMode;

/// A batch extraction request: N document references, one shared attribute
/// set, one parsing strategy, one model configuration.
///
/// The orchestrator fans this out into one per-document task; `attributes`,
/// `instructions`, `few_shots`, `parsing_mode` and `model_params` are shared
/// across every document in the batch.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
pub struct ExtractionRequest {
    pub documents: Vec<String>,
    pub attributes: AttributeSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default)]
    pub few_shots: Vec<FewShotExample>,
    pub parsing_mode: ParsingMode,
    pub model_params: ModelParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_chunks: Option<bool>,
}

impl ExtractionRequest {
    /// Chunk size to use for the image extractor, defaulting to 10 pages.
    pub fn effective_chunk_size(&self) -> u32 {
        self.chunk_size.unwrap_or(10).max(1)
    }

    /// Whether chunks of one document should run concurrently, defaulting to
    /// true.
    pub fn effective_parallel_chunks(&self) -> bool {
        self.parallel_chunks.unwrap_or(true)
    }

    /// Validates the fields that must hold before fan-out; a failure here is
    /// a `MalformedRequest`, not a per-document error.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.documents.is_empty() {
            return std::result::Result::Err("documents must be non-empty".to_string());
        }
        if self.attributes.is_empty() {
            return std::result::Result::Err("attributes must be non-empty".to_string());
        }
        if self.model_params.temperature < 0.0 || self.model_params.temperature > 1.0 {
            return std::result::Result::Err(std::format!(
                "temperature must be in [0,1], got {}",
                self.model_params.temperature
            ));
        }
        std::result::Result::Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attribute_spec::AttributeSpec;

    fn sample_request() -> ExtractionRequest {
        ExtractionRequest {
            documents: std::vec!["originals/a.txt".to_string()],
            attributes: AttributeSet::new(std::vec![AttributeSpec::new("name", "person name")])
                .unwrap(),
            instructions: None,
            few_shots: std::vec![],
            parsing_mode: ParsingMode::TextLlm,
            model_params: ModelParams::new("anthropic.claude-3-7-sonnet-20250219-v1:0", 0.0),
            chunk_size: None,
            parallel_chunks: None,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_request() {
        assert!(sample_request().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_documents() {
        let mut request = sample_request();
        request.documents.clear();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_effective_defaults() {
        let request = sample_request();
        assert_eq!(request.effective_chunk_size(), 10);
        assert!(request.effective_parallel_chunks());
    }
}
