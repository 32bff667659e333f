//! Fallback collaborator adapters for when no OCR/managed-IDP integration
//! has been wired into an `Orchestrator` instance.
//!
//! A deployment without Textract or Bedrock Data Automation credentials can
//! still route every document through `TEXT_LLM`/`IMAGE_LLM`; the moment a
//! caller submits `OCR_THEN_TEXT_LLM` or `MANAGED_IDP` against this
//! fallback, the document fails with `ParsingStageFailed` rather than the
//! process panicking on an absent collaborator.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial UnconfiguredOcr/UnconfiguredManagedIdp.

use crate::ports::{ManagedIdpOutcome, ManagedIdpPort, OcrPort};

/// `OcrPort` that always reports the collaborator as unavailable.
pub struct UnconfiguredOcr;

#[async_trait::async_trait]
impl OcrPort for UnconfiguredOcr {
    async fn run(&self, _input_key: &str) -> std::result::Result<std::string::String, idp_core::IdpError> {
        std::result::Result::Err(idp_core::IdpError::ParsingStageFailed(
            "no OCR collaborator is configured for this deployment".to_string(),
        ))
    }
}

/// `ManagedIdpPort` that always reports the collaborator as unavailable.
pub struct UnconfiguredManagedIdp;

#[async_trait::async_trait]
impl ManagedIdpPort for UnconfiguredManagedIdp {
    async fn run(
        &self,
        _input_key: &str,
        _request: &idp_core::domain::ExtractionRequest,
    ) -> std::result::Result<ManagedIdpOutcome, idp_core::IdpError> {
        std::result::Result::Err(idp_core::IdpError::ParsingStageFailed(
            "no managed-IDP collaborator is configured for this deployment".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_ocr_is_a_parsing_stage_failure() {
        let err = UnconfiguredOcr.run("originals/a.pdf").await.unwrap_err();
        assert_eq!(err.kind(), idp_core::ErrorKind::ParsingStageFailed);
    }

    #[tokio::test]
    async fn test_unconfigured_managed_idp_is_a_parsing_stage_failure() {
        use idp_core::domain::{AttributeSet, AttributeSpec, ModelParams, ParsingMode};
        let request = idp_core::domain::ExtractionRequest {
            documents: std::vec!["originals/a.pdf".to_string()],
            attributes: AttributeSet::new(std::vec![AttributeSpec::new("name", "person name")]).unwrap(),
            instructions: std::option::Option::None,
            few_shots: std::vec![],
            parsing_mode: ParsingMode::ManagedIdp,
            model_params: ModelParams::new("anthropic.claude-3-7-sonnet-20250219-v1:0", 0.0),
            chunk_size: std::option::Option::None,
            parallel_chunks: std::option::Option::None,
        };
        let err = UnconfiguredManagedIdp.run("originals/a.pdf", &request).await.unwrap_err();
        assert_eq!(err.kind(), idp_core::ErrorKind::ParsingStageFailed);
    }
}
