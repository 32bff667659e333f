//! Ports for the two external collaborators the orchestrator hands
//! `OCR_THEN_TEXT_LLM` and `MANAGED_IDP` documents off to.
//!
//! Both services are explicitly out of scope for this repository (`§1`):
//! only the hand-off contract each parsing mode depends on is specified
//! here. A production deployment wires a real Textract/Bedrock Data
//! Automation adapter behind these traits; `adapters::unconfigured` is the
//! default used when no such adapter has been wired.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial OcrPort/ManagedIdpPort.

/// Normalizes one document into plain text, persisted under
/// `processed/<name>.txt`, and returns that key (`§4.8` point 1, second
/// bullet). The concrete adapter speaks to an OCR service such as Amazon
/// Textract.
#[async_trait::async_trait]
pub trait OcrPort: std::marker::Send + std::marker::Sync {
    async fn run(&self, input_key: &str) -> std::result::Result<std::string::String, idp_core::IdpError>;
}

/// The managed-IDP service's answer, already shaped for the orchestrator to
/// adapt into a `DocumentResult` (`§4.8` point 1, fourth bullet).
#[derive(Debug, Clone)]
pub struct ManagedIdpOutcome {
    pub inference_result: serde_json::Map<std::string::String, serde_json::Value>,
}

/// Delegates an entire document's extraction to a fully-managed service
/// (e.g. Bedrock Data Automation). Only the hand-off contract is
/// implemented here: the service owns its own parsing, chunking, and model
/// invocation internally.
#[async_trait::async_trait]
pub trait ManagedIdpPort: std::marker::Send + std::marker::Sync {
    async fn run(
        &self,
        input_key: &str,
        request: &idp_core::domain::ExtractionRequest,
    ) -> std::result::Result<ManagedIdpOutcome, idp_core::IdpError>;
}
