//! Port for invoking a chat-style LLM.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial LlmClientPort, one `converse` method
//!   matching §4.4 of the extraction interface.

use crate::message::{InferenceConfig, Message, ModelExtras};

/// Abstracts one chat-style invocation of a (possibly multimodal) LLM.
///
/// Implementations own retrying on throttling (`RetryPolicy`), selecting the
/// first text-bearing content block out of the response, and translating
/// provider-specific errors into `idp_core::IdpError`. Callers never see a
/// raw provider SDK error.
#[async_trait::async_trait]
pub trait LlmClientPort: std::marker::Send + std::marker::Sync {
    async fn converse(
        &self,
        model_id: &str,
        system_prompt: &str,
        messages: &[Message],
        inference_cfg: &InferenceConfig,
        extras: &ModelExtras,
    ) -> std::result::Result<std::string::String, idp_core::IdpError>;
}
