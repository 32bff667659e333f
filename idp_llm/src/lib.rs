//! idp_llm - adaptive-retry wrapper around a chat-style multimodal LLM.
//!
//! The rest of the workspace talks to [`ports::LlmClientPort`]; this crate's
//! only concrete adapter (`adapters::bedrock`) is the single place that knows
//! about AWS Bedrock's Converse API. Swapping providers means writing one
//! more adapter, not touching `idp_extract` or `idp_orchestrator`.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial crate: message model, retry policy,
//!   port, Bedrock adapter.

pub mod adapters;
pub mod message;
pub mod ports;
pub mod retry;

pub use message::{Content, ContentBlock, ImageFormat, InferenceConfig, Message, ModelExtras, Role};
pub use ports::LlmClientPort;
pub use retry::RetryPolicy;

/// Returns the crate semantic version at compile time.
pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
