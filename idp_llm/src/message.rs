//! The provider-agnostic message model consumed by [`crate::ports::LlmClientPort`].
//!
//! Mirrors the wire shape of AWS Bedrock's Converse API (`§6.4` of the
//! extraction interface) without depending on the SDK's own types, so the
//! composer and extractors never import `aws-sdk-bedrockruntime`.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial message/content-block model.

/// Who sent a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// Raster image format carried by an [`ContentBlock::Image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// One typed block of message content.
///
/// No base64 encoding happens at this layer: an `Image` block carries raw
/// bytes plus a format tag, and the Bedrock adapter is the only place that
/// knows the wire encoding a provider expects.
#[derive(Debug, Clone)]
pub enum ContentBlock {
    Text(std::string::String),
    Image {
        format: ImageFormat,
        bytes: std::vec::Vec<u8>,
    },
}

/// Ordered content blocks attached to one message.
pub type Content = std::vec::Vec<ContentBlock>;

/// One turn in the conversation sent to [`crate::ports::LlmClientPort::converse`].
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: Content,
}

impl Message {
    pub fn user(content: Content) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }

    pub fn assistant(content: Content) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    pub fn user_text(text: impl Into<std::string::String>) -> Self {
        Self::user(std::vec![ContentBlock::Text(text.into())])
    }
}

/// Universal inference-config fields, named the same across every provider
/// family this client might eventually support.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub temperature: f32,
    pub top_p: std::option::Option<f32>,
    pub stop_sequences: std::vec::Vec<std::string::String>,
    pub max_tokens: u32,
}

impl InferenceConfig {
    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            top_p: std::option::Option::None,
            stop_sequences: std::vec::Vec::new(),
            max_tokens,
        }
    }
}

/// Provider-family-specific knobs that don't fit the universal inference
/// config, set conditionally by inspecting the model identifier (`§4.4`).
#[derive(Debug, Clone, Default)]
pub struct ModelExtras {
    pub top_k: std::option::Option<u32>,
    pub thinking_budget_tokens: std::option::Option<u32>,
}

impl ModelExtras {
    pub fn is_empty(&self) -> bool {
        self.top_k.is_none() && self.thinking_budget_tokens.is_none()
    }
}
