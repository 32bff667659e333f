//! Abstraction over where prompt templates come from.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial TemplateLoaderPort.

/// Loads the two templates the prompt composer assembles from.
///
/// A missing file, an empty file, or a missing sentinel line are all
/// configuration errors, fatal at process start rather than per-document
/// failures — this port surfaces them as `IdpError::ParsingStageFailed`
/// since they happen before any document-specific work begins.
pub trait TemplateLoaderPort: std::marker::Send + std::marker::Sync {
    fn load_system_prompt(&self) -> std::result::Result<std::string::String, idp_core::IdpError>;
    fn load_user_template(&self) -> std::result::Result<std::string::String, idp_core::IdpError>;
}
