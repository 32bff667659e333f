//! Error vocabulary shared across the extraction pipeline.
//!
//! `IdpError` is the typed error produced by pure components (tokenizer, prompt
//! composer, response parser, LLM client, artifact store). Component boundaries
//! (the text/image extractors, the orchestrator) catch `IdpError` and convert it
//! into an `ErrorInfo` attached to a `DocumentResult` rather than letting it
//! propagate past a single document's processing.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial error vocabulary, derived from the
//!   domain-level error kinds enumerated in the extraction specification.

/// Domain-level error kind, stable across languages and transport encodings.
///
/// These map 1:1 onto the per-document error taxonomy: every error that can
/// reach a `DocumentResult` boundary carries one of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ErrorKind {
    /// Missing required fields, unknown parsing_mode, or an attribute with an
    /// empty name/description. Detected before fan-out.
    MalformedRequest,
    /// The input reference could not be resolved to bytes in the artifact store.
    ArtifactUnavailable,
    /// The file extension is not accepted by the chosen parsing mode.
    UnsupportedFormat,
    /// An upstream OCR/office-conversion/managed-IDP stage failed.
    ParsingStageFailed,
    /// The LLM client's retry budget was exhausted while throttled.
    LlmThrottled,
    /// The LLM client failed for a reason other than throttling.
    LlmInvocationFailed,
    /// The response parser yielded an empty object despite non-empty text.
    /// Not a hard failure: the document still carries `answer = {}` plus the
    /// preserved `raw_answer`, this kind exists for instrumentation only.
    ResponseUnparseable,
    /// The provider returned more than one text-bearing content block after
    /// filtering reasoning blocks.
    MultipleTextBlocks,
    /// The per-document processing deadline was exceeded.
    InternalTimeout,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Error payload attached to a failed `DocumentResult`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Typed error produced by the pure/leaf components of the pipeline.
///
/// Every variant carries enough context to be converted into an `ErrorInfo`
/// via [`IdpError::kind`] at a component boundary.
#[derive(Debug, thiserror::Error)]
pub enum IdpError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("artifact unavailable: {0}")]
    ArtifactUnavailable(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("parsing stage failed: {0}")]
    ParsingStageFailed(String),

    #[error("LLM throttled past retry budget: {0}")]
    LlmThrottled(String),

    #[error("LLM invocation failed: {0}")]
    LlmInvocationFailed(String),

    #[error("multiple text blocks in provider response")]
    MultipleTextBlocks,

    #[error("per-document deadline exceeded: {0}")]
    InternalTimeout(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl IdpError {
    /// Maps this error onto the stable `ErrorKind` vocabulary for persistence
    /// in a `DocumentResult`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdpError::MalformedRequest(_) => ErrorKind::MalformedRequest,
            IdpError::ArtifactUnavailable(_) => ErrorKind::ArtifactUnavailable,
            IdpError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            IdpError::ParsingStageFailed(_) => ErrorKind::ParsingStageFailed,
            IdpError::LlmThrottled(_) => ErrorKind::LlmThrottled,
            IdpError::LlmInvocationFailed(_) => ErrorKind::LlmInvocationFailed,
            IdpError::MultipleTextBlocks => ErrorKind::MultipleTextBlocks,
            IdpError::InternalTimeout(_) => ErrorKind::InternalTimeout,
            IdpError::Io(_) | IdpError::Json(_) => ErrorKind::LlmInvocationFailed,
        }
    }

    /// Converts this error into a persistable `ErrorInfo`.
    pub fn into_error_info(self) -> ErrorInfo {
        ErrorInfo::new(self.kind(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping_is_stable() {
        let err = IdpError::LlmThrottled("exhausted after 5 attempts".to_string());
        assert_eq!(err.kind(), ErrorKind::LlmThrottled);
    }

    #[test]
    fn test_error_info_display() {
        let info = ErrorInfo::new(ErrorKind::ArtifactUnavailable, "no such key".to_string());
        assert_eq!(info.to_string(), "ArtifactUnavailable: no such key");
    }
}
