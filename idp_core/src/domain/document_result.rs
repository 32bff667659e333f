//! Per-document and per-batch result envelopes.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial DocumentResult/BatchResult, enforcing
//!   the "exactly one of answer+raw_answer or error" invariant at construction.

use crate::error::ErrorInfo;

/// Outcome of processing one document.
///
/// Exactly one of `{answer, raw_answer}` or `error` is populated; use
/// [`DocumentResult::success`] or [`DocumentResult::failure`] to construct a
/// value that upholds this invariant rather than setting fields directly.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentResult {
    pub file_key: String,
    pub original_file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks_processed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl DocumentResult {
    /// Builds a successful result. `answer` may legitimately be an empty
    /// object (the parser's graceful-degradation path); `raw_answer` is
    /// always preserved verbatim for auditability.
    pub fn success(
        file_key: impl Into<String>,
        original_file_name: impl Into<String>,
        answer: serde_json::Map<String, serde_json::Value>,
        raw_answer: impl Into<String>,
        chunks_processed: Option<u32>,
    ) -> Self {
        Self {
            file_key: file_key.into(),
            original_file_name: original_file_name.into(),
            answer: Some(answer),
            raw_answer: Some(raw_answer.into()),
            chunks_processed,
            error: None,
        }
    }

    /// Builds a failed result. No `answer`/`raw_answer` is attached.
    pub fn failure(
        file_key: impl Into<String>,
        original_file_name: impl Into<String>,
        error: ErrorInfo,
    ) -> Self {
        Self {
            file_key: file_key.into(),
            original_file_name: original_file_name.into(),
            answer: None,
            raw_answer: None,
            chunks_processed: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The output key this result must be persisted under:
    /// `attributes/<stem>.json`, where `<stem>` is `file_key` without a
    /// leading path segment and without its `.txt`/original extension.
    pub fn output_key(&self) -> String {
        crate::domain::output_key_for(&self.file_key)
    }
}

/// Ordered outcome of a batch, one entry per input document, same order.
pub type BatchResult = std::vec::Vec<DocumentResult>;
