//! The extraction strategy selected per document.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial parsing mode enum, four variants matching
//!   the inbound request contract's `parsing_mode` field.

/// Selects which pipeline a document travels through.
///
/// `TextLlm` and `ImageLlm` are implemented in-process (`idp_extract`).
/// `OcrThenTextLlm` and `ManagedIdp` delegate the first stage to an external
/// collaborator (OCR service, managed IDP service) reached through a port;
/// only the hand-off contract is implemented here, not those services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParsingMode {
    TextLlm,
    ImageLlm,
    OcrThenTextLlm,
    ManagedIdp,
}

impl ParsingMode {
    /// Whether this mode rasterizes pages to images rather than extracting text.
    pub fn is_image_based(self) -> bool {
        matches!(self, ParsingMode::ImageLlm)
    }

    /// Whether this mode's first stage is an external collaborator rather than
    /// an in-process extractor.
    pub fn delegates_to_collaborator(self) -> bool {
        matches!(self, ParsingMode::OcrThenTextLlm | ParsingMode::ManagedIdp)
    }
}

impl std::fmt::Display for ParsingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ParsingMode::TextLlm => "TEXT_LLM",
            ParsingMode::ImageLlm => "IMAGE_LLM",
            ParsingMode::OcrThenTextLlm => "OCR_THEN_TEXT_LLM",
            ParsingMode::ManagedIdp => "MANAGED_IDP",
        };
        f.write_str(s)
    }
}
