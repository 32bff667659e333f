//! Small helpers shared between the text and image extractors.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial textual_few_shot_values/basename.

use idp_core::domain::FewShotExample;

/// Extracts `(input, output)` pairs for the `Textual` few-shot examples, in
/// the same order the prompt composer numbered them — `Multimodal` examples
/// are skipped here; the image extractor materializes those as message
/// pairs instead (`§4.7`).
pub fn textual_few_shot_values(few_shots: &[FewShotExample]) -> std::vec::Vec<(serde_json::Value, serde_json::Value)> {
    few_shots
        .iter()
        .filter_map(|example| match example {
            FewShotExample::Textual { input, output } => {
                std::option::Option::Some((input.clone(), serde_json::Value::Object(output.clone())))
            }
            FewShotExample::Multimodal { .. } => std::option::Option::None,
        })
        .collect()
}

pub fn basename(reference: &str) -> &str {
    reference.rsplit(['/', '\\']).next().unwrap_or(reference)
}
