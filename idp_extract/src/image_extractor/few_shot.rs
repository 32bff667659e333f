//! Materializes a multimodal few-shot example into a synthetic user/assistant
//! message pair prepended to every chunk's message list (`§4.7`).
//!
//! Grounded on `create_assistant_response`/`fill_assistant_response_template`
//! in `helpers.py`: the assistant turn is a `<thinking>` placeholder plus a
//! `<json>` block wrapping the marking's expected output, in the same shape
//! the response parser expects to recover from a real model reply.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial multimodal few-shot materialization.

use idp_core::IdpError;
use idp_llm::{ContentBlock, Message};

use super::rasterize::rasterize;

const ASSISTANT_THINKING: &str = "I was able to find all the requested attributes";

/// Downloads `example_documents` and `markings_ref`, rasterizes the
/// documents into page images, and returns the `(user, assistant)` message
/// pair to prepend to every chunk.
pub async fn build_few_shot_pair(
    example_documents: &[std::string::String],
    markings_ref: &str,
    store: &dyn idp_store::ArtifactStorePort,
) -> std::result::Result<(Message, Message), IdpError> {
    let mut pages = std::vec::Vec::new();
    let mut first_file_name: std::option::Option<std::string::String> = std::option::Option::None;

    for document_ref in example_documents {
        let key = store.resolve(document_ref).await?;
        let bytes = store.get(&key).await?;
        let file_name = basename(&key).to_string();
        if first_file_name.is_none() {
            first_file_name = std::option::Option::Some(file_name.clone());
        }
        pages.extend(rasterize(&file_name, &bytes)?);
    }

    let markings_key = store.resolve(markings_ref).await?;
    let markings_bytes = store.get(&markings_key).await?;
    let markings_value: serde_json::Value = serde_json::from_slice(&markings_bytes)
        .map_err(|err| IdpError::ParsingStageFailed(std::format!("marking JSON is not valid JSON: {err}")))?;
    let matched_file_name = first_file_name.unwrap_or_default();
    let output = select_marking_output(&markings_value, &matched_file_name)?;

    let content: std::vec::Vec<ContentBlock> = pages
        .into_iter()
        .map(|page| ContentBlock::Image {
            format: page.format,
            bytes: page.bytes,
        })
        .collect();
    let user = Message::user(content);

    let assistant_text = std::format!(
        "<thinking>\n{ASSISTANT_THINKING}\n</thinking>\n<json>\n{}\n</json>\n",
        serde_json::to_string_pretty(&output).unwrap_or_default()
    );
    let assistant = Message::assistant(std::vec![ContentBlock::Text(assistant_text)]);

    std::result::Result::Ok((user, assistant))
}

/// Resolves the marking's expected `output` object. `markings` is either a
/// single object (used directly, or via its own `output` field) or a list of
/// `{ file_name, output }` entries indexed by filename match against the
/// first document in the example. A list with no matching entry is fatal
/// for this extraction (`§4.7`).
fn select_marking_output(
    markings: &serde_json::Value,
    file_name: &str,
) -> std::result::Result<serde_json::Map<std::string::String, serde_json::Value>, IdpError> {
    match markings {
        serde_json::Value::Object(map) => match map.get("output") {
            std::option::Option::Some(serde_json::Value::Object(output)) => std::result::Result::Ok(output.clone()),
            _ => std::result::Result::Ok(map.clone()),
        },
        serde_json::Value::Array(items) => items
            .iter()
            .find_map(|item| match item {
                serde_json::Value::Object(entry) if entry.get("file_name").and_then(serde_json::Value::as_str) == std::option::Option::Some(file_name) => {
                    match entry.get("output") {
                        std::option::Option::Some(serde_json::Value::Object(output)) => std::option::Option::Some(output.clone()),
                        _ => std::option::Option::None,
                    }
                }
                _ => std::option::Option::None,
            })
            .ok_or_else(|| {
                IdpError::ParsingStageFailed(std::format!(
                    "no marking entry found for file name {file_name:?} in markings list"
                ))
            }),
        _ => std::result::Result::Err(IdpError::ParsingStageFailed(
            "markings JSON must be an object or a list of entries".to_string(),
        )),
    }
}

fn basename(key: &str) -> &str {
    key.rsplit(['/', '\\']).next().unwrap_or(key)
}
