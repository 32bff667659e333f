//! Prompt assembly: base template + few-shots + instructions + attributes.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial prompt composer, implementing the
//!   sentinel split / few-shot insertion / variable substitution pipeline.

pub mod adapters;
pub mod ports;

use idp_core::domain::{AttributeSpec, AttributeType, FewShotExample};

/// The literal line the user template is split on. Few-shot blocks are
/// inserted immediately before it; the numbered attribute list is
/// substituted into the `{attributes}` placeholder that follows it.
pub const SENTINEL: &str = "Attributes to be extracted:";

/// Marker line substituted with an instructions block, or removed entirely
/// when the caller supplied no document-level instructions.
pub const INSTRUCTIONS_MARKER: &str = "<document_level_instructions_placeholder>";

/// A composed prompt: the final template text plus the set of `{name}`
/// variables still awaiting substitution via [`fill`].
#[derive(Debug, Clone)]
pub struct ComposedPrompt {
    pub template: std::string::String,
    pub variables: std::vec::Vec<std::string::String>,
}

/// Assembles the final user-prompt template from the base template, the
/// attribute list, any few-shot examples, and optional instructions.
///
/// Multimodal few-shots are skipped here: the image extractor materializes
/// them directly as message pairs (`§4.7`), so the composer only renders
/// `Textual` examples into the text template.
pub fn build(
    user_template: &str,
    specs: &[AttributeSpec],
    few_shots: &[FewShotExample],
    instructions: std::option::Option<&str>,
) -> std::result::Result<ComposedPrompt, idp_core::IdpError> {
    let (header, tail) = split_at_sentinel(user_template)?;

    let mut variables = std::vec::Vec::new();
    variables.push("attributes".to_string());

    let mut few_shot_blocks = std::string::String::new();
    let mut textual_index = 0usize;
    for few_shot in few_shots {
        if let FewShotExample::Textual { .. } = few_shot {
            let input_var = std::format!("few_shot_input_{textual_index}");
            let output_var = std::format!("few_shot_output_{textual_index}");
            few_shot_blocks.push_str(&std::format!(
                "Example {}:\nInput:\n{{{input_var}}}\nExpected output:\n{{{output_var}}}\n\n",
                textual_index + 1
            ));
            variables.push(input_var);
            variables.push(output_var);
            textual_index += 1;
        }
    }

    let mut template = std::format!("{header}{few_shot_blocks}{tail}");

    template = if let std::option::Option::Some(text) = instructions.filter(|s| !s.trim().is_empty()) {
        variables.push("instructions".to_string());
        template.replace(
            INSTRUCTIONS_MARKER,
            &std::format!("\nAdditional instructions:\n{{instructions}}\n"),
        )
    } else {
        template
            .lines()
            .filter(|line| !line.contains(INSTRUCTIONS_MARKER))
            .collect::<std::vec::Vec<_>>()
            .join("\n")
    };

    variables.push("document".to_string());

    let attributes_rendered = render_attributes(specs);
    let mut filled_vars = std::collections::HashMap::new();
    filled_vars.insert("attributes".to_string(), attributes_rendered);
    if let std::option::Option::Some(text) = instructions.filter(|s| !s.trim().is_empty()) {
        filled_vars.insert("instructions".to_string(), text.to_string());
    }
    template = substitute(&template, &filled_vars);

    std::result::Result::Ok(ComposedPrompt { template, variables })
}

/// Substitutes `{placeholder}` variables from `values`. Placeholders with no
/// entry in `values` (`{document}`, per-example few-shot placeholders) are
/// left untouched for [`fill`] to substitute in a later, per-document pass.
fn substitute(
    template: &str,
    values: &std::collections::HashMap<std::string::String, std::string::String>,
) -> std::string::String {
    let mut result = template.to_string();
    for (key, value) in values {
        result = result.replace(&std::format!("{{{key}}}"), value);
    }
    result
}

fn split_at_sentinel(template: &str) -> std::result::Result<(std::string::String, std::string::String), idp_core::IdpError> {
    match template.find(SENTINEL) {
        std::option::Option::Some(index) => {
            std::result::Result::Ok((template[..index].to_string(), template[index..].to_string()))
        }
        std::option::Option::None => std::result::Result::Err(idp_core::IdpError::ParsingStageFailed(
            std::format!("user template is missing the sentinel line {SENTINEL:?}"),
        )),
    }
}

/// Renders attribute specs as a numbered list, including the type
/// constraint when it is not `auto`.
fn render_attributes(specs: &[AttributeSpec]) -> std::string::String {
    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| match spec.r#type {
            AttributeType::Auto => std::format!("{}. {}: {}", i + 1, spec.name, spec.description),
            other => std::format!("{}. {}: {} (type: {other})", i + 1, spec.name, spec.description),
        })
        .collect::<std::vec::Vec<_>>()
        .join("\n")
}

/// Fills `{document}`-style per-document variables into an already-composed
/// template. Few-shot input/output variables are JSON-stringified with a
/// 4-space indent for readability in-prompt.
pub fn fill(
    template: &str,
    document: &str,
    few_shot_values: &[(serde_json::Value, serde_json::Value)],
) -> std::string::String {
    let mut result = template.replace("{document}", document);
    for (index, (input, output)) in few_shot_values.iter().enumerate() {
        let input_json = serde_json::to_string_pretty(input).unwrap_or_default();
        let output_json = serde_json::to_string_pretty(output).unwrap_or_default();
        result = result
            .replace(&std::format!("{{few_shot_input_{index}}}"), &input_json)
            .replace(&std::format!("{{few_shot_output_{index}}}"), &output_json);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_template() -> &'static str {
        "Intro text.\n\nAttributes to be extracted:\n{attributes}\n<document_level_instructions_placeholder>\n\nDocument:\n{document}\n"
    }

    #[test]
    fn test_build_without_instructions_removes_marker_line() {
        let specs = std::vec![AttributeSpec::new("name", "person name")];
        let composed = build(base_template(), &specs, &[], std::option::Option::None).unwrap();
        assert!(!composed.template.contains(INSTRUCTIONS_MARKER));
    }

    #[test]
    fn test_build_with_instructions_substitutes_block() {
        let specs = std::vec![AttributeSpec::new("name", "person name")];
        let composed = build(base_template(), &specs, &[], std::option::Option::Some("Be concise.")).unwrap();
        assert!(composed.variables.contains(&"instructions".to_string()));
        let filled = fill(&composed.template, "Hello.", &[]);
        assert!(filled.contains("Be concise."));
    }

    #[test]
    fn test_build_inserts_textual_few_shot_block_before_attributes() {
        let specs = std::vec![AttributeSpec::new("name", "person name")];
        let mut output = serde_json::Map::new();
        output.insert("name".to_string(), serde_json::json!("Alice"));
        let few_shots = std::vec![FewShotExample::Textual {
            input: serde_json::json!("Hi, I'm Alice."),
            output,
        }];
        let composed = build(base_template(), &specs, &few_shots, std::option::Option::None).unwrap();
        let example_pos = composed.template.find("Example 1:").unwrap();
        let sentinel_pos = composed.template.find(SENTINEL).unwrap();
        assert!(example_pos < sentinel_pos);
    }

    #[test]
    fn test_build_fails_without_sentinel() {
        let specs = std::vec![AttributeSpec::new("name", "person name")];
        let result = build("no sentinel here", &specs, &[], std::option::Option::None);
        assert!(result.is_err());
    }

    #[test]
    fn test_render_attributes_includes_type_constraint() {
        let specs = std::vec![AttributeSpec::new("total", "invoice total").with_type(AttributeType::Number)];
        let rendered = render_attributes(&specs);
        assert!(rendered.contains("(type: number)"));
    }
}
