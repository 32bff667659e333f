//! Per-request sampling configuration passed through to the LLM client.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial ModelParams, mirroring the inbound
//!   `model_params` object of the extraction request contract.

/// Sampling and model-selection parameters supplied by the caller.
///
/// `top_p`/`top_k`/`thinking_budget` are optional because not every model
/// family honors them; the LLM client decides, per model identifier, which
/// of these become provider-native inference-config fields versus
/// vendor-extras (see `idp_llm::RetryPolicy` and the Bedrock adapter).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
pub struct ModelParams {
    pub model_id: String,
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_budget: Option<u32>,
}

fn default_max_output_tokens() -> u32 {
    4096
}

impl ModelParams {
    pub fn new(model_id: impl Into<String>, temperature: f32) -> Self {
        Self {
            model_id: model_id.into(),
            temperature,
            max_output_tokens: default_max_output_tokens(),
            top_p: None,
            top_k: None,
            thinking_budget: None,
        }
    }

    /// Whether the caller asked for extended reasoning. A zero or absent
    /// budget means the thinking feature is off.
    pub fn wants_thinking(&self) -> bool {
        self.thinking_budget.is_some_and(|budget| budget > 0)
    }

    /// Strips a leading cross-region inference-profile prefix (`us.`, `eu.`,
    /// `apac.`, ...) from the model identifier, matching the convention used
    /// to look up tokenizer/context-window metadata by model family.
    pub fn model_family(&self) -> &str {
        strip_region_prefix(&self.model_id)
    }
}

/// Cross-region inference-profile prefixes Bedrock recognizes. A vendor
/// segment (`anthropic`, `meta`, `amazon`, ...) never appears here, so a
/// short, lowercase vendor name like `meta` is never mistaken for a region.
const KNOWN_REGION_PREFIXES: &[&str] = &["us", "eu", "apac", "us-gov"];

/// Strips a single leading `<region>.` segment from a model identifier, if
/// the segment is one of [`KNOWN_REGION_PREFIXES`] rather than a vendor name.
pub fn strip_region_prefix(model_id: &str) -> &str {
    if let Some((prefix, rest)) = model_id.split_once('.') {
        if KNOWN_REGION_PREFIXES.contains(&prefix) {
            return rest;
        }
    }
    model_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_max_output_tokens() {
        let params = ModelParams::new("anthropic.claude-3-7-sonnet-20250219-v1:0", 0.0);
        assert_eq!(params.max_output_tokens, 4096);
    }

    #[test]
    fn test_strip_region_prefix() {
        assert_eq!(
            strip_region_prefix("us.anthropic.claude-3-7-sonnet-20250219-v1:0"),
            "anthropic.claude-3-7-sonnet-20250219-v1:0"
        );
        assert_eq!(
            strip_region_prefix("anthropic.claude-3-7-sonnet-20250219-v1:0"),
            "anthropic.claude-3-7-sonnet-20250219-v1:0"
        );
    }

    #[test]
    fn test_strip_region_prefix_does_not_eat_short_vendor_names() {
        assert_eq!(
            strip_region_prefix("meta.llama3-70b-instruct-v1:0"),
            "meta.llama3-70b-instruct-v1:0"
        );
    }

    #[test]
    fn test_wants_thinking() {
        let mut params = ModelParams::new("anthropic.claude-3-7-sonnet-20250219-v1:0", 1.0);
        assert!(!params.wants_thinking());
        params.thinking_budget = Some(1024);
        assert!(params.wants_thinking());
        params.thinking_budget = Some(0);
        assert!(!params.wants_thinking());
    }
}
