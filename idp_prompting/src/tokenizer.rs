//! Token counting and middle-out truncation.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial tokenizer/truncator, using a single BPE
//!   encoding as a cross-vendor approximation (see `count`).

static TRUNCATION_MARKER: &str = "\n...\n";

/// Known context window sizes, keyed by a model-family prefix (the model
/// identifier with any leading region prefix already stripped). Unknown
/// families fall back to [`DEFAULT_MAX_INPUT_TOKENS`].
const FAMILY_CONTEXT_WINDOWS: &[(&str, usize)] = &[
    ("anthropic.claude-3-7", 200_000),
    ("anthropic.claude-3-5", 200_000),
    ("anthropic.claude-3", 200_000),
    ("anthropic.claude-v2", 100_000),
    ("amazon.titan", 32_000),
    ("amazon.nova-pro", 300_000),
    ("amazon.nova-lite", 300_000),
    ("amazon.nova-micro", 128_000),
    ("meta.llama3", 128_000),
    ("mistral.mistral-large", 128_000),
    ("cohere.command-r", 128_000),
];

const DEFAULT_MAX_INPUT_TOKENS: usize = 100_000;

/// Counts tokens in `text` using a single BPE encoding shared across vendors.
///
/// Providers differ in their exact tokenizer; lacking a native binding for
/// every vendor, this counts with a generic encoding and treats the result as
/// a conservative estimate rather than an exact figure. `model_id` is
/// accepted for API symmetry with [`max_input_tokens`] and to leave room for
/// a future vendor-specific binding.
pub fn count(text: &str, _model_id: &str) -> usize {
    let bpe = tiktoken_rs::cl100k_base().expect("cl100k_base encoding is built in");
    bpe.encode_ordinary(text).len()
}

/// Looks up the context window for a model identifier, stripping any leading
/// region/inference-profile prefix (`us.`, `eu.`, ...) before matching.
pub fn max_input_tokens(model_id: &str) -> usize {
    let family = idp_core::domain::model_params::strip_region_prefix(model_id);
    FAMILY_CONTEXT_WINDOWS
        .iter()
        .find(|(prefix, _)| family.starts_with(prefix))
        .map(|(_, window)| *window)
        .unwrap_or(DEFAULT_MAX_INPUT_TOKENS)
}

/// Removes a central span of `text` so that `count(result, model_id) +
/// prompt_overhead_tokens <= budget`. Never touches the first or last word,
/// preserving document openings and closings.
///
/// Idempotent: if `text` already fits, it is returned unchanged.
///
/// # Examples
///
/// ```
/// let doc = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
/// let truncated = idp_prompting::tokenizer::truncate(doc, 0, 1_000_000, "anthropic.claude-3-7-sonnet");
/// assert_eq!(truncated, doc);
/// ```
pub fn truncate(text: &str, prompt_overhead_tokens: usize, budget: usize, model_id: &str) -> String {
    if prompt_overhead_tokens >= budget {
        return std::string::String::new();
    }
    let remaining_budget = budget - prompt_overhead_tokens;
    if count(text, model_id) <= remaining_budget {
        return text.to_string();
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 3 {
        return text.to_string();
    }

    let mid = words.len() / 2;
    let base_half_span = ((words.len() as f64) * 0.1).max(1.0);

    let mut multiplier = 1.0_f64;
    while multiplier <= 5.0 {
        let half_span = ((base_half_span * multiplier) as usize).max(1);
        let start = mid.saturating_sub(half_span).max(1);
        let end = (mid + half_span).min(words.len() - 1);
        if start < end {
            let head = words[..start].join(" ");
            let tail = words[end..].join(" ");
            let candidate = std::format!("{head}{TRUNCATION_MARKER}{tail}");
            if count(&candidate, model_id) <= remaining_budget {
                return candidate;
            }
        }
        multiplier += 0.1;
    }

    // Exhausted the multiplier range; fall back to the narrowest head/tail
    // retention that still leaves at least one word on each side.
    let head = words[..1].join(" ");
    let tail = words[words.len() - 1..].join(" ");
    std::format!("{head}{TRUNCATION_MARKER}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "anthropic.claude-3-7-sonnet-20250219-v1:0";

    #[test]
    fn test_max_input_tokens_known_family() {
        assert_eq!(max_input_tokens("anthropic.claude-3-7-sonnet-20250219-v1:0"), 200_000);
    }

    #[test]
    fn test_max_input_tokens_strips_region_prefix() {
        assert_eq!(
            max_input_tokens("us.anthropic.claude-3-7-sonnet-20250219-v1:0"),
            200_000
        );
    }

    #[test]
    fn test_max_input_tokens_unknown_family_falls_back() {
        assert_eq!(max_input_tokens("some-vendor.unknown-model"), DEFAULT_MAX_INPUT_TOKENS);
    }

    #[test]
    fn test_max_input_tokens_meta_llama3_not_mistaken_for_region() {
        assert_eq!(max_input_tokens("meta.llama3-70b-instruct-v1:0"), 128_000);
    }

    #[test]
    fn test_truncate_is_idempotent_when_already_fits() {
        let doc = "alpha beta gamma delta";
        let result = truncate(doc, 0, 1_000_000, MODEL);
        assert_eq!(result, doc);
    }

    #[test]
    fn test_truncate_preserves_head_and_tail() {
        let words: Vec<String> = (0..50_000).map(|i| std::format!("word{i}")).collect();
        let doc = words.join(" ");
        let truncated = truncate(&doc, 0, 100, MODEL);
        assert!(truncated.starts_with("word0"));
        assert!(truncated.ends_with("word49999"));
        assert!(truncated.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncate_respects_budget() {
        let words: Vec<String> = (0..20_000).map(|i| std::format!("word{i}")).collect();
        let doc = words.join(" ");
        let budget = 500;
        let truncated = truncate(&doc, 0, budget, MODEL);
        assert!(count(&truncated, MODEL) <= budget);
    }
}
