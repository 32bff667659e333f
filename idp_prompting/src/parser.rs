//! Lenient extraction of a structured answer from free-form model text.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial response parser, reproducing the
//!   effect of a permissive literal evaluator (single quotes, trailing
//!   commas) without depending on a Python-literal parser.

static JSON_TAG_RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
static BLANK_RUN_RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();

fn json_tag_re() -> &'static regex::Regex {
    JSON_TAG_RE.get_or_init(|| {
        regex::Regex::new(r"(?s)<json>(.*?)</json>").expect("static pattern is valid")
    })
}

fn blank_run_re() -> &'static regex::Regex {
    BLANK_RUN_RE.get_or_init(|| regex::Regex::new(r"\n\s*\n+").expect("static pattern is valid"))
}

/// Parses a structured answer out of `raw`, tolerating the ways LLMs deviate
/// from strict JSON. Returns an empty object on unrecoverable failure; the
/// caller is responsible for retaining `raw` as `raw_answer` regardless of
/// outcome.
///
/// Recovery rules, applied in order:
/// 1. Extract the inner content of a `<json>...</json>` pair if present, else
///    trim the whole text.
/// 2. Collapse runs of two-or-more blank lines into a comma.
/// 3. Prepend `{` / append `}` if the text starts/ends with neither bracket.
/// 4. Collapse one level of doubled braces (`{{` / `}}`).
/// 5. Parse with a permissive literal reader that accepts single-quoted
///    strings and trailing commas.
pub fn parse_answer(raw: &str) -> serde_json::Map<String, serde_json::Value> {
    let extracted = extract_json_tag(raw);
    let collapsed = blank_run_re().replace_all(&extracted, ",").into_owned();
    let bracketed = wrap_with_brackets(collapsed.trim());
    let unescaped = collapse_doubled_braces(&bracketed);

    match crate::lenient_json::parse(&unescaped) {
        std::option::Option::Some(serde_json::Value::Object(map)) => map,
        std::option::Option::Some(serde_json::Value::Array(values)) => {
            let mut map = serde_json::Map::new();
            map.insert("items".to_string(), serde_json::Value::Array(values));
            map
        }
        _ => {
            tracing::debug!(raw_len = raw.len(), "response parser could not recover a structured answer");
            serde_json::Map::new()
        }
    }
}

fn extract_json_tag(raw: &str) -> String {
    match json_tag_re().captures(raw) {
        std::option::Option::Some(captures) => captures[1].to_string(),
        std::option::Option::None => raw.trim().to_string(),
    }
}

fn wrap_with_brackets(text: &str) -> String {
    let starts_ok = text.starts_with('{') || text.starts_with('[');
    let ends_ok = text.ends_with('}') || text.ends_with(']');
    let mut result = std::string::String::new();
    if !starts_ok {
        result.push('{');
    }
    result.push_str(text);
    if !ends_ok {
        result.push('}');
    }
    result
}

fn collapse_doubled_braces(text: &str) -> String {
    text.replacen("{{", "{", 1).replacen("}}", "}", 1)
}
