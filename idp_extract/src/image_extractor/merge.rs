//! Deterministic fold-left merge of per-chunk parsed answers.
//!
//! Grounded on `combine_json_responses` in `helpers.py`. Folding always
//! proceeds in page (source) order, never completion order, so the merged
//! document answer is identical whether chunks ran in parallel or
//! sequentially (`§5` ordering guarantee #2, `§8` invariant #4).
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial merge implementation + key-promotion
//!   rules.

/// Folds `chunks` (already in page order) into one object, per key:
/// - absent in the accumulator → assign
/// - both arrays → concatenate
/// - both scalars → promote to a 2-element array `[acc, new]`
/// - accumulator array, new scalar → append
/// - accumulator scalar, new array → prepend into a new array
///
/// Non-object inputs (an empty map from a failed chunk parse) simply
/// contribute no keys.
pub fn merge_chunks(
    chunks: &[serde_json::Map<std::string::String, serde_json::Value>],
) -> serde_json::Map<std::string::String, serde_json::Value> {
    let mut acc = serde_json::Map::new();
    for chunk in chunks {
        merge_into(&mut acc, chunk);
    }
    acc
}

fn merge_into(
    acc: &mut serde_json::Map<std::string::String, serde_json::Value>,
    chunk: &serde_json::Map<std::string::String, serde_json::Value>,
) {
    for (key, new_value) in chunk {
        match acc.get(key) {
            std::option::Option::None => {
                acc.insert(key.clone(), new_value.clone());
            }
            std::option::Option::Some(existing) => {
                let merged = match (existing, new_value) {
                    (serde_json::Value::Array(existing_arr), serde_json::Value::Array(new_arr)) => {
                        let mut combined = existing_arr.clone();
                        combined.extend(new_arr.clone());
                        serde_json::Value::Array(combined)
                    }
                    (serde_json::Value::Array(existing_arr), scalar) => {
                        let mut combined = existing_arr.clone();
                        combined.push(scalar.clone());
                        serde_json::Value::Array(combined)
                    }
                    (scalar, serde_json::Value::Array(new_arr)) => {
                        let mut combined = std::vec![scalar.clone()];
                        combined.extend(new_arr.clone());
                        serde_json::Value::Array(combined)
                    }
                    (existing_scalar, new_scalar) => {
                        serde_json::Value::Array(std::vec![existing_scalar.clone(), new_scalar.clone()])
                    }
                };
                acc.insert(key.clone(), merged);
            }
        }
    }
}

/// Joins raw per-chunk responses with a `CHUNK i:\n` header separator, 1-based.
pub fn join_raw_answers(raw_answers: &[std::string::String]) -> std::string::String {
    if raw_answers.len() == 1 {
        return raw_answers[0].clone();
    }
    raw_answers
        .iter()
        .enumerate()
        .map(|(i, raw)| std::format!("CHUNK {}:\n{raw}", i + 1))
        .collect::<std::vec::Vec<_>>()
        .join("\n\n")
}
