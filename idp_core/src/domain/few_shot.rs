//! Few-shot priming examples, textual or multimodal.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial FewShotExample with the two disjoint
//!   shapes described by the extraction request contract.

/// A single few-shot example, in one of two disjoint shapes.
///
/// `Textual` examples are inlined into the prompt text by the prompt composer.
/// `Multimodal` examples reference artifacts (documents + a marking file) that
/// the image extractor resolves and turns into a synthetic user/assistant
/// message pair prepended to every chunk.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum FewShotExample {
    Textual {
        input: serde_json::Value,
        output: serde_json::Map<String, serde_json::Value>,
    },
    Multimodal {
        /// Ordered artifact references, at least one.
        documents: Vec<String>,
        /// Artifact reference to a JSON file associating each document with
        /// its expected output (a single object, or a list indexed by
        /// filename match against `documents`).
        markings: String,
    },
}

impl FewShotExample {
    pub fn is_multimodal(&self) -> bool {
        matches!(self, FewShotExample::Multimodal { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textual_round_trip() {
        let mut output = serde_json::Map::new();
        output.insert("name".to_string(), serde_json::json!("Alice"));
        let example = FewShotExample::Textual {
            input: serde_json::json!("Hello, my name is Alice."),
            output,
        };
        let json = serde_json::to_string(&example).unwrap();
        let back: FewShotExample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, example);
        assert!(!back.is_multimodal());
    }

    #[test]
    fn test_multimodal_round_trip() {
        let example = FewShotExample::Multimodal {
            documents: std::vec!["few_shots/a.pdf".to_string()],
            markings: "few_shots/markings.json".to_string(),
        };
        assert!(example.is_multimodal());
    }
}
