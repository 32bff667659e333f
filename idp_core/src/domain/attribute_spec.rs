//! Caller-declared attribute to extract from a document.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial AttributeSpec + AttributeType + AttributeSet.

/// Optional type hint attached to an attribute, canonicalized to four values
/// regardless of the vocabulary a caller's client library happens to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    #[default]
    Auto,
    Text,
    Number,
    Boolean,
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AttributeType::Auto => "auto",
            AttributeType::Text => "text",
            AttributeType::Number => "number",
            AttributeType::Boolean => "boolean",
        };
        f.write_str(s)
    }
}

/// One named attribute a caller wants extracted.
///
/// `name` is the key that will appear in `DocumentResult::answer`; `description`
/// is rendered verbatim into the prompt's numbered attribute list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
pub struct AttributeSpec {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "is_auto")]
    pub r#type: AttributeType,
}

fn is_auto(t: &AttributeType) -> bool {
    matches!(t, AttributeType::Auto)
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            r#type: AttributeType::Auto,
        }
    }

    pub fn with_type(mut self, r#type: AttributeType) -> Self {
        self.r#type = r#type;
        self
    }

    /// An attribute is well-formed when both `name` and `description` carry
    /// non-whitespace content. Malformed specs are rejected before fan-out.
    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty() && !self.description.trim().is_empty()
    }
}

/// An ordered, name-unique collection of [`AttributeSpec`].
///
/// Order is preserved because it surfaces directly in the rendered prompt as
/// a numbered list; uniqueness by name is enforced at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<AttributeSpec>", into = "Vec<AttributeSpec>")]
pub struct AttributeSet(Vec<AttributeSpec>);

impl AttributeSet {
    pub fn new(specs: Vec<AttributeSpec>) -> std::result::Result<Self, String> {
        let mut seen = std::collections::HashSet::with_capacity(specs.len());
        for spec in &specs {
            if !spec.is_well_formed() {
                return std::result::Result::Err(std::format!(
                    "attribute spec has an empty name or description: {:?}",
                    spec
                ));
            }
            if !seen.insert(spec.name.as_str()) {
                return std::result::Result::Err(std::format!(
                    "duplicate attribute name: {}",
                    spec.name
                ));
            }
        }
        std::result::Result::Ok(Self(specs))
    }

    pub fn as_slice(&self) -> &[AttributeSpec] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttributeSpec> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::convert::TryFrom<Vec<AttributeSpec>> for AttributeSet {
    type Error = String;

    fn try_from(specs: Vec<AttributeSpec>) -> std::result::Result<Self, Self::Error> {
        AttributeSet::new(specs)
    }
}

impl std::convert::From<AttributeSet> for Vec<AttributeSpec> {
    fn from(set: AttributeSet) -> Self {
        set.0
    }
}

/// Delegates to `Vec<AttributeSpec>`'s schema since the `try_from`/`into`
/// serde representation is the list, not the newtype wrapper.
impl schemars::JsonSchema for AttributeSet {
    fn schema_name() -> String {
        "AttributeSet".to_string()
    }

    fn json_schema(generator: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <Vec<AttributeSpec> as schemars::JsonSchema>::json_schema(generator)
    }
}
