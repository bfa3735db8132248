//! Tool definitions and the tool-set fingerprint used to key cache entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// The declared type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Int,
    Float,
    Bool,
    Array,
    Object,
}

impl ParameterType {
    /// Whether a JSON value satisfies this parameter type. Integral-valued
    /// floats are accepted for `Int` slots; non-integral floats are not.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParameterType::String => value.is_string(),
            ParameterType::Int => match value {
                Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
                _ => false,
            },
            ParameterType::Float => value.is_number(),
            ParameterType::Bool => value.is_boolean(),
            ParameterType::Array => value.is_array(),
            ParameterType::Object => value.is_object(),
        }
    }
}

/// Schema for a single tool parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#enum: Option<Vec<Value>>,
    #[serde(default)]
    pub description: String,
}

impl ParameterSchema {
    pub fn new(param_type: ParameterType) -> Self {
        Self {
            param_type,
            required: false,
            default: None,
            r#enum: None,
            description: String::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.r#enum = Some(values);
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn string() -> Self {
        Self::new(ParameterType::String)
    }

    pub fn int() -> Self {
        Self::new(ParameterType::Int)
    }

    pub fn float() -> Self {
        Self::new(ParameterType::Float)
    }

    pub fn boolean() -> Self {
        Self::new(ParameterType::Bool)
    }

    pub fn array() -> Self {
        Self::new(ParameterType::Array)
    }

    pub fn object() -> Self {
        Self::new(ParameterType::Object)
    }
}

/// A tool the agent can call, as seen by the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterSchema>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, schema: ParameterSchema) -> Self {
        self.parameters.insert(name.into(), schema);
        self
    }

    /// Description truncated to `max_len` characters with an ellipsis,
    /// matching the prompt template's budget for tool descriptions.
    pub fn truncated_description(&self, max_len: usize) -> String {
        truncate_with_ellipsis(&self.description, max_len)
    }
}

pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_len.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// A stable hash over the sorted set of tool names, used as part of every
/// cache key so that changing the available tool set invalidates cached
/// classifications without an explicit flush.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolsFingerprint(String);

impl ToolsFingerprint {
    pub fn compute<'a>(tool_names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut names: Vec<&str> = tool_names.into_iter().collect();
        names.sort_unstable();
        let mut hasher = Sha256::new();
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                hasher.update(b"\n");
            }
            hasher.update(name.as_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    pub fn from_tools(tools: &[ToolDefinition]) -> Self {
        Self::compute(tools.iter().map(|t| t.name.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ToolsFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
