//! The classification result and related wire/runtime types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Outcome of classifying a single query.
///
/// Fields marked transient in the spec (`cached`, `duration`,
/// `fallback_used`, `validation_warnings`) are not persisted to the cache;
/// see [`crate::cache::ClassificationCache`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub is_analytical: bool,
    #[serde(default)]
    pub tool: String,
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
    #[serde(default)]
    pub search_patterns: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub confidence: f64,

    #[serde(skip)]
    pub cached: bool,
    #[serde(skip)]
    pub duration: Option<Duration>,
    #[serde(skip)]
    pub fallback_used: bool,
    #[serde(skip)]
    pub validation_warnings: Vec<String>,
}

impl ClassificationResult {
    /// A non-analytical result for empty/whitespace queries or conversational
    /// queries that never reach the model.
    pub fn non_analytical(reasoning: impl Into<String>) -> Self {
        Self {
            is_analytical: false,
            reasoning: reasoning.into(),
            confidence: 1.0,
            ..Default::default()
        }
    }

    /// Checks the invariant from §3: non-analytical results carry no tool or
    /// parameters.
    pub fn is_consistent(&self) -> bool {
        if !self.is_analytical {
            return self.tool.is_empty() && self.parameters.is_empty();
        }
        true
    }

    /// Strip the tool and parameters, e.g. after a hallucination is detected.
    pub fn clear_tool(&mut self) {
        self.tool.clear();
        self.parameters.clear();
    }
}

/// A compact projection of a classification for callers that only need
/// targeting information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSuggestion {
    pub tool_name: String,
    pub search_hint: String,
    pub search_patterns: Vec<String>,
}

/// Instruction to the downstream model-forcing code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "tool", rename_all = "snake_case")]
pub enum ToolChoice {
    /// Let the downstream model decide whether to call a tool.
    Auto,
    /// Require some tool call, any tool.
    Any,
    /// Require a call to the named tool.
    Tool(String),
    /// Forbid tool calls entirely.
    None,
}

impl ToolChoice {
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            ToolChoice::Tool(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

/// Result of validating a downstream agent reply (§4.G).
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: String,
    pub retryable: bool,
    pub matched_pattern: String,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            ..Default::default()
        }
    }

    pub fn reject(reason: impl Into<String>, retryable: bool) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
            retryable,
            matched_pattern: String::new(),
        }
    }

    pub fn reject_pattern(reason: impl Into<String>, retryable: bool, pattern: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
            retryable,
            matched_pattern: pattern.into(),
        }
    }

    /// A check that found something worth flagging but, at the caller's
    /// strictness level, does not reject the reply.
    pub fn warn(reason: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            valid: true,
            reason: format!("warning: {}", reason.into()),
            retryable: false,
            matched_pattern: pattern.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_analytical_is_consistent_by_construction() {
        let r = ClassificationResult::non_analytical("empty query");
        assert!(r.is_consistent());
    }

    #[test]
    fn inconsistent_when_non_analytical_carries_tool() {
        let mut r = ClassificationResult::non_analytical("x");
        r.tool = "find_entry_points".to_string();
        assert!(!r.is_consistent());
    }
}
