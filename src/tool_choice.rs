//! Maps a query's suggestion quality onto a concrete [`ToolChoice`] for the
//! downstream agent call (§4.F).
//!
//! The selector never trusts a model-reported confidence float: it re-derives
//! confidence from how specifically the deterministic pattern classifier can
//! name a tool for the query, via three fixed bands.

use crate::classification::ToolChoice;
use crate::pattern::{PatternClassifier, SuggestionQuality};
use serde::{Deserialize, Serialize};

/// Confidence assigned when a hint rule names an available tool directly.
pub const CONFIDENCE_SPECIFIC_TOOL: f64 = 0.85;
/// Confidence assigned when the classifier falls back to a generic guess.
pub const CONFIDENCE_FALLBACK: f64 = 0.50;
/// Confidence assigned when no tool is available to suggest at all.
pub const CONFIDENCE_NONE: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolChoiceConfig {
    /// Confidence at or above which a named tool is forced.
    pub force_threshold: f64,
    /// Confidence at or above which any tool call is required, but not a
    /// specific one.
    pub require_threshold: f64,
}

impl Default for ToolChoiceConfig {
    fn default() -> Self {
        Self {
            force_threshold: 0.8,
            require_threshold: 0.4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolChoiceDecision {
    pub choice: ToolChoice,
    pub reasoning: String,
}

/// Decide how strongly to force a tool call for `query` given the tools
/// actually `available` to the downstream agent.
pub fn select(query: &str, available: &[&str], config: &ToolChoiceConfig) -> ToolChoiceDecision {
    let pattern = PatternClassifier::new();

    if !pattern.is_analytical(query) {
        return ToolChoiceDecision {
            choice: ToolChoice::Auto,
            reasoning: "query was classified as non-analytical".to_string(),
        };
    }

    let (suggestion, found) = pattern.suggest_tool_with_hint(query, available);
    let confidence = if !found {
        CONFIDENCE_NONE
    } else {
        match pattern.suggestion_quality(query, available) {
            SuggestionQuality::Specific => CONFIDENCE_SPECIFIC_TOOL,
            SuggestionQuality::Guessed => CONFIDENCE_FALLBACK,
        }
    };

    if confidence >= config.force_threshold && !suggestion.tool_name.is_empty() {
        return ToolChoiceDecision {
            choice: ToolChoice::Tool(suggestion.tool_name),
            reasoning: format!(
                "confidence {confidence:.2} at or above force threshold {:.2}",
                config.force_threshold
            ),
        };
    }

    if confidence >= config.require_threshold {
        return ToolChoiceDecision {
            choice: ToolChoice::Any,
            reasoning: format!(
                "confidence {confidence:.2} at or above require threshold {:.2} but below force threshold",
                config.require_threshold
            ),
        };
    }

    ToolChoiceDecision {
        choice: ToolChoice::Auto,
        reasoning: format!(
            "confidence {confidence:.2} below require threshold {:.2}",
            config.require_threshold
        ),
    }
}
