//! Deterministic, side-effect-free first-pass classifier (§4.A).
//!
//! Mirrors the keyword-scoring shape of this codebase's model-tier router
//! (`agent::model_router::classify_task`), but answers a binary
//! analytical/conversational question plus a tool suggestion instead of a
//! task-complexity tier.

mod rules;

use crate::classification::{ClassificationResult, ToolSuggestion};
use rules::{EXPLORATION, FLOW, HINT_RULES, QUALITY, STRUCTURAL, SUGGEST_RULES};

/// Deterministic pattern classifier. Stateless, cheap to construct.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternClassifier;

impl PatternClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Whether the query matches any family of analytical pattern.
    pub fn is_analytical(&self, query: &str) -> bool {
        is_analytical(query)
    }

    /// First tool whose rule matches the query, gated on availability.
    pub fn suggest_tool(&self, query: &str, available: &[&str]) -> (String, bool) {
        suggest_tool(query, available)
    }

    /// Richer suggestion carrying a human-readable hint and literal search
    /// patterns the downstream tool can grep for.
    pub fn suggest_tool_with_hint(&self, query: &str, available: &[&str]) -> (ToolSuggestion, bool) {
        suggest_tool_with_hint(query, available)
    }

    /// How confidently a tool was named: via a rule that names an available
    /// tool directly, or by falling through to a generic guess.
    pub fn suggestion_quality(&self, query: &str, available: &[&str]) -> SuggestionQuality {
        suggestion_quality(query, available)
    }

    /// Produce a full classification result, used both as the "pattern-only"
    /// classifier mode (§4.I) and as the fallback path for the language-model
    /// classifier (§4.E step 6).
    pub fn classify(&self, query: &str, available: &[&str]) -> ClassificationResult {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return ClassificationResult::non_analytical("empty query");
        }

        let analytical = self.is_analytical(trimmed);
        if !analytical {
            return ClassificationResult::non_analytical("no analytical pattern matched");
        }

        let (suggestion, found) = self.suggest_tool_with_hint(trimmed, available);
        if !found {
            return ClassificationResult {
                is_analytical: true,
                reasoning: "analytical query but no tools available".to_string(),
                confidence: 0.3,
                ..Default::default()
            };
        }

        ClassificationResult {
            is_analytical: true,
            tool: suggestion.tool_name,
            search_patterns: suggestion.search_patterns,
            reasoning: suggestion.search_hint,
            confidence: 0.6,
            ..Default::default()
        }
    }
}

pub fn is_analytical(query: &str) -> bool {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return false;
    }
    STRUCTURAL.is_match(trimmed)
        || FLOW.is_match(trimmed)
        || QUALITY.is_match(trimmed)
        || EXPLORATION.is_match(trimmed)
}

pub fn suggest_tool(query: &str, available: &[&str]) -> (String, bool) {
    if available.is_empty() {
        return (String::new(), false);
    }

    for rule in SUGGEST_RULES {
        if rule.pattern.is_match(query) && available.contains(&rule.tool) {
            return (rule.tool.to_string(), true);
        }
    }

    if available.contains(&"find_entry_points") {
        return ("find_entry_points".to_string(), true);
    }
    (available[0].to_string(), true)
}

/// How confidently the pattern classifier was able to name a tool, used by
/// the tool-choice selector (§4.F) to derive a confidence band instead of
/// trusting a model-reported probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionQuality {
    /// A hint rule matched the query and named an available tool directly.
    Specific,
    /// No rule matched an available tool; the suggestion is a generic guess.
    Guessed,
}

pub fn suggestion_quality(query: &str, available: &[&str]) -> SuggestionQuality {
    for rule in HINT_RULES {
        if rule.pattern.is_match(query) && available.contains(&rule.tool) {
            return SuggestionQuality::Specific;
        }
    }
    SuggestionQuality::Guessed
}

pub fn suggest_tool_with_hint(query: &str, available: &[&str]) -> (ToolSuggestion, bool) {
    if available.is_empty() {
        return (ToolSuggestion::default(), false);
    }

    for rule in HINT_RULES {
        if rule.pattern.is_match(query) && available.contains(&rule.tool) {
            return (
                ToolSuggestion {
                    tool_name: rule.tool.to_string(),
                    search_hint: rule.hint.to_string(),
                    search_patterns: rule.search_patterns.iter().map(|s| s.to_string()).collect(),
                },
                true,
            );
        }
    }

    let (tool, found) = suggest_tool(query, available);
    (
        ToolSuggestion {
            tool_name: tool,
            search_hint: "Search the codebase broadly for relevant code.".to_string(),
            search_patterns: Vec::new(),
        },
        found,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_is_not_analytical() {
        assert!(!is_analytical(""));
        assert!(!is_analytical("   "));
    }

    #[test]
    fn structural_query_is_analytical() {
        assert!(is_analytical("what tests exist in this repo?"));
    }

    #[test]
    fn false_positive_traps_are_rejected() {
        assert!(!is_analytical("callout"));
        assert!(!is_analytical("I recall that conversation"));
        assert!(!is_analytical("whatsoever happens next"));
    }

    #[test]
    fn suggest_tool_empty_available_not_found() {
        let (tool, found) = suggest_tool("what tests exist?", &[]);
        assert_eq!(tool, "");
        assert!(!found);
    }

    #[test]
    fn suggest_tool_prefers_matching_rule() {
        let (tool, found) = suggest_tool("how does auth work?", &["trace_data_flow", "find_entry_points"]);
        assert!(found);
        assert_eq!(tool, "trace_data_flow");
    }

    #[test]
    fn suggest_tool_falls_back_to_find_entry_points() {
        let (tool, found) = suggest_tool("blah unrelated text", &["search_codebase", "find_entry_points"]);
        assert!(found);
        assert_eq!(tool, "find_entry_points");
    }

    #[test]
    fn suggest_tool_falls_back_to_first_available() {
        let (tool, found) = suggest_tool("blah unrelated text", &["search_codebase"]);
        assert!(found);
        assert_eq!(tool, "search_codebase");
    }

    #[test]
    fn suggest_tool_with_hint_carries_literal_patterns() {
        let (suggestion, found) =
            suggest_tool_with_hint("what functions exist here?", &["find_entry_points"]);
        assert!(found);
        assert_eq!(suggestion.tool_name, "find_entry_points");
        assert!(!suggestion.search_patterns.is_empty());
    }

    #[test]
    fn classify_empty_query() {
        let result = PatternClassifier::new().classify("", &["find_entry_points"]);
        assert!(!result.is_analytical);
        assert_eq!(result.reasoning, "empty query");
    }

    #[test]
    fn classify_conversational_query() {
        let result = PatternClassifier::new().classify("thanks for the help!", &["find_entry_points"]);
        assert!(!result.is_analytical);
    }

    #[test]
    fn classify_analytical_query_picks_tool() {
        let result = PatternClassifier::new().classify(
            "where is the database config?",
            &["search_codebase", "find_entry_points"],
        );
        assert!(result.is_analytical);
        assert_eq!(result.tool, "search_codebase");
    }
}
