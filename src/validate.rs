//! Tool-name and parameter validation against the tools actually offered to
//! the model (§4.C). Catches hallucinated tool names and parameters before
//! they reach the downstream agent.

use crate::classification::ClassificationResult;
use crate::tool::ToolDefinition;
use std::collections::HashMap;

/// Maximum Levenshtein distance still considered a typo rather than a
/// different tool entirely.
const FUZZY_MATCH_THRESHOLD: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameValidation {
    /// `name` is exactly one of the available tools.
    Exact,
    /// `name` is not available verbatim, but is within the fuzzy threshold
    /// of `corrected`, which is.
    Corrected(String),
    /// No available tool is close enough to `name`.
    Invalid,
}

/// Validate a tool name against the tools actually available, tolerating
/// small typos via edit distance.
pub fn validate_tool_name(name: &str, available: &[&str]) -> NameValidation {
    if name.is_empty() || available.is_empty() {
        return NameValidation::Invalid;
    }
    if available.contains(&name) {
        return NameValidation::Exact;
    }

    let mut best: Option<(&str, usize)> = None;
    for &candidate in available {
        let distance = strsim::levenshtein(name, candidate);
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((candidate, distance));
        }
    }

    match best {
        Some((candidate, distance)) if distance < FUZZY_MATCH_THRESHOLD => {
            NameValidation::Corrected(candidate.to_string())
        }
        _ => NameValidation::Invalid,
    }
}

/// Outcome of validating a classification's parameters against a tool's
/// declared schema. Unknown or type-mismatched parameters are dropped, never
/// coerced; missing required parameters are reported but not synthesized.
#[derive(Debug, Clone, Default)]
pub struct ParameterValidation {
    pub kept: HashMap<String, serde_json::Value>,
    pub missing_required: Vec<String>,
    pub warnings: Vec<String>,
}

impl ParameterValidation {
    pub fn is_valid(&self) -> bool {
        self.missing_required.is_empty()
    }
}

pub fn validate_parameters(
    parameters: &HashMap<String, serde_json::Value>,
    tool: &ToolDefinition,
) -> ParameterValidation {
    let mut result = ParameterValidation::default();

    for (name, value) in parameters {
        let Some(schema) = tool.parameters.get(name) else {
            result.warnings.push(format!("dropped unknown parameter `{name}`"));
            continue;
        };

        if !schema.param_type.accepts(value) {
            result
                .warnings
                .push(format!("dropped parameter `{name}`: expected {:?}", schema.param_type));
            continue;
        }

        if let Some(allowed) = &schema.r#enum {
            if !allowed.contains(value) {
                result
                    .warnings
                    .push(format!("dropped parameter `{name}`: value not in enum"));
                continue;
            }
        }

        result.kept.insert(name.clone(), value.clone());
    }

    for (name, schema) in &tool.parameters {
        if schema.required && !result.kept.contains_key(name) {
            result.missing_required.push(name.clone());
        }
    }

    result
}

/// Run both the tool-name and parameter checks against a classification
/// result, mutating it in place when a hallucination is found.
///
/// On an invalid tool name the result is demoted to non-analytical: the tool
/// and parameters are cleared and a warning is recorded so the caller can
/// fall back (§4.E step 6).
pub fn validate_classification(result: &mut ClassificationResult, tools: &[ToolDefinition]) {
    if !result.is_analytical || result.tool.is_empty() {
        return;
    }

    let available: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    match validate_tool_name(&result.tool, &available) {
        NameValidation::Exact => {}
        NameValidation::Corrected(corrected) => {
            result
                .validation_warnings
                .push(format!("corrected tool name `{}` to `{corrected}`", result.tool));
            result.tool = corrected;
        }
        NameValidation::Invalid => {
            result
                .validation_warnings
                .push(format!("hallucinated tool `{}`; falling back", result.tool));
            result.clear_tool();
            return;
        }
    }

    let Some(tool) = tools.iter().find(|t| t.name == result.tool) else {
        return;
    };
    let param_validation = validate_parameters(&result.parameters, tool);
    result.validation_warnings.extend(param_validation.warnings.clone());
    result.parameters = param_validation.kept;
}
