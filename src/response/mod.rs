//! Post-hoc validation of a downstream agent's reply against the tool choice
//! that was forced on it (§4.G). Compliance is checked first since a
//! non-compliant reply makes quality assessment moot.

pub mod compliance;
pub mod quality;

use crate::classification::{ToolChoice, ValidationResult};
use crate::error::ClassifierError;
use compliance::ReplyContext;
use quality::QualityStrictness;

/// Validate a reply, returning an error describing the first failed check.
pub fn validate(
    reply: &ReplyContext,
    tool_choice: &ToolChoice,
    strictness: QualityStrictness,
) -> Result<(), ClassifierError> {
    let compliance_result = compliance::check(reply, tool_choice);
    if !compliance_result.valid {
        return Err(ClassifierError::ComplianceRejected {
            reason: compliance_result.reason,
        });
    }

    let quality_result = quality::check(reply.content, strictness);
    if !quality_result.valid {
        return Err(ClassifierError::QualityRejected {
            reason: quality_result.reason,
            retryable: quality_result.retryable,
        });
    }

    Ok(())
}

/// Run only the compliance half, e.g. when quality checks are disabled.
pub fn validate_compliance_only(reply: &ReplyContext, tool_choice: &ToolChoice) -> ValidationResult {
    compliance::check(reply, tool_choice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compliant_and_high_quality_reply_passes() {
        let reply = ReplyContext {
            content: "Found it in src/auth.rs:42.",
            tool_called: Some("search_codebase"),
        };
        let result = validate(&reply, &ToolChoice::Any, QualityStrictness::SoftFail);
        assert!(result.is_ok());
    }

    #[test]
    fn non_compliant_reply_short_circuits_before_quality() {
        let reply = ReplyContext { content: "sure, here's an answer", tool_called: None };
        let result = validate(&reply, &ToolChoice::Any, QualityStrictness::HardFail);
        assert!(matches!(result, Err(ClassifierError::ComplianceRejected { .. })));
    }

    #[test]
    fn compliant_but_low_quality_reply_fails_quality() {
        let reply = ReplyContext {
            content: &format!("{}I think this might be it.", "x".repeat(200)),
            tool_called: Some("search_codebase"),
        };
        let result = validate(&reply, &ToolChoice::Any, QualityStrictness::HardFail);
        assert!(matches!(result, Err(ClassifierError::QualityRejected { .. })));
    }

    #[test]
    fn warning_only_strictness_never_fails_validate() {
        let reply = ReplyContext {
            content: &format!("{}I think this might be it.", "x".repeat(200)),
            tool_called: Some("search_codebase"),
        };
        let result = validate(&reply, &ToolChoice::Any, QualityStrictness::WarningOnly);
        assert!(result.is_ok());
    }
}
