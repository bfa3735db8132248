//! Decides how a downstream agent call should be retried after the response
//! validator rejects a reply (§4.H). Separate from the language-model
//! classifier's own model-call retry loop, which lives in
//! [`crate::llm::classifier`].

use crate::classification::ToolChoice;

/// Escalate the tool choice for the next attempt: a rejected `Auto`/`None`
/// reply is retried requiring any tool call; a rejected `Any` reply is
/// retried pinned to the classifier's originally suggested tool when one
/// exists; a rejected `Tool(x)` reply stays pinned to `x`.
pub fn next_choice(previous: &ToolChoice, suggested_tool: Option<&str>) -> ToolChoice {
    match previous {
        ToolChoice::Auto | ToolChoice::None => ToolChoice::Any,
        ToolChoice::Any => match suggested_tool {
            Some(tool) if !tool.is_empty() => ToolChoice::Tool(tool.to_string()),
            _ => ToolChoice::Any,
        },
        ToolChoice::Tool(name) => ToolChoice::Tool(name.clone()),
    }
}

/// Whether another attempt should be made at all.
pub fn should_retry(retryable: bool, attempt: u32, max_retries: u32) -> bool {
    retryable && attempt < max_retries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_escalates_to_any() {
        assert_eq!(next_choice(&ToolChoice::Auto, None), ToolChoice::Any);
    }

    #[test]
    fn none_escalates_to_any() {
        assert_eq!(next_choice(&ToolChoice::None, None), ToolChoice::Any);
    }

    #[test]
    fn any_escalates_to_suggested_tool_when_present() {
        assert_eq!(
            next_choice(&ToolChoice::Any, Some("search_codebase")),
            ToolChoice::Tool("search_codebase".to_string())
        );
    }

    #[test]
    fn any_stays_any_without_a_suggestion() {
        assert_eq!(next_choice(&ToolChoice::Any, None), ToolChoice::Any);
    }

    #[test]
    fn named_tool_stays_pinned() {
        assert_eq!(
            next_choice(&ToolChoice::Tool("find_entry_points".to_string()), Some("search_codebase")),
            ToolChoice::Tool("find_entry_points".to_string())
        );
    }

    #[test]
    fn retry_eligibility_respects_both_conditions() {
        assert!(should_retry(true, 0, 2));
        assert!(!should_retry(false, 0, 2));
        assert!(!should_retry(true, 2, 2));
    }
}
