//! Compliance checks: did the downstream agent actually do what the tool
//! choice demanded, and does the reply avoid the boilerplate refusals that
//! show up when a model ignores a forced tool call?

use crate::classification::{ToolChoice, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// What the downstream agent actually produced, for compliance purposes.
pub struct ReplyContext<'a> {
    pub content: &'a str,
    pub tool_called: Option<&'a str>,
}

/// Boilerplate offers of help the model substitutes for actually using the
/// tool it was forced to call.
static PROHIBITED_PHRASES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(i'?m\s+ready\s+to\s+help|what\s+would\s+you\s+like|how\s+can\s+i\s+(help|assist)|could\s+you\s+please\s+specify|could\s+you\s+(please\s+)?clarify|feel\s+free\s+to\s+ask|let\s+me\s+know\s+(if|how)|i'?m\s+here\s+to\s+help)",
    )
    .expect("static pattern is valid regex")
});

/// Check a reply for compliance with the tool choice that was forced.
pub fn check(reply: &ReplyContext, tool_choice: &ToolChoice) -> ValidationResult {
    if reply.content.trim().is_empty() {
        return ValidationResult::reject("reply was empty", true);
    }

    if PROHIBITED_PHRASES.is_match(reply.content) {
        return ValidationResult::reject_pattern(
            "reply contains a boilerplate refusal instead of using the required tool",
            true,
            "prohibited_phrase",
        );
    }

    match tool_choice {
        ToolChoice::Auto | ToolChoice::None => ValidationResult::ok(),
        ToolChoice::Any => match reply.tool_called {
            Some(_) => ValidationResult::ok(),
            None => ValidationResult::reject("tool choice required a tool call but none was made", true),
        },
        ToolChoice::Tool(expected) => match reply.tool_called {
            Some(actual) if actual == expected => ValidationResult::ok(),
            Some(actual) => ValidationResult::reject(
                format!("tool choice required `{expected}` but `{actual}` was called"),
                true,
            ),
            None => ValidationResult::reject(format!("tool choice required `{expected}` but no tool was called"), true),
        },
    }
}
