//! Builds the fixed system/user prompt pair sent to the model for
//! classification. Tool descriptions are truncated so a handful of verbose
//! tool definitions cannot blow the prompt budget.

use crate::tool::ToolDefinition;

const DESCRIPTION_MAX_LEN: usize = 80;

const SYSTEM_PROMPT: &str = r#"You are a query classifier for a code-exploration agent.

Given a user query and a list of available tools, decide whether the query
requires analyzing the codebase (is_analytical: true) or is purely
conversational (is_analytical: false).

When analytical, choose exactly one tool from the available list and supply
any parameters it needs. Never invent a tool name or parameter that is not
listed.

Respond with a single JSON object and nothing else:
{
  "is_analytical": bool,
  "tool": string,
  "parameters": object,
  "search_patterns": [string],
  "reasoning": string,
  "confidence": number
}"#;

pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Render the user-turn prompt: the query plus a compact tool catalog.
pub fn user_prompt(query: &str, tools: &[ToolDefinition]) -> String {
    let mut catalog = String::new();
    for tool in tools {
        catalog.push_str(&format!(
            "- {}: {}\n",
            tool.name,
            tool.truncated_description(DESCRIPTION_MAX_LEN)
        ));
    }

    format!("Query: {query}\n\nAvailable tools:\n{catalog}")
}
