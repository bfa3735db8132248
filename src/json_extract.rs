//! Recovers a well-formed JSON object from a noisy language-model reply
//! (§4.B). The model may wrap its answer in a fenced code block, pad it with
//! a natural-language preamble or postamble, or emit more than one JSON
//! object in the same reply; the first well-formed one wins.

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonExtractError {
    #[error("input was empty")]
    Empty,
    #[error("no well-formed JSON object found")]
    NotFound,
}

/// Extract the first well-formed JSON object from `text`.
///
/// Brace matching is string-aware: characters inside string literals
/// (honoring backslash escapes) never participate in depth tracking, so a
/// brace embedded in a quoted value (e.g. `"reasoning": "x {y} z"`) cannot
/// desynchronize the scan.
pub fn extract_json(text: &str) -> Result<Value, JsonExtractError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(JsonExtractError::Empty);
    }

    let bytes = trimmed.as_bytes();
    let mut search_from = 0;
    while let Some(open) = next_brace(bytes, search_from) {
        if let Some(close) = matching_close(bytes, open) {
            // Safe: `open` and `close` are always ASCII `{`/`}` byte offsets,
            // which are always valid UTF-8 char boundaries.
            let candidate = &trimmed[open..=close];
            if let Ok(value) = serde_json::from_str::<Value>(candidate) {
                if value.is_object() {
                    return Ok(value);
                }
            }
        }
        search_from = open + 1;
    }

    Err(JsonExtractError::NotFound)
}

fn next_brace(bytes: &[u8], from: usize) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == b'{').map(|p| p + from)
}

fn matching_close(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }
    None
}
