//! Static pattern tables backing the deterministic classifier.

use once_cell::sync::Lazy;
use regex::Regex;

/// Build a case-insensitive, word-boundary-disciplined alternation regex
/// from a list of literal phrases. Multi-word phrases match literally;
/// single words get `\b...\b` boundaries so "call" never matches inside
/// "callout" or "recall".
fn boundary_regex(phrases: &[&str]) -> Regex {
    let alternation = phrases
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("static pattern is valid regex")
}

pub static STRUCTURAL: Lazy<Regex> = Lazy::new(|| {
    boundary_regex(&[
        "what",
        "test",
        "tests",
        "testing",
        "function",
        "functions",
        "package",
        "packages",
        "entry point",
        "entry points",
        "struct",
        "structs",
        "module",
        "modules",
        "class",
        "classes",
        "interface",
        "interfaces",
        "method",
        "methods",
        "type definition",
        "types",
    ])
});

pub static FLOW: Lazy<Regex> = Lazy::new(|| {
    boundary_regex(&[
        "how does",
        "how is",
        "trace",
        "call graph",
        "flow",
        "pipeline",
        "depends on",
        "dependency",
        "dependencies",
        "call",
        "calls",
        "invoke",
        "invokes",
        "invocation",
        "workflow",
        "control flow",
        "data flow",
    ])
});

pub static QUALITY: Lazy<Regex> = Lazy::new(|| {
    boundary_regex(&[
        "security",
        "vulnerability",
        "vulnerabilities",
        "error handling",
        "validation",
        "validate",
        "sanitize",
        "sanitization",
        "authentication",
        "authorization",
        "permission",
        "permissions",
        "bug",
        "bugs",
    ])
});

pub static EXPLORATION: Lazy<Regex> = Lazy::new(|| {
    boundary_regex(&[
        "where is",
        "where are",
        "find",
        "show",
        "list",
        "config",
        "configuration",
        "locate",
        "search",
    ])
});

/// One row of the plain `suggest_tool` routing table: first pattern that
/// matches the query wins.
pub struct SuggestRule {
    pub pattern: &'static Lazy<Regex>,
    pub tool: &'static str,
}

pub static SUGGEST_RULES: &[SuggestRule] = &[
    SuggestRule {
        pattern: &STRUCTURAL,
        tool: "find_entry_points",
    },
    SuggestRule {
        pattern: &FLOW,
        tool: "trace_data_flow",
    },
    SuggestRule {
        pattern: &QUALITY,
        tool: "search_codebase",
    },
    SuggestRule {
        pattern: &EXPLORATION,
        tool: "search_codebase",
    },
];

/// One row of the richer `suggest_tool_with_hint` table.
pub struct HintRule {
    pub pattern: &'static Lazy<Regex>,
    pub tool: &'static str,
    pub hint: &'static str,
    pub search_patterns: &'static [&'static str],
}

pub static HINT_RULES: &[HintRule] = &[
    HintRule {
        pattern: &STRUCTURAL,
        tool: "find_entry_points",
        hint: "Look for test files, exported functions, and package/module boundaries.",
        search_patterns: &["fn ", "func ", "def ", "class ", "test_", "_test", "describe(", "it("],
    },
    HintRule {
        pattern: &FLOW,
        tool: "trace_data_flow",
        hint: "Follow call sites and data flow starting from the symbol the query names.",
        search_patterns: &["->", "=>", "await ", ".call(", "invoke"],
    },
    HintRule {
        pattern: &QUALITY,
        tool: "search_codebase",
        hint: "Search for validation, authentication, and error-handling code paths.",
        search_patterns: &["validate", "sanitize", "auth", "permission", "catch", "except", "Result<", "Err("],
    },
    HintRule {
        pattern: &EXPLORATION,
        tool: "search_codebase",
        hint: "Search the codebase by name or keyword and list matching locations.",
        search_patterns: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_boundary_avoids_false_positive_traps() {
        assert!(!FLOW.is_match("callout the issue"));
        assert!(!FLOW.is_match("I recall what happened"));
        assert!(!STRUCTURAL.is_match("whatsoever you decide"));
    }

    #[test]
    fn word_boundary_matches_real_occurrences() {
        assert!(STRUCTURAL.is_match("what tests exist here?"));
        assert!(FLOW.is_match("how does auth work?"));
        assert!(QUALITY.is_match("check the error handling"));
        assert!(EXPLORATION.is_match("where is the config?"));
    }
}
