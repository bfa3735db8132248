//! Quality checks: hedging language and missing source citations. Strictness
//! controls what a failing check does, not just what it checks (§4.G):
//! `Off` skips quality checks entirely, `WarningOnly` flags but never
//! invalidates a reply, `SoftFail` rejects retryably, `HardFail` rejects
//! without a retry.

use crate::classification::ValidationResult;
use once_cell::sync::Lazy;
use regex::Regex;

/// How a failing quality check affects the reply's validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum QualityStrictness {
    /// No quality checks at all.
    Off = 0,
    /// Checks run but a failure only produces a warning; `valid` stays true.
    WarningOnly = 1,
    /// A failure rejects the reply, retryably.
    SoftFail = 2,
    /// A failure rejects the reply, not retryably.
    HardFail = 3,
}

/// Minimum reply length, in characters, above which a citation is required.
pub const MIN_LENGTH_FOR_CITATION: usize = 200;

static HEDGING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(might be|could possibly|i think|perhaps|it'?s possible that|probably|i'?m not (entirely )?sure|likely|appears to|based on the function names|could handle)\b",
    )
    .expect("static pattern is valid regex")
});

/// Matches `[file.ext:10]`, `[file.ext:10-20]`, `(file.ext:10)`, or a bare
/// `file.ext:10` reference.
static CITATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\[\(]?\b[\w./-]+\.\w+:\d+(-\d+)?\b[\]\)]?").expect("static pattern is valid regex")
});

static NOT_FOUND_EXEMPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(i don'?t see|not found in|couldn'?t find)").expect("static pattern is valid regex")
});

/// Check a reply's quality at the given strictness level.
pub fn check(content: &str, strictness: QualityStrictness) -> ValidationResult {
    if strictness == QualityStrictness::Off {
        return ValidationResult::ok();
    }

    if HEDGING.is_match(content) {
        return outcome_for(strictness, "reply contains hedging language", "hedging");
    }

    if requires_citation(content) && !CITATION.is_match(content) {
        return outcome_for(
            strictness,
            "reply is long enough to require a source citation but contains none",
            "missing_citation",
        );
    }

    ValidationResult::ok()
}

fn outcome_for(strictness: QualityStrictness, reason: &str, pattern: &str) -> ValidationResult {
    match strictness {
        QualityStrictness::Off => ValidationResult::ok(),
        QualityStrictness::WarningOnly => ValidationResult::warn(reason, pattern),
        QualityStrictness::SoftFail => ValidationResult::reject_pattern(reason, true, pattern),
        QualityStrictness::HardFail => ValidationResult::reject_pattern(reason, false, pattern),
    }
}

fn requires_citation(content: &str) -> bool {
    content.chars().count() >= MIN_LENGTH_FOR_CITATION && !NOT_FOUND_EXEMPTION.is_match(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_strictness_accepts_everything() {
        assert!(check("might be wrong but who cares", QualityStrictness::Off).valid);
    }

    #[test]
    fn hard_fail_rejects_hedging_without_retry() {
        let result = check("I think this might be the right function.", QualityStrictness::HardFail);
        assert!(!result.valid);
        assert!(!result.retryable);
        assert_eq!(result.matched_pattern, "hedging");
    }

    #[test]
    fn soft_fail_rejects_hedging_retryably() {
        let result = check("I think this is the right function.", QualityStrictness::SoftFail);
        assert!(!result.valid);
        assert!(result.retryable);
    }

    #[test]
    fn warning_only_flags_hedging_but_stays_valid() {
        let result = check("I think this is the right function.", QualityStrictness::WarningOnly);
        assert!(result.valid);
        assert!(result.reason.starts_with("warning:"));
    }

    #[test]
    fn spec_example_hedge_is_detected() {
        let result = check("The system likely uses flags for configuration.", QualityStrictness::HardFail);
        assert!(!result.valid);
        assert_eq!(result.matched_pattern, "hedging");
    }

    #[test]
    fn long_reply_without_citation_fails_soft_fail() {
        let reply = "x".repeat(250);
        let result = check(&reply, QualityStrictness::SoftFail);
        assert!(!result.valid);
        assert_eq!(result.matched_pattern, "missing_citation");
    }

    #[test]
    fn long_reply_with_citation_passes() {
        let reply = format!("{}src/auth.rs:42{}", "x".repeat(100), "y".repeat(100));
        assert!(check(&reply, QualityStrictness::SoftFail).valid);
    }

    #[test]
    fn not_found_exemption_skips_citation_requirement() {
        let reply = format!("I don't see anything relevant. {}", "x".repeat(200));
        assert!(check(&reply, QualityStrictness::SoftFail).valid);
    }

    #[test]
    fn short_reply_never_needs_citation() {
        assert!(check("short answer", QualityStrictness::HardFail).valid);
    }
}
