//! Error types for the query classification core.

use thiserror::Error;

/// Error taxonomy for the classification pipeline (see design notes §7).
#[derive(Error, Debug, Clone)]
pub enum ClassifierError {
    /// The caller's context was cancelled or its deadline expired. Never
    /// retried, never cached, never converted into a fallback.
    #[error("classification cancelled")]
    Cancelled,

    /// The underlying model completion call failed (transport, HTTP status,
    /// provider-side error).
    #[error("model transport error: {0}")]
    ModelTransport(String),

    /// The model reply could not be turned into a well-formed classification
    /// (envelope extraction or JSON parse failure).
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    /// The proposed tool was hallucinated (no exact or fuzzy match) or the
    /// classification's confidence fell below the configured threshold.
    #[error("validation rejected tool '{tool}': {reason}")]
    ValidationRejected { tool: String, reason: String },

    /// Invalid configuration discovered at construction time. Carries every
    /// offending field, not just the first.
    #[error("invalid configuration: {}", .0.join("; "))]
    Configuration(Vec<String>),

    /// The response validator's quality checks rejected a downstream reply
    /// (hedging language, missing citation).
    #[error("quality check rejected response: {reason}")]
    QualityRejected { reason: String, retryable: bool },

    /// The response validator's compliance checks rejected a downstream
    /// reply (no tool call made when one was required).
    #[error("compliance check rejected response: {reason}")]
    ComplianceRejected { reason: String },
}

impl ClassifierError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ClassifierError::Cancelled => false,
            ClassifierError::ModelTransport(_) => true,
            ClassifierError::MalformedResponse(_) => true,
            ClassifierError::ValidationRejected { .. } => false,
            ClassifierError::Configuration(_) => false,
            ClassifierError::QualityRejected { retryable, .. } => *retryable,
            ClassifierError::ComplianceRejected { .. } => true,
        }
    }
}

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ClassifierError>;
