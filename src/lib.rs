//! Query classification and tool-routing core for code-exploration agents.
//!
//! A two-tier classifier: a deterministic, regex-driven pattern classifier
//! ([`pattern::PatternClassifier`]) answers cheap cases immediately, and a
//! language-model classifier ([`llm::LanguageModelClassifier`]) handles the
//! rest, with caching, request coalescing, retry, and fallback back to the
//! pattern classifier when the model's answer can't be trusted.
//!
//! [`factory::build_classifier`] assembles whichever of the two a given
//! [`config::ClassifierConfig`] and optional model client imply.

pub mod cache;
pub mod classification;
pub mod config;
pub mod error;
pub mod factory;
pub mod json_extract;
pub mod llm;
pub mod metrics;
pub mod pattern;
pub mod response;
pub mod retry_controller;
pub mod tool;
pub mod tool_choice;
pub mod validate;

pub use classification::{ClassificationResult, ToolChoice, ToolSuggestion, ValidationResult};
pub use config::ClassifierConfig;
pub use error::{ClassifierError, Result};
pub use factory::{build_classifier, Classifier};
pub use llm::{LanguageModelClassifier, LlmClient};
pub use pattern::PatternClassifier;
pub use tool::{ParameterSchema, ParameterType, ToolDefinition, ToolsFingerprint};
pub use tokio_util::sync::CancellationToken;
