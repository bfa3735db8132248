//! Language-model classifier: the orchestrating component that turns a
//! cache miss from the pattern classifier into a model call, with retry,
//! request coalescing, a bounded concurrency cap, and fallback to the
//! deterministic classifier when the model's answer can't be trusted
//! (§4.E).

pub mod classifier;
pub mod client;
pub mod coalesce;
pub mod prompt;

pub use classifier::LanguageModelClassifier;
pub use client::{CompletionRequest, CompletionResponse, LlmClient, Message, Role};
