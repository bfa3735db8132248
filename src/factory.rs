//! Assembles the classifier implied by configuration: pattern-only when no
//! model client is supplied, pattern-plus-model otherwise (§4.I).

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::classification::ClassificationResult;
use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::llm::{LanguageModelClassifier, LlmClient};
use crate::pattern::PatternClassifier;
use crate::tool::ToolDefinition;

pub enum Classifier {
    PatternOnly(PatternClassifier),
    LanguageModel(LanguageModelClassifier),
}

impl Classifier {
    /// The pattern-only variant never calls out to a model, so `cancel` only
    /// has an effect when this wraps a [`LanguageModelClassifier`].
    pub async fn classify(
        &self,
        query: &str,
        tools: &[ToolDefinition],
        cancel: &CancellationToken,
    ) -> Result<ClassificationResult> {
        match self {
            Classifier::PatternOnly(pattern) => {
                let available: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
                Ok(pattern.classify(query, &available))
            }
            Classifier::LanguageModel(classifier) => classifier.classify(query, tools, cancel).await,
        }
    }
}

/// Build the classifier configuration demands. `client` is `None` for
/// deployments that only want the deterministic pattern classifier.
pub fn build_classifier(client: Option<Arc<dyn LlmClient>>, config: ClassifierConfig) -> Result<Classifier> {
    config.validate()?;
    match client {
        Some(client) => Ok(Classifier::LanguageModel(LanguageModelClassifier::new(client, config)?)),
        None => Ok(Classifier::PatternOnly(PatternClassifier::new())),
    }
}
