//! Orchestrates a single classification end to end: trim the query, check
//! the cache, coalesce concurrent requests for the same key, call the model
//! under a bounded concurrency cap with exponential-backoff retries, and
//! fall back to the deterministic classifier when the model's answer is
//! missing, malformed, or under-confident.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::FutureExt;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::cache::{cache_key, ClassificationCache};
use crate::classification::ClassificationResult;
use crate::config::ClassifierConfig;
use crate::error::{ClassifierError, Result};
use crate::json_extract::{extract_json, JsonExtractError};
use crate::llm::client::{CompletionRequest, LlmClient, Message};
use crate::llm::coalesce::Coalescer;
use crate::llm::prompt::{system_prompt, user_prompt};
use crate::metrics::{MetricsSink, NoopMetricsSink};
use crate::pattern::PatternClassifier;
use crate::tool::{ToolDefinition, ToolsFingerprint};
use crate::validate::validate_classification;

pub struct LanguageModelClassifier {
    client: Arc<dyn LlmClient>,
    config: ClassifierConfig,
    cache: ClassificationCache,
    coalescer: Coalescer<Result<ClassificationResult>>,
    semaphore: Arc<Semaphore>,
    metrics: Arc<dyn MetricsSink>,
    pattern: PatternClassifier,
}

impl LanguageModelClassifier {
    pub fn new(client: Arc<dyn LlmClient>, config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cache: ClassificationCache::new(config.cache_max_size, config.cache_ttl),
            coalescer: Coalescer::new(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
            metrics: Arc::new(NoopMetricsSink),
            pattern: PatternClassifier::new(),
            client,
            config,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn cache(&self) -> &ClassificationCache {
        &self.cache
    }

    /// Classify `query` against `tools`, consulting the cache first and
    /// falling back to the pattern classifier if the model call cannot
    /// produce a trustworthy result.
    ///
    /// `cancel` is checked before the semaphore wait, the retry backoff, and
    /// the model call itself (§4.E, §5); cancelling it never caches a
    /// result. Callers that join an in-flight request for the same key share
    /// the fate of whichever call started it, since they are waiting on the
    /// same coalesced future.
    pub async fn classify(
        &self,
        query: &str,
        tools: &[ToolDefinition],
        cancel: &CancellationToken,
    ) -> Result<ClassificationResult> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(ClassificationResult::non_analytical("empty query"));
        }
        if cancel.is_cancelled() {
            return Err(ClassifierError::Cancelled);
        }

        let fingerprint = ToolsFingerprint::from_tools(tools);
        let key = cache_key(trimmed, &fingerprint);

        if let Some(cached) = self.cache.get(&key) {
            self.metrics.record_cache_hit();
            return Ok(cached);
        }
        self.metrics.record_cache_miss();

        let start = Instant::now();
        let client = Arc::clone(&self.client);
        let semaphore = Arc::clone(&self.semaphore);
        let config = self.config.clone();
        let pattern = self.pattern;
        let query_owned = trimmed.to_string();
        let tools_owned = tools.to_vec();
        let cancel_owned = cancel.clone();

        let result = self
            .coalescer
            .run(&key, move || {
                attempt_with_retries(client, semaphore, config, pattern, query_owned, tools_owned, cancel_owned)
                    .boxed()
            })
            .await;

        let duration = start.elapsed();
        if let Ok(classification) = &result {
            self.cache.set(key, classification.clone());
            self.metrics.record_classification(duration, classification.fallback_used);
        }

        result.map(|mut r| {
            r.duration = Some(duration);
            r
        })
    }
}

async fn attempt_with_retries(
    client: Arc<dyn LlmClient>,
    semaphore: Arc<Semaphore>,
    config: ClassifierConfig,
    pattern: PatternClassifier,
    query: String,
    tools: Vec<ToolDefinition>,
    cancel: CancellationToken,
) -> Result<ClassificationResult> {
    let available: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    let mut attempt = 0u32;
    let mut last_error: Option<ClassifierError> = None;

    while attempt <= config.max_retries {
        if cancel.is_cancelled() {
            return Err(ClassifierError::Cancelled);
        }

        // max_concurrent == 0 disables the cap entirely; a zero-permit
        // semaphore would otherwise block every acquire forever.
        let permit = if config.max_concurrent > 0 {
            let acquire = semaphore.clone().acquire_owned();
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ClassifierError::Cancelled),
                res = acquire => Some(res.map_err(|_| ClassifierError::Cancelled)?),
            }
        } else {
            None
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClassifierError::Cancelled),
            res = call_model_once(&client, &config, &query, &tools) => res,
        };
        drop(permit);

        match outcome {
            Ok(mut result) => {
                validate_classification(&mut result, &tools);
                let under_confident = result.is_analytical && result.confidence < config.confidence_threshold;
                let needs_fallback =
                    !result.is_consistent() || under_confident || !result.validation_warnings.is_empty();
                if needs_fallback && config.fallback_to_pattern {
                    let mut fallback = pattern.classify(&query, &available);
                    fallback.fallback_used = true;
                    fallback.validation_warnings = result.validation_warnings;
                    return Ok(fallback);
                }
                return Ok(result);
            }
            Err(ClassifierError::Cancelled) => return Err(ClassifierError::Cancelled),
            Err(error) => {
                if !error.is_retryable() || attempt == config.max_retries {
                    last_error = Some(error);
                    break;
                }
                let delay = delay_for(attempt + 1, config.retry_backoff);
                tracing::warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "retrying classification model call"
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(ClassifierError::Cancelled),
                    _ = tokio::time::sleep(delay) => {},
                }
                last_error = Some(error);
            }
        }
        attempt += 1;
    }

    if config.fallback_to_pattern {
        let mut fallback = pattern.classify(&query, &available);
        fallback.fallback_used = true;
        if let Some(error) = &last_error {
            fallback.validation_warnings.push(format!("model classification failed: {error}"));
        }
        return Ok(fallback);
    }

    Err(last_error.unwrap_or_else(|| ClassifierError::ModelTransport("no attempts made".to_string())))
}

fn delay_for(attempt: u32, base: Duration) -> Duration {
    let multiplier = 2u32.saturating_pow(attempt.saturating_sub(1));
    base.saturating_mul(multiplier)
}

async fn call_model_once(
    client: &Arc<dyn LlmClient>,
    config: &ClassifierConfig,
    query: &str,
    tools: &[ToolDefinition],
) -> Result<ClassificationResult> {
    let request = CompletionRequest::new(vec![
        Message::system(system_prompt()),
        Message::user(user_prompt(query, tools)),
    ])
    .with_temperature(config.temperature)
    .with_max_tokens(config.max_tokens);

    let response = tokio::time::timeout(config.timeout, client.complete(request))
        .await
        .map_err(|_| ClassifierError::ModelTransport("model call timed out".to_string()))??;

    let value = extract_json(&response.content).map_err(|e| match e {
        JsonExtractError::Empty => ClassifierError::MalformedResponse("model returned an empty reply".to_string()),
        JsonExtractError::NotFound => {
            ClassifierError::MalformedResponse("no JSON object found in model reply".to_string())
        }
    })?;

    serde_json::from_value(value).map_err(|e| ClassifierError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::CompletionResponse;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn no_cancel() -> CancellationToken {
        CancellationToken::new()
    }

    struct ScriptedClient {
        replies: Mutex<Vec<Result<String>>>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        fn provider(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-model"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.replies.lock().unwrap().pop().expect("no more scripted replies");
            next.map(|content| CompletionResponse { content })
        }
    }

    fn tools() -> Vec<ToolDefinition> {
        vec![ToolDefinition::new("search_codebase", "search the codebase")]
    }

    #[tokio::test]
    async fn empty_query_never_reaches_the_model() {
        let client = Arc::new(ScriptedClient::new(vec![]));
        let classifier = LanguageModelClassifier::new(client, ClassifierConfig::default()).unwrap();
        let result = classifier.classify("", &tools(), &no_cancel()).await.unwrap();
        assert!(!result.is_analytical);
    }

    #[tokio::test]
    async fn well_formed_reply_is_returned_and_cached() {
        let reply = r#"{"is_analytical":true,"tool":"search_codebase","confidence":0.9}"#.to_string();
        let client = Arc::new(ScriptedClient::new(vec![Ok(reply)]));
        let classifier = LanguageModelClassifier::new(client, ClassifierConfig::default()).unwrap();

        let first = classifier.classify("where is auth handled?", &tools(), &no_cancel()).await.unwrap();
        assert!(first.is_analytical);
        assert_eq!(first.tool, "search_codebase");
        assert!(!first.cached);

        let second = classifier.classify("where is auth handled?", &tools(), &no_cancel()).await.unwrap();
        assert!(second.cached);
    }

    #[tokio::test]
    async fn retries_transient_errors_then_succeeds() {
        let reply = r#"{"is_analytical":false,"confidence":0.9}"#.to_string();
        let client = Arc::new(ScriptedClient::new(vec![
            Err(ClassifierError::ModelTransport("boom".to_string())),
            Ok(reply),
        ]));
        let config = ClassifierConfig {
            retry_backoff: Duration::from_millis(1),
            ..ClassifierConfig::default()
        };
        let classifier = LanguageModelClassifier::new(client, config).unwrap();
        let result = classifier.classify("hello there", &tools(), &no_cancel()).await.unwrap();
        assert!(!result.is_analytical);
    }

    #[tokio::test]
    async fn falls_back_to_pattern_classifier_on_malformed_reply() {
        let client = Arc::new(ScriptedClient::new(vec![Ok("not json at all".to_string())]));
        let config = ClassifierConfig {
            max_retries: 0,
            ..ClassifierConfig::default()
        };
        let classifier = LanguageModelClassifier::new(client, config).unwrap();
        let result = classifier.classify("where is the config loaded?", &tools(), &no_cancel()).await.unwrap();
        assert!(result.fallback_used);
    }

    #[tokio::test]
    async fn falls_back_on_hallucinated_tool_name() {
        let reply = r#"{"is_analytical":true,"tool":"delete_everything","confidence":0.9}"#.to_string();
        let client = Arc::new(ScriptedClient::new(vec![Ok(reply)]));
        let classifier = LanguageModelClassifier::new(client, ClassifierConfig::default()).unwrap();
        let result = classifier.classify("where is auth handled?", &tools(), &no_cancel()).await.unwrap();
        assert!(result.fallback_used);
    }

    #[tokio::test]
    async fn max_concurrent_zero_does_not_deadlock() {
        let reply = r#"{"is_analytical":false,"confidence":0.9}"#.to_string();
        let client = Arc::new(ScriptedClient::new(vec![Ok(reply)]));
        let config = ClassifierConfig {
            max_concurrent: 0,
            ..ClassifierConfig::default()
        };
        let classifier = LanguageModelClassifier::new(client, config).unwrap();
        let result = classifier.classify("hello there", &tools(), &no_cancel()).await.unwrap();
        assert!(!result.is_analytical);
    }

    #[tokio::test]
    async fn cancelling_before_the_call_never_reaches_the_model_or_caches() {
        let client = Arc::new(ScriptedClient::new(vec![]));
        let classifier = LanguageModelClassifier::new(client, ClassifierConfig::default()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = classifier
            .classify("where is auth handled?", &tools(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifierError::Cancelled));
    }

    #[tokio::test]
    async fn cancelling_during_backoff_aborts_the_retry_and_never_caches() {
        let client = Arc::new(ScriptedClient::new(vec![
            Err(ClassifierError::ModelTransport("boom".to_string())),
            Err(ClassifierError::ModelTransport("boom again".to_string())),
        ]));
        let config = ClassifierConfig {
            retry_backoff: Duration::from_millis(200),
            max_retries: 3,
            ..ClassifierConfig::default()
        };
        let classifier = LanguageModelClassifier::new(client, config).unwrap();
        let cancel = CancellationToken::new();

        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel_clone.cancel();
        });

        let err = classifier
            .classify("where is auth handled?", &tools(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifierError::Cancelled));
        let key = cache_key("where is auth handled?", &ToolsFingerprint::from_tools(&tools()));
        assert!(classifier.cache().get(&key).is_none());
    }
}
