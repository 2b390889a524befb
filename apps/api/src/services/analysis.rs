use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::error::{ApiError, Result};

/// A chat-completion backend that answers a single user prompt.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// Send one prompt and return the raw message content of the first choice.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Turns a prompt into a structured JSON analysis via the completion backend.
#[derive(Clone)]
pub struct AnalysisService {
    completion: Arc<dyn CompletionApi>,
}

impl AnalysisService {
    pub fn new(completion: Arc<dyn CompletionApi>) -> Self {
        Self { completion }
    }

    /// Exactly one outbound completion call per invocation.
    pub async fn analyze(&self, prompt: &str) -> Result<Value> {
        let content = self.completion.complete(prompt).await?;
        debug!("Completion returned {} bytes", content.len());
        parse_analysis(&content)
    }
}

/// Parse completion content into a JSON object.
pub fn parse_analysis(content: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(content.trim())?;

    if !value.is_object() {
        return Err(ApiError::SerializationError(
            "completion content is not a JSON object".to_string(),
        ));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticCompletion {
        content: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionApi for StaticCompletion {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.content.clone())
        }
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let value = parse_analysis("\n  {\"genres\": [\"mystery\"]}  \n").unwrap();
        assert_eq!(value, json!({ "genres": ["mystery"] }));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(matches!(
            parse_analysis("Sure! Here are some books"),
            Err(ApiError::SerializationError(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(parse_analysis("[1, 2, 3]").is_err());
        assert!(parse_analysis("\"text\"").is_err());
    }

    #[tokio::test]
    async fn test_analyze_calls_backend_once() {
        let completion = Arc::new(StaticCompletion {
            content: "{\"mood\": \"cozy\"}".to_string(),
            calls: AtomicUsize::new(0),
        });
        let service = AnalysisService::new(completion.clone());

        let result = service.analyze("Recommend a book").await.unwrap();

        assert_eq!(result, json!({ "mood": "cozy" }));
        assert_eq!(completion.calls.load(Ordering::SeqCst), 1);
    }
}
