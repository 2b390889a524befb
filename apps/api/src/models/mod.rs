use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};

// Re-export types from book.rs
pub use book::{
    has_required_fields, has_substantial_highlights, is_valid_record, matches_any_genre,
    BookRecord, MIN_HIGHLIGHTS_LEN,
};

mod book;

/// Request body for `POST /api/ai/analyze`
///
/// The prompt is kept as a raw JSON value so that a non-string prompt is
/// reported as an invalid prompt rather than a malformed body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub prompt: Option<Value>,
}

impl AnalyzeRequest {
    pub fn validated_prompt(&self) -> Result<&str> {
        match self.prompt.as_ref().and_then(Value::as_str) {
            Some(prompt) if !prompt.is_empty() => Ok(prompt),
            _ => Err(ApiError::InvalidInput("Invalid prompt provided".to_string())),
        }
    }
}

/// Request body for `POST /api/books/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub genres: Option<Value>,
}

impl SearchRequest {
    /// A non-empty array of strings, in request order.
    pub fn validated_genres(&self) -> Result<Vec<String>> {
        let invalid = || ApiError::InvalidInput("Invalid genres provided".to_string());

        let items = self
            .genres
            .as_ref()
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty())
            .ok_or_else(invalid)?;

        items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect()
    }
}

/// Which required settings are configured. Values are never exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvStatus {
    pub has_groq_key: bool,
    pub has_supabase_url: bool,
    pub has_supabase_key: bool,
}

/// Health check response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in RFC3339 format
    pub timestamp: String,
    pub env: EnvStatus,
}
