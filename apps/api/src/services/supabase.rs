use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{ApiError, Result};
use crate::services::book_search::{BookQuery, BookStore, QueryOutcome};

/// Columns returned by every books query.
pub const BOOK_COLUMNS: &str = "id,author,title,highlights,sub-genre";

pub const GENRE_QUERY_LIMIT: u32 = 200;
pub const UNFILTERED_QUERY_LIMIT: u32 = 500;

/// PostgREST `or=(...)` body: one case-insensitive `ilike` per genre.
pub fn genre_filter(genres: &[String]) -> String {
    genres
        .iter()
        .map(|genre| format!("sub-genre.ilike.*{}*", urlencoding::encode(genre)))
        .collect::<Vec<_>>()
        .join(",")
}

impl BookQuery {
    pub fn limit(&self) -> u32 {
        match self {
            BookQuery::ByGenres(_) => GENRE_QUERY_LIMIT,
            BookQuery::Unfiltered => UNFILTERED_QUERY_LIMIT,
        }
    }

    /// The query string, already encoded.
    pub fn query_string(&self) -> String {
        let base = format!("select={}&highlights=not.is.null", BOOK_COLUMNS);
        match self {
            BookQuery::ByGenres(genres) => format!(
                "{}&or=({})&limit={}",
                base,
                genre_filter(genres),
                self.limit()
            ),
            BookQuery::Unfiltered => format!("{}&limit={}", base, self.limit()),
        }
    }
}

/// Thin client for the Supabase REST (PostgREST) API.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl SupabaseClient {
    pub fn new(base_url: &str, api_key: &str, table: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            table: table.to_string(),
        }
    }

    pub fn url_for(&self, query: &BookQuery) -> String {
        format!(
            "{}/rest/v1/{}?{}",
            self.base_url,
            self.table,
            query.query_string()
        )
    }
}

#[async_trait]
impl BookStore for SupabaseClient {
    async fn fetch_books(&self, query: &BookQuery) -> Result<QueryOutcome> {
        let url = self.url_for(query);
        debug!("Querying books: {}", url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(|e| ApiError::ExternalServiceError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Supabase query error: {} {}", status, body);
            return Ok(QueryOutcome::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidDatabaseResponse(e.to_string()))?;

        match payload {
            Value::Array(rows) => Ok(QueryOutcome::Rows(rows)),
            other => Err(ApiError::InvalidDatabaseResponse(format!(
                "expected an array of rows, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genres(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_genre_filter_encodes_each_genre() {
        assert_eq!(
            genre_filter(&genres(&["mystery", "science fiction", "R&B"])),
            "sub-genre.ilike.*mystery*,sub-genre.ilike.*science%20fiction*,sub-genre.ilike.*R%26B*"
        );
    }

    #[test]
    fn test_genre_query_string() {
        let query = BookQuery::ByGenres(genres(&["mystery"]));
        assert_eq!(
            query.query_string(),
            "select=id,author,title,highlights,sub-genre&highlights=not.is.null&or=(sub-genre.ilike.*mystery*)&limit=200"
        );
    }

    #[test]
    fn test_unfiltered_query_string() {
        assert_eq!(
            BookQuery::Unfiltered.query_string(),
            "select=id,author,title,highlights,sub-genre&highlights=not.is.null&limit=500"
        );
    }

    #[test]
    fn test_url_uses_table_and_trims_base() {
        let client = SupabaseClient::new("https://xyz.supabase.co/", "anon", "filtered_books");
        assert!(client
            .url_for(&BookQuery::Unfiltered)
            .starts_with("https://xyz.supabase.co/rest/v1/filtered_books?select="));
    }
}
