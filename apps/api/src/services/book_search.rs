use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{ApiError, Result};
use crate::models::{is_valid_record, matches_any_genre, BookRecord};

/// The two queries the search strategy can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookQuery {
    /// Server-side OR of sub-genre matches.
    ByGenres(Vec<String>),
    /// No genre filter; matching happens locally.
    Unfiltered,
}

/// Result of a single outbound query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows(Vec<Value>),
    /// The service answered with a non-success status.
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait BookStore: Send + Sync {
    async fn fetch_books(&self, query: &BookQuery) -> Result<QueryOutcome>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPath {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub path: SearchPath,
    pub books: Vec<BookRecord>,
}

/// Keep rows that are complete, have real highlights and match a requested genre.
///
/// Input order is preserved. Rows that do not deserialize are dropped.
pub fn filter_rows(rows: Vec<Value>, genres: &[String]) -> Vec<BookRecord> {
    rows.into_iter()
        .filter_map(|row| serde_json::from_value::<BookRecord>(row).ok())
        .filter(is_valid_record)
        .filter(|book| matches_any_genre(book, genres))
        .collect()
}

/// Genre search with a single unfiltered retry.
#[derive(Clone)]
pub struct BookSearchService {
    store: Arc<dyn BookStore>,
}

impl BookSearchService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Run the filtered query; fall back only when the service rejects it.
    ///
    /// An empty result from the primary query is a valid answer and does not
    /// trigger the fallback.
    pub async fn search(&self, genres: &[String]) -> Result<SearchOutcome> {
        let primary = BookQuery::ByGenres(genres.to_vec());

        match self.store.fetch_books(&primary).await? {
            QueryOutcome::Rows(rows) => {
                let fetched = rows.len();
                let books = filter_rows(rows, genres);
                debug!("Primary query returned {} rows, kept {}", fetched, books.len());
                Ok(SearchOutcome {
                    path: SearchPath::Primary,
                    books,
                })
            }
            QueryOutcome::Rejected { status, .. } => {
                warn!(
                    "Genre query rejected with status {}, retrying without genre filter",
                    status
                );
                let books = self.search_unfiltered(genres).await?;
                Ok(SearchOutcome {
                    path: SearchPath::Fallback,
                    books,
                })
            }
        }
    }

    /// Fetch a broad page of books and apply the genre match locally.
    pub async fn search_unfiltered(&self, genres: &[String]) -> Result<Vec<BookRecord>> {
        match self.store.fetch_books(&BookQuery::Unfiltered).await? {
            QueryOutcome::Rows(rows) => {
                let fetched = rows.len();
                let books = filter_rows(rows, genres);
                info!("Fallback query returned {} rows, kept {}", fetched, books.len());
                Ok(books)
            }
            QueryOutcome::Rejected { status, body } => Err(ApiError::DatabaseQueryFailed(
                format!("fallback query returned status {}: {}", status, body),
            )),
        }
    }
}
