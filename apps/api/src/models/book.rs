use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Highlights must be strictly longer than this after trimming.
pub const MIN_HIGHLIGHTS_LEN: usize = 10;

/// A row of the books table, as projected by the search queries.
///
/// Every field is optional on the way in; rows are only handed back to callers
/// once [`is_valid_record`] holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub highlights: Option<String>,
    #[serde(rename = "sub-genre", default)]
    pub sub_genre: Option<String>,
}

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|value| !value.is_empty())
}

/// Title, author, highlights and sub-genre are all set and non-empty.
pub fn has_required_fields(book: &BookRecord) -> bool {
    present(&book.title)
        && present(&book.author)
        && present(&book.highlights)
        && present(&book.sub_genre)
}

/// Length is counted in UTF-16 code units, the way browsers measure strings.
pub fn has_substantial_highlights(book: &BookRecord) -> bool {
    book.highlights
        .as_deref()
        .is_some_and(|text| text.trim().encode_utf16().count() > MIN_HIGHLIGHTS_LEN)
}

pub fn is_valid_record(book: &BookRecord) -> bool {
    has_required_fields(book) && has_substantial_highlights(book)
}

/// Case-insensitive substring match of the sub-genre against any requested genre.
///
/// "war" matches "Warm Romance"; the match is deliberately loose.
pub fn matches_any_genre(book: &BookRecord, genres: &[String]) -> bool {
    let Some(sub_genre) = book.sub_genre.as_deref() else {
        return false;
    };
    let sub_genre = sub_genre.to_lowercase();

    genres
        .iter()
        .any(|genre| sub_genre.contains(&genre.to_lowercase()))
}
