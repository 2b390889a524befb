pub mod analysis;
pub mod book_search;
pub mod groq;
pub mod supabase;

// Re-export public types
pub use analysis::{AnalysisService, CompletionApi};
pub use book_search::{
    BookQuery, BookSearchService, BookStore, QueryOutcome, SearchOutcome, SearchPath,
};
pub use groq::GroqClient;
pub use supabase::SupabaseClient;
