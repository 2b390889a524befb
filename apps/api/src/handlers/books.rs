use crate::{error::ApiError, models::SearchRequest, services::BookSearchService};
use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use log::info;

pub fn books_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/books/search").route(web::post().to(search_books)));
}

/// Search books by genre tags.
pub async fn search_books(
    request: Json<SearchRequest>,
    book_search_service: web::Data<BookSearchService>,
) -> Result<HttpResponse, ApiError> {
    let genres = request.validated_genres()?;

    let outcome = book_search_service.search(&genres).await?;
    info!(
        "Books search for {:?} returned {} books via {:?} query",
        genres,
        outcome.books.len(),
        outcome.path
    );

    Ok(HttpResponse::Ok().json(outcome.books))
}
