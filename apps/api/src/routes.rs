use actix_files::Files;
use actix_web::{
    dev::{fn_service, ServiceRequest, ServiceResponse},
    web, ResponseError, Scope,
};

use crate::error::ApiError;
use crate::handlers::{analyze_config, books_config, health_check, landing_page, not_found};

/// Configure all routes for the API
pub fn api_routes() -> Scope {
    web::scope("/api")
        .service(health_check)
        .configure(analyze_config)
        .configure(books_config)
        .default_service(web::to(not_found))
}

/// Landing page at `/` and every other file under `static_dir`.
///
/// Must be registered after the API scope since it claims the whole path space.
pub fn static_routes(cfg: &mut web::ServiceConfig, static_dir: &str) {
    cfg.service(web::resource("/").route(web::get().to(landing_page)))
        .service(
            Files::new("/", static_dir).default_handler(fn_service(
                |req: ServiceRequest| async move {
                    let (req, _) = req.into_parts();
                    let res = ApiError::NotFound(req.path().to_string()).error_response();
                    Ok::<_, actix_web::Error>(ServiceResponse::new(req, res))
                },
            )),
        );
}
