//! Catch-all responses: unknown routes, bad request bodies, and any error
//! status that left a handler without a JSON body.

use actix_files::NamedFile;
use actix_web::{
    body::MessageBody,
    dev::ServiceResponse,
    error::JsonPayloadError,
    http::{
        header::{self, HeaderValue},
        StatusCode,
    },
    middleware::{ErrorHandlerResponse, ErrorHandlers},
    web, HttpRequest, HttpResponse,
};
use std::path::Path;

use crate::{config::Config, error::ApiError};

/// Request bodies above this size are rejected.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_BODY_BYTES)
        .error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::InvalidInput(format!("Invalid request body: {}", err)).into()
}

pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound(req.path().to_string()))
}

/// `GET /` serves the landing page from the static directory.
pub async fn landing_page(config: web::Data<Config>) -> Result<NamedFile, ApiError> {
    let path = Path::new(&config.static_dir).join("landing.html");
    NamedFile::open_async(&path)
        .await
        .map_err(|_| ApiError::NotFound(path.display().to_string()))
}

pub fn error_handlers<B: MessageBody + 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().default_handler(render_json_error)
}

fn is_json(res: &ServiceResponse<impl MessageBody>) -> bool {
    res.response()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

fn error_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::INTERNAL_SERVER_ERROR => "Internal server error",
        StatusCode::NOT_FOUND => "Not found",
        StatusCode::METHOD_NOT_ALLOWED => "Method not allowed",
        StatusCode::PAYLOAD_TOO_LARGE => "Payload too large",
        status => status.canonical_reason().unwrap_or("Request failed"),
    }
}

/// Give every 4xx/5xx that is not already JSON a `{"error": ...}` body.
fn render_json_error<B: MessageBody + 'static>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    if is_json(&res) {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let status = res.status();
    if status.is_server_error() {
        log::error!("Unhandled error on {}", res.request().path());
    }

    let body = serde_json::json!({ "error": error_message(status) }).to_string();

    let (req, res) = res.into_parts();
    let mut res = res.set_body(body);
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    let res = ServiceResponse::new(req, res)
        .map_into_boxed_body()
        .map_into_right_body();

    Ok(ErrorHandlerResponse::Response(res))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    async fn explode() -> HttpResponse {
        HttpResponse::InternalServerError().body("stack trace with secrets")
    }

    async fn typed_failure() -> Result<HttpResponse, ApiError> {
        Err(ApiError::DatabaseQueryFailed("503".to_string()))
    }

    #[actix_web::test]
    async fn test_plain_500_is_rewritten_as_json() {
        let app = test::init_service(
            App::new()
                .wrap(error_handlers())
                .route("/boom", web::get().to(explode)),
        )
        .await;

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/boom").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "error": "Internal server error" }));
    }

    #[actix_web::test]
    async fn test_json_500_is_left_alone() {
        let app = test::init_service(
            App::new()
                .wrap(error_handlers())
                .route("/db", web::get().to(typed_failure)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/db").to_request()).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Database query failed");
    }

    #[actix_web::test]
    async fn test_wrong_method_gets_json_405() {
        let app = test::init_service(
            App::new()
                .wrap(error_handlers())
                .service(web::resource("/only-post").route(web::post().to(explode))),
        )
        .await;

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/only-post").to_request()).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "error": "Method not allowed" }));
    }
}
