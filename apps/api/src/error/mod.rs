use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Completion service error: {0}")]
    CompletionFailed(String),

    #[error("Database query failed: {0}")]
    DatabaseQueryFailed(String),

    #[error("Invalid response format from database: {0}")]
    InvalidDatabaseResponse(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl ApiError {
    /// The message written to the response body. Upstream detail never leaves the server.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::InvalidInput(msg) => msg.clone(),
            ApiError::NotFound(_) => "Not found".to_string(),
            ApiError::CompletionFailed(_) => "AI analysis failed".to_string(),
            ApiError::DatabaseQueryFailed(_) => "Database query failed".to_string(),
            ApiError::InvalidDatabaseResponse(_) => {
                "Invalid response format from database".to_string()
            }
            ApiError::ExternalServiceError(_)
            | ApiError::SerializationError(_)
            | ApiError::InternalError(_) => "Internal server error".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.public_message(),
        })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::ExternalServiceError(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}
