use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not JSON, or lacks a string `text` field (422)
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] JsonRejection),

    /// The model failed on this input (500)
    #[error("Inference failed: {0}")]
    Inference(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::InvalidRequest(ref rejection) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_REQUEST",
                rejection.body_text(),
            ),
            ApiError::Inference(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INFERENCE_FAILED",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
