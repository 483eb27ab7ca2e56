use crate::models::{ErrorDetail, ErrorResponse};
use axum::{
    Json,
    body::Bytes,
    extract::{
        FromRequest, Request,
        rejection::{BytesRejection, JsonRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body was rejected by the JSON extractor; carries the status axum picked.
    #[error("{message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error("No route for {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody { status, .. } => *status,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidBody { .. } => "validation_error",
            ApiError::NotFound(_) => "not_found",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        info!("Rejecting request with {}: {}", status, self);
        let error_response = ErrorResponse {
            error: ErrorDetail {
                message: self.to_string(),
                r#type: "invalid_request_error".to_string(),
                code: Some(self.code().to_string()),
            },
        };
        (status, Json(error_response)).into_response()
    }
}

/// `Json` extractor whose rejections render as an `ErrorResponse`.
///
/// Missing or mistyped fields give 422, malformed JSON 400 and a non-JSON
/// content type 415, following axum's own classification. A body sent
/// without any `Content-Type` is parsed as JSON.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if req.headers().contains_key(header::CONTENT_TYPE) {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            return Ok(ValidJson(value));
        }
        let bytes = Bytes::from_request(req, state).await?;
        let Json(value) = Json::<T>::from_bytes(&bytes)?;
        Ok(ValidJson(value))
    }
}
