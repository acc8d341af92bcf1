use axum::extract::{rejection::JsonRejection, FromRequest};

use crate::error::ApiError;

/// `axum::Json` with rejections rendered as [`ApiError`] bodies, so a
/// malformed or non-JSON payload yields a 400 with a `message` field.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(e) => ApiError::bad_request(e.body_text()),
            other => ApiError::invalid_json(other.body_text()),
        }
    }
}
