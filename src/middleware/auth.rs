use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::ApiKeyAuthorizer;
use crate::error::ApiError;

/// API key middleware. Rejects the request with 401 before it reaches the
/// handler when the configured header does not carry the expected secret.
pub async fn require_api_key(
    State(authorizer): State<Arc<ApiKeyAuthorizer>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(e) = authorizer.authorize(request.headers()) {
        tracing::warn!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        return Err(e.into());
    }

    Ok(next.run(request).await)
}
