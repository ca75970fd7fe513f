use axum::{extract::Request, http::header::AUTHORIZATION, middleware::Next, response::Response};

use crate::error::ApiError;

/// Bearer gate.
///
/// Credential validation lives in the upstream authentication service; this
/// layer only requires that a bearer credential is present and trusts the
/// caller identity carried in the request itself.
pub async fn require_bearer(req: Request, next: Next) -> Result<Response, ApiError> {
    let authorized = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("Bearer ") && value.len() > "Bearer ".len())
        .unwrap_or(false);

    if !authorized {
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(req).await)
}
