use async_trait::async_trait;
use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use tracing::debug;

use super::types::UserRequest;
use crate::shared::AppError;

/// The `{id}` path segment; anything that is not an integer is a bad request
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub i64);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for UserId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                debug!(error = %e, "Rejected user id path segment");
                AppError::BadRequest("Invalid user ID.".to_string())
            })?;
        Ok(Self(id))
    }
}

/// JSON user payload whose rejections use the uniform error body
#[derive(Debug)]
pub struct UserBody(pub UserRequest);

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for UserBody {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<UserRequest>::from_request(req, state)
            .await
            .map_err(|e| {
                debug!(error = %e, "Rejected user payload");
                AppError::BadRequest(e.body_text())
            })?;
        Ok(Self(body))
    }
}
