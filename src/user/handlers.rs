use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    extractors::{UserBody, UserId},
    models::UserModel,
    service::UserService,
    types::DeleteUserResponse,
};
use crate::shared::{AppError, AppState};

fn service(state: &AppState) -> UserService {
    UserService::new(Arc::clone(&state.user_repository))
}

/// GET /users
/// Returns every user in insertion order
#[instrument(name = "list_users", skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserModel>>, AppError> {
    let users = service(&state).list_users().await?;
    info!(user_count = users.len(), "Users listed successfully");
    Ok(Json(users))
}

/// GET /users/{id}
#[instrument(name = "get_user", skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Json<UserModel>, AppError> {
    let user = service(&state).get_user(id).await?;
    Ok(Json(user))
}

/// POST /users
/// Returns 201 with the stored user and a Location header pointing at it
#[instrument(name = "create_user", skip(state))]
pub async fn create_user(
    State(state): State<AppState>,
    UserBody(request): UserBody,
) -> Result<impl IntoResponse, AppError> {
    let user = service(&state).create_user(request).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, user.location())],
        Json(user),
    ))
}

/// PUT /users/{id}
#[instrument(name = "update_user", skip(state))]
pub async fn update_user(
    State(state): State<AppState>,
    UserId(id): UserId,
    UserBody(request): UserBody,
) -> Result<Json<UserModel>, AppError> {
    let user = service(&state).update_user(id, request).await?;
    Ok(Json(user))
}

/// DELETE /users/{id}
#[instrument(name = "delete_user", skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Json<DeleteUserResponse>, AppError> {
    let message = service(&state).delete_user(id).await?;
    Ok(Json(DeleteUserResponse { message }))
}
