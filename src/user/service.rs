use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{models::UserModel, repository::UserRepository, types::UserRequest};
use crate::shared::AppError;

const INVALID_ID: &str = "Invalid user ID.";
const EMPTY_NAME: &str = "User name cannot be empty.";
const NOT_FOUND: &str = "User ID not found.";

/// Service for handling user business logic: input checks and lookup misses
/// become typed errors, storage is delegated to the repository
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        self.repository.list_users().await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: i64) -> Result<UserModel, AppError> {
        let id = validate_id(id)?;
        self.repository
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn create_user(&self, request: UserRequest) -> Result<UserModel, AppError> {
        let name = validate_name(&request.name)?;
        let user = self.repository.insert_user(name).await?;

        info!(user_id = user.id, name = %user.name, "User created");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn update_user(&self, id: i64, request: UserRequest) -> Result<UserModel, AppError> {
        let id = validate_id(id)?;
        let name = validate_name(&request.name)?;

        let user = self
            .repository
            .update_user(id, name)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

        info!(user_id = user.id, name = %user.name, "User updated");
        Ok(user)
    }

    /// Deletes a user and returns the confirmation message
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> Result<String, AppError> {
        let id = validate_id(id)?;

        let user = self
            .repository
            .delete_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

        info!(user_id = user.id, "User deleted");
        Ok(format!(
            "Successfully deleted name: {}, id: {}",
            user.name, user.id
        ))
    }
}

fn validate_id(id: i64) -> Result<i64, AppError> {
    if id <= 0 {
        warn!(user_id = id, "Rejected non-positive user id");
        return Err(AppError::BadRequest(INVALID_ID.to_string()));
    }
    Ok(id)
}

/// Names are stored as given; only blank names are rejected
fn validate_name(name: &str) -> Result<&str, AppError> {
    if name.trim().is_empty() {
        warn!("Rejected empty user name");
        return Err(AppError::BadRequest(EMPTY_NAME.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::repository::InMemoryUserRepository;
    use rstest::rstest;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    fn request(name: &str) -> UserRequest {
        UserRequest {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let service = service();

        let created = service.create_user(request("Alice")).await.unwrap();
        let fetched = service.get_user(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Alice");
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    #[tokio::test]
    async fn test_non_positive_ids_are_bad_requests(#[case] id: i64) {
        let service = service();

        assert!(matches!(service.get_user(id).await, Err(AppError::BadRequest(_))));
        assert!(matches!(
            service.update_user(id, request("x")).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(service.delete_user(id).await, Err(AppError::BadRequest(_))));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    #[tokio::test]
    async fn test_blank_names_are_rejected(#[case] name: &str) {
        let service = service();
        assert!(matches!(
            service.create_user(request(name)).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(service.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_leaves_name_unchanged() {
        let service = service();
        let user = service.create_user(request("Alice")).await.unwrap();

        let result = service.update_user(user.id, request("")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(service.get_user(user.id).await.unwrap().name, "Alice");
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let service = service();
        let user = service.create_user(request("Alice")).await.unwrap();

        let updated = service.update_user(user.id, request("Alicia")).await.unwrap();
        assert_eq!(updated, UserModel::new(user.id, "Alicia"));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let service = service();
        let user = service.create_user(request("Alice")).await.unwrap();

        let message = service.delete_user(user.id).await.unwrap();
        assert_eq!(message, "Successfully deleted name: Alice, id: 1");
        assert!(matches!(service.get_user(user.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete_user(user.id).await, Err(AppError::NotFound(_))));
    }
}
