use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

use super::models::UserModel;
use crate::shared::AppError;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    /// All users in insertion order
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError>;
    async fn get_user(&self, id: i64) -> Result<Option<UserModel>, AppError>;

    /// Stores a new user under the next identifier and returns the stored record
    async fn insert_user(&self, name: &str) -> Result<UserModel, AppError>;

    /// Replaces the name of an existing user; `None` if the id is unknown
    async fn update_user(&self, id: i64, name: &str) -> Result<Option<UserModel>, AppError>;

    /// Removes a user and returns it; `None` if the id is unknown
    async fn delete_user(&self, id: i64) -> Result<Option<UserModel>, AppError>;
}

struct UserTable {
    users: Vec<UserModel>,
    // Highest id ever assigned; ids are never reused after deletion
    last_id: i64,
}

/// In-memory implementation of UserRepository.
///
/// All reads and writes go through one mutex, so concurrent creates cannot
/// race on id assignment. Data is lost when the process exits.
pub struct InMemoryUserRepository {
    table: Mutex<UserTable>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    /// Creates an in-memory repository with pre-populated users
    pub fn with_users(users: Vec<UserModel>) -> Self {
        let last_id = users.iter().map(|u| u.id).max().unwrap_or(0);
        Self {
            table: Mutex::new(UserTable { users, last_id }),
        }
    }

    /// The two records the service starts with unless seeding is disabled
    pub fn seeded() -> Self {
        Self::with_users(vec![UserModel::new(1, "Harry"), UserModel::new(2, "Gary")])
    }

    fn lock(&self) -> Result<MutexGuard<'_, UserTable>, AppError> {
        self.table
            .lock()
            .map_err(|e| AppError::Internal(format!("User table lock poisoned: {e}")))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        let table = self.lock()?;
        debug!(user_count = table.users.len(), "Listing all users in memory");
        Ok(table.users.clone())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: i64) -> Result<Option<UserModel>, AppError> {
        debug!(user_id = id, "Fetching user from memory");

        let table = self.lock()?;
        let user = table.users.iter().find(|u| u.id == id).cloned();

        match &user {
            Some(u) => debug!(user_id = id, name = %u.name, "User found in memory"),
            None => debug!(user_id = id, "User not found in memory"),
        }

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn insert_user(&self, name: &str) -> Result<UserModel, AppError> {
        let mut table = self.lock()?;
        table.last_id += 1;
        let user = UserModel::new(table.last_id, name);
        table.users.push(user.clone());

        debug!(user_id = user.id, name = %user.name, "User created in memory");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn update_user(&self, id: i64, name: &str) -> Result<Option<UserModel>, AppError> {
        let mut table = self.lock()?;
        let Some(user) = table.users.iter_mut().find(|u| u.id == id) else {
            warn!(user_id = id, "User not found for update in memory");
            return Ok(None);
        };
        user.name = name.to_string();

        debug!(user_id = id, name = %user.name, "User updated in memory");
        Ok(Some(user.clone()))
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: i64) -> Result<Option<UserModel>, AppError> {
        let mut table = self.lock()?;
        let Some(index) = table.users.iter().position(|u| u.id == id) else {
            warn!(user_id = id, "User not found for deletion in memory");
            return Ok(None);
        };
        let user = table.users.remove(index);

        debug!(user_id = id, "User deleted from memory");
        Ok(Some(user))
    }
}
