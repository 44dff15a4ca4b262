//! DI "Interfaces"

use crate::infrastructure::entities;
use crate::infrastructure::error::StoreError;
use async_trait::async_trait;

#[async_trait]
pub trait UserService: Send + Sync {
    /// Looks a user up by username and plaintext password.
    ///
    /// Returns `StoreError::NotFound` unless both match the same record.
    async fn get_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<entities::UserProfile, StoreError>;

    /// Looks a user up by username alone.
    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<entities::UserProfile, StoreError>;

    async fn list_usernames(&self) -> Result<Vec<String>, StoreError>;

    /// Returns the raw avatar bytes, which are empty if none was ever uploaded.
    async fn get_picture(&self, username: &str) -> Result<Vec<u8>, StoreError>;

    /// Registers a new user.
    ///
    /// Returns `StoreError::Conflict` if the username is taken.
    async fn register(&self, user: entities::NewUser) -> Result<entities::User, StoreError>;

    // Updates below succeed even when no user has the given name; the returned
    // count is zero in that case.

    async fn update_picture(&self, username: &str, picture: Vec<u8>) -> Result<u64, StoreError>;

    async fn update_connection_status(
        &self,
        username: &str,
        is_connected: bool,
    ) -> Result<u64, StoreError>;

    async fn update_description(
        &self,
        username: &str,
        description: String,
    ) -> Result<u64, StoreError>;
}
