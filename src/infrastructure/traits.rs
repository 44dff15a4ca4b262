//! Infrastructure traits, used for DI on higher levels

use crate::infrastructure::entities;
use crate::infrastructure::error::StoreError;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds the user whose username and password both match exactly.
    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<entities::UserProfile, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<entities::UserProfile, StoreError>;

    async fn find_picture(&self, username: &str) -> Result<Vec<u8>, StoreError>;

    /// All usernames, in insertion order.
    async fn list_usernames(&self) -> Result<Vec<String>, StoreError>;

    async fn create_user(&self, user: entities::NewUser) -> Result<entities::User, StoreError>;

    // The update methods return the number of rows they touched.

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

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create_message(
        &self,
        message: entities::NewMessage,
    ) -> Result<entities::Message, StoreError>;

    async fn list_messages_from(&self, sender: &str) -> Result<Vec<entities::Message>, StoreError>;
}
