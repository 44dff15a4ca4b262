//! Implementations for the service the app needs.
//!

use crate::core::traits::UserService;
use crate::infrastructure::entities::{NewUser, User, UserProfile};
use crate::infrastructure::error::StoreError;
use crate::infrastructure::traits::UserRepository;
use async_trait::async_trait;
use di::{Ref, injectable};
use log::{debug, info, warn};

#[injectable(UserService)]
pub struct MyUserService {
    repo: Ref<dyn UserRepository>,
}

impl MyUserService {
    pub fn new(repo: Ref<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

fn note_missed_update(field: &str, username: &str, affected: u64) -> u64 {
    if affected == 0 {
        warn!("{field} update for unknown user {username:?} matched no rows");
    } else {
        debug!("updated {field} for {username:?}");
    }
    affected
}

#[async_trait]
impl UserService for MyUserService {
    async fn get_user(&self, username: &str, password: &str) -> Result<UserProfile, StoreError> {
        self.repo.find_by_credentials(username, password).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<UserProfile, StoreError> {
        self.repo.find_by_username(username).await
    }

    async fn list_usernames(&self) -> Result<Vec<String>, StoreError> {
        self.repo.list_usernames().await
    }

    async fn get_picture(&self, username: &str) -> Result<Vec<u8>, StoreError> {
        self.repo.find_picture(username).await
    }

    async fn register(&self, user: NewUser) -> Result<User, StoreError> {
        let user = self.repo.create_user(user).await?;
        info!("registered user {:?} with id {}", user.username, user.user_id);
        Ok(user)
    }

    async fn update_picture(&self, username: &str, picture: Vec<u8>) -> Result<u64, StoreError> {
        let affected = self.repo.update_picture(username, picture).await?;
        Ok(note_missed_update("picture", username, affected))
    }

    async fn update_connection_status(
        &self,
        username: &str,
        is_connected: bool,
    ) -> Result<u64, StoreError> {
        let affected = self
            .repo
            .update_connection_status(username, is_connected)
            .await?;
        Ok(note_missed_update("connection status", username, affected))
    }

    async fn update_description(
        &self,
        username: &str,
        description: String,
    ) -> Result<u64, StoreError> {
        let affected = self.repo.update_description(username, description).await?;
        Ok(note_missed_update("description", username, affected))
    }
}
