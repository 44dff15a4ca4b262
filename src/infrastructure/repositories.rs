//! DB Repository abstractions

use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{Message, NewMessage, NewUser, User, UserProfile};
use crate::infrastructure::error::StoreError;
use crate::infrastructure::traits::{MessageRepository, UserRepository};
use async_trait::async_trait;
use di::{Ref, injectable};
use sqlx::{QueryBuilder, Sqlite};

#[injectable(UserRepository)]
pub struct DbUserRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbUserRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl UserRepository for DbUserRepository {
    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserProfile, StoreError> {
        sqlx::query_as(
            "SELECT user_id, username, password, is_connected, description FROM users WHERE username = ? AND password = ?",
        )
        .bind(username)
        .bind(password)
        .fetch_optional(&**self.connection)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn find_by_username(&self, username: &str) -> Result<UserProfile, StoreError> {
        sqlx::query_as(
            "SELECT user_id, username, password, is_connected, description FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&**self.connection)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn find_picture(&self, username: &str) -> Result<Vec<u8>, StoreError> {
        sqlx::query_scalar("SELECT picture FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&**self.connection)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn list_usernames(&self) -> Result<Vec<String>, StoreError> {
        Ok(
            sqlx::query_scalar("SELECT username FROM users ORDER BY user_id ASC")
                .fetch_all(&**self.connection)
                .await?,
        )
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut builder = QueryBuilder::<Sqlite>::new("INSERT INTO users (username, password");
        if user.picture.is_some() {
            builder.push(", picture");
        }
        if user.is_connected.is_some() {
            builder.push(", is_connected");
        }
        if user.description.is_some() {
            builder.push(", description");
        }
        builder.push(") VALUES (");

        let mut values = builder.separated(", ");
        values.push_bind(user.username);
        values.push_bind(user.password);
        if let Some(picture) = user.picture {
            values.push_bind(picture);
        }
        if let Some(is_connected) = user.is_connected {
            values.push_bind(is_connected);
        }
        if let Some(description) = user.description {
            values.push_bind(description);
        }
        values.push_unseparated(") RETURNING *");

        Ok(builder
            .build_query_as::<User>()
            .fetch_one(&**self.connection)
            .await?)
    }

    async fn update_picture(&self, username: &str, picture: Vec<u8>) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE users SET picture = ? WHERE username = ?")
            .bind(picture)
            .bind(username)
            .execute(&**self.connection)
            .await?;

        Ok(result.rows_affected())
    }

    async fn update_connection_status(
        &self,
        username: &str,
        is_connected: bool,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE users SET is_connected = ? WHERE username = ?")
            .bind(is_connected)
            .bind(username)
            .execute(&**self.connection)
            .await?;

        Ok(result.rows_affected())
    }

    async fn update_description(
        &self,
        username: &str,
        description: String,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE users SET description = ? WHERE username = ?")
            .bind(description)
            .bind(username)
            .execute(&**self.connection)
            .await?;

        Ok(result.rows_affected())
    }
}

#[injectable(MessageRepository)]
pub struct DbMessageRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbMessageRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl MessageRepository for DbMessageRepository {
    async fn create_message(&self, message: NewMessage) -> Result<Message, StoreError> {
        Ok(
            sqlx::query_as("INSERT INTO messages (sender, message) VALUES (?, ?) RETURNING *")
                .bind(message.sender)
                .bind(message.message)
                .fetch_one(&**self.connection)
                .await?,
        )
    }

    async fn list_messages_from(&self, sender: &str) -> Result<Vec<Message>, StoreError> {
        Ok(sqlx::query_as(
            "SELECT message_id, sender, message FROM messages WHERE sender = ? ORDER BY message_id ASC",
        )
        .bind(sender)
        .fetch_all(&**self.connection)
        .await?)
    }
}
