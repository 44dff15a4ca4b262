//! Database entities

use sqlx::FromRow;

/// A full row of the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub password: String,
    pub picture: Vec<u8>,
    pub is_connected: bool,
    pub description: String,
}

/// A `users` row without the picture blob.
#[derive(Debug, Clone, FromRow)]
pub struct UserProfile {
    pub user_id: i64,
    pub username: String,
    pub password: String,
    pub is_connected: bool,
    pub description: String,
}

/// Values for a new `users` row.
///
/// Fields left as `None` are not written, so the column defaults apply.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub picture: Option<Vec<u8>>,
    pub is_connected: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Message {
    pub message_id: i64,
    pub sender: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender: String,
    pub message: String,
}
