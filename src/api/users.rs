//! User endpoints

use crate::api::AvatarUpload;
use crate::api::error::ApiError;
use crate::api::users::schemas::{
    ConnectionStatusQuery, CredentialsQuery, DescriptionQuery, UserInput, UserWithoutPicture,
};
use crate::core::traits::UserService;
use crate::infrastructure::entities::NewUser;
use async_stream::stream;
use axum::body::{Body, Bytes};
use axum::extract::{Path, Query};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use di_axum::Inject;
use std::convert::Infallible;

pub fn router() -> Router {
    Router::new()
        .route("/users/username", get(list_usernames))
        .route("/register", post(register))
        .route(
            "/user/:username",
            get(get_user)
                .put(update_picture)
                .patch(update_connection_status),
        )
        .route("/user/:username/picture", get(get_picture))
        .route("/user/:username/creation-date", get(get_creation_date))
        .route("/user/:username/description", patch(update_description))
}

async fn get_user(
    Inject(user_service): Inject<dyn UserService>,
    Path(username): Path<String>,
    Query(credentials): Query<CredentialsQuery>,
) -> Result<Json<UserWithoutPicture>, ApiError> {
    let user = user_service
        .get_user(&username, &credentials.password)
        .await?;

    Ok(Json(user.into()))
}

async fn list_usernames(
    Inject(user_service): Inject<dyn UserService>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(user_service.list_usernames().await?))
}

async fn get_picture(
    Inject(user_service): Inject<dyn UserService>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let picture = user_service.get_picture(&username).await?;

    // Sent as one chunk; an empty picture yields an empty body.
    let body = stream! {
        yield Ok::<_, Infallible>(Bytes::from(picture));
    };

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        Body::from_stream(body),
    ))
}

/// Same lookup as [`get_user`] without the password. There is no creation
/// timestamp in the schema, so this returns the user's profile.
async fn get_creation_date(
    Inject(user_service): Inject<dyn UserService>,
    Path(username): Path<String>,
) -> Result<Json<UserWithoutPicture>, ApiError> {
    let user = user_service.get_user_by_username(&username).await?;

    Ok(Json(user.into()))
}

async fn register(
    Inject(user_service): Inject<dyn UserService>,
    Json(user): Json<UserInput>,
) -> Result<StatusCode, ApiError> {
    let new_user = NewUser::try_from(user)
        .map_err(|e| ApiError::BadRequest(format!("picture is not valid base64: {e}")))?;

    user_service.register(new_user).await?;

    Ok(StatusCode::OK)
}

async fn update_picture(
    Inject(user_service): Inject<dyn UserService>,
    Path(username): Path<String>,
    AvatarUpload(picture): AvatarUpload,
) -> Result<StatusCode, ApiError> {
    user_service
        .update_picture(&username, picture.to_vec())
        .await?;

    Ok(StatusCode::OK)
}

async fn update_connection_status(
    Inject(user_service): Inject<dyn UserService>,
    Path(username): Path<String>,
    Query(status): Query<ConnectionStatusQuery>,
) -> Result<StatusCode, ApiError> {
    user_service
        .update_connection_status(&username, status.is_connected)
        .await?;

    Ok(StatusCode::OK)
}

async fn update_description(
    Inject(user_service): Inject<dyn UserService>,
    Path(username): Path<String>,
    Query(query): Query<DescriptionQuery>,
) -> Result<StatusCode, ApiError> {
    user_service
        .update_description(&username, query.description)
        .await?;

    Ok(StatusCode::OK)
}

pub mod schemas {
    use crate::infrastructure::entities;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize};

    /// Registration payload: every user field except the id.
    ///
    /// Optional fields left out of the payload take the column defaults.
    #[derive(Deserialize, Debug)]
    pub struct UserInput {
        pub username: String,
        pub password: String,
        /// Base64-encoded avatar.
        pub picture: Option<String>,
        pub is_connected: Option<bool>,
        pub description: Option<String>,
    }

    impl TryFrom<UserInput> for entities::NewUser {
        type Error = base64::DecodeError;

        fn try_from(input: UserInput) -> Result<Self, Self::Error> {
            let picture = input
                .picture
                .map(|encoded| STANDARD.decode(encoded))
                .transpose()?;

            Ok(entities::NewUser {
                username: input.username,
                password: input.password,
                picture,
                is_connected: input.is_connected,
                description: input.description,
            })
        }
    }

    /// Every user field except the id and the picture.
    #[derive(Serialize, Debug, PartialEq, Eq)]
    pub struct UserWithoutPicture {
        pub username: String,
        pub password: String,
        pub is_connected: bool,
        pub description: String,
    }

    impl From<entities::UserProfile> for UserWithoutPicture {
        fn from(user: entities::UserProfile) -> Self {
            UserWithoutPicture {
                username: user.username,
                password: user.password,
                is_connected: user.is_connected,
                description: user.description,
            }
        }
    }

    #[derive(Deserialize, Debug)]
    pub struct CredentialsQuery {
        pub password: String,
    }

    #[derive(Deserialize, Debug)]
    pub struct ConnectionStatusQuery {
        #[serde(deserialize_with = "lenient_bool")]
        pub is_connected: bool,
    }

    /// Accepts the usual query-string spellings of a boolean, ignoring case:
    /// `true/false`, `1/0`, `yes/no`, `y/n`, `on/off`, `t/f`.
    fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" | "on" | "t" => Ok(true),
            "false" | "0" | "no" | "n" | "off" | "f" => Ok(false),
            _ => Err(D::Error::custom(format!("{raw:?} is not a boolean"))),
        }
    }

    #[derive(Deserialize, Debug)]
    pub struct DescriptionQuery {
        pub description: String,
    }

}
