use crate::api::error::ApiError;
use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

pub mod error;
pub mod users;

const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Multipart form field carrying the avatar.
pub const AVATAR_FIELD: &str = "file";

/// Avatar bytes from either a `multipart/form-data` body (field `file`) or the
/// raw request body.
#[derive(Debug)]
pub struct AvatarUpload(pub Bytes);

#[async_trait]
impl<S> FromRequest<S> for AvatarUpload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Response> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_multipart_form_data);

        if !is_multipart {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(AvatarUpload(bytes));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()).into_response())?
        {
            if field.name() == Some(AVATAR_FIELD) {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()).into_response())?;
                return Ok(AvatarUpload(bytes));
            }
        }

        Err(
            ApiError::BadRequest(format!("multipart field `{AVATAR_FIELD}` is missing"))
                .into_response(),
        )
    }
}

/// Media types compare case-insensitively.
fn is_multipart_form_data(content_type: &str) -> bool {
    content_type
        .get(..MULTIPART_FORM_DATA.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(MULTIPART_FORM_DATA))
}
