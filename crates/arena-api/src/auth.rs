//! API key authentication
//!
//! A lookup miss is reported as `AuthenticationFailure`, never `NotFound`.

use arena_core::models::User;
use arena_core::AppError;
use arena_db::Users;
use axum::http::HeaderMap;

use crate::constants::API_KEY_HEADER;

pub async fn authenticate(users: &dyn Users, headers: &HeaderMap) -> Result<User, AppError> {
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            tracing::debug!("Request has no API key");
            AppError::AuthenticationFailure
        })?;

    match users.find_by_api_key(api_key).await {
        Ok(user) => {
            tracing::debug!(user_id = %user.id, "API key authenticated");
            Ok(user)
        }
        Err(AppError::NotFound(_)) => Err(AppError::AuthenticationFailure),
        Err(other) => Err(other),
    }
}
