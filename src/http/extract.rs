//! Session extractors: resolve the session cookie to a user row before the
//! handler runs, the axum rendition of loading the logged-in user on every
//! request.

use crate::auth;
use crate::error::AppError;
use crate::models::User;
use crate::AppState;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use chrono::Utc;

/// The logged-in user, if any. Never rejects.
pub struct OptionalUser(pub Option<User>);

/// The logged-in user; rejects with 401 when there is no valid session.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(cookie_header) = parts
            .headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
        else {
            return Ok(OptionalUser(None));
        };

        let Some(token) = auth::token_from_cookie_header(cookie_header) else {
            return Ok(OptionalUser(None));
        };

        let now = Utc::now().naive_utc();
        let Some(session) = state.session_repo.find_valid(&token, now).await? else {
            return Ok(OptionalUser(None));
        };

        let user = state.user_repo.find_by_id(session.user_id).await?;
        Ok(OptionalUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let OptionalUser(user) = OptionalUser::from_request_parts(parts, state).await?;
        user.map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("login required".to_string()))
    }
}
