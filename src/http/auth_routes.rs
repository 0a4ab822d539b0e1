//! Registration, login/logout and account maintenance.

use crate::auth;
use crate::error::{AppError, AppResult, RepositoryError};
use crate::http::extract::AuthUser;
use crate::http::read_multipart;
use crate::models::{User, UserRole};
use crate::repositories::{NewUser, UserUpdate};
use crate::uploads;
use crate::AppState;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Redirect};
use axum::{Form, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// `POST /auth/register` — create an account and redirect to the feed
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> AppResult<Redirect> {
    if form.username.trim().is_empty() {
        return Err(AppError::Validation("username is required".to_string()));
    }
    if form.email.trim().is_empty() {
        return Err(AppError::Validation("email is required".to_string()));
    }
    if form.password.is_empty() {
        return Err(AppError::Validation("password is required".to_string()));
    }

    let role = match form.role.as_deref() {
        None | Some("") => UserRole::Owner,
        Some(r) => UserRole::from_str(r).map_err(AppError::Validation)?,
    };

    let password_hash = auth::hash_password(&form.password)?;

    let result = state
        .user_repo
        .create(NewUser {
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            password_hash,
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            profile_photo: None,
            role: role.as_str().to_string(),
        })
        .await;

    let user = match result {
        Ok(user) => user,
        Err(RepositoryError::Duplicate(_)) => {
            return Err(AppError::Validation(format!(
                "user {} is already registered",
                form.username.trim()
            )));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, username = %user.username, role = %user.role, "user registered");
    Ok(Redirect::to("/"))
}

/// `POST /auth/login` — verify credentials, issue a session cookie
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<impl IntoResponse> {
    let user = state
        .user_repo
        .find_by_username(form.username.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized("incorrect username".to_string()))?;

    if !auth::verify_password(&form.password, &user.password_hash) {
        return Err(AppError::Unauthorized("incorrect password".to_string()));
    }

    // Any previous sessions for this account are dropped, and expired
    // sessions from other accounts swept while we are at it
    state.session_repo.delete_for_user(user.id).await?;
    state
        .session_repo
        .delete_expired(Utc::now().naive_utc())
        .await?;

    let token = auth::new_session_token();
    state
        .session_repo
        .create(user.id, &token, auth::session_expiry())
        .await?;

    info!(user_id = user.id, username = %user.username, "user logged in");

    Ok((
        [(header::SET_COOKIE, auth::session_cookie(&token))],
        Redirect::to("/"),
    ))
}

/// `POST /auth/logout` — drop the session and clear the cookie
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    if let Some(token) = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(auth::token_from_cookie_header)
    {
        state.session_repo.delete(&token).await?;
    }

    Ok((
        [(header::SET_COOKIE, auth::clear_session_cookie())],
        Redirect::to("/"),
    ))
}

/// `GET /auth/account` — the logged-in user's profile
pub async fn account(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

/// `POST /auth/account` — multipart update of profile fields, optional new
/// password and optional profile photo
pub async fn update_account(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let form = read_multipart(multipart, "profile_photo").await?;

    let profile_photo = match &form.file {
        Some((filename, bytes)) => {
            Some(uploads::save_upload(&state.config.upload.dir, filename, bytes).await?)
        }
        None => None,
    };

    let password_hash = match form.get("password") {
        Some(password) => Some(auth::hash_password(password)?),
        None => None,
    };

    let update = UserUpdate {
        username: form.get("username").map(str::to_string),
        email: form.get("email").map(str::to_string),
        first_name: form.get("first_name").map(str::to_string),
        last_name: form.get("last_name").map(str::to_string),
        profile_photo,
        password_hash,
    };

    match state.user_repo.update(user.id, update).await {
        Ok(()) => {}
        Err(RepositoryError::Duplicate(_)) => {
            return Err(AppError::Validation("username is already taken".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    info!(user_id = user.id, "account updated");
    Ok(Redirect::to("/"))
}
