//! HTTP surface: router assembly, session extractors, and the form-encoded
//! route handlers. Successful mutations answer with a 303 redirect; GETs
//! answer JSON; errors map through `AppError::status_code`.

pub mod auth_routes;
pub mod extract;
pub mod offer_routes;
pub mod property_routes;
pub mod review_routes;
pub mod tenant_routes;
pub mod upload_routes;

use crate::error::{AppError, AppResult};
use crate::models::{Property, User};
use crate::AppState;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use std::collections::HashMap;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.upload.max_bytes;

    Router::new()
        .route("/", get(property_routes::index))
        .route("/healthz", get(healthz))
        .route("/auth/register", post(auth_routes::register))
        .route("/auth/login", post(auth_routes::login))
        .route("/auth/logout", post(auth_routes::logout))
        .route(
            "/auth/account",
            get(auth_routes::account).post(auth_routes::update_account),
        )
        .route("/properties", post(property_routes::create))
        .route("/properties/:id", get(property_routes::detail))
        .route("/properties/:id/update", post(property_routes::update))
        .route("/properties/:id/delete", post(property_routes::delete))
        .route("/properties/:id/tenants", post(tenant_routes::create))
        .route("/tenants/:id/update", post(tenant_routes::update))
        .route("/tenants/:id/delete", post(tenant_routes::delete))
        .route("/properties/:id/offers", post(offer_routes::create))
        .route("/offers/received", get(offer_routes::received))
        .route("/offers/sent", get(offer_routes::sent))
        .route("/offers/:id/respond", post(offer_routes::respond))
        .route("/offers/:id/delete", post(offer_routes::delete))
        .route(
            "/properties/:id/reviews",
            get(review_routes::list).post(review_routes::create),
        )
        .route("/reviews/:id/respond", post(review_routes::respond))
        .route("/reviews/:id/delete", post(review_routes::delete))
        .route("/reviews/received", get(review_routes::received))
        .route("/uploads/:filename", get(upload_routes::serve))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Fetch a property and check the caller owns it: 404 when absent,
/// 403 when owned by someone else.
pub(crate) async fn owned_property(
    state: &AppState,
    property_id: i64,
    user: &User,
) -> AppResult<Property> {
    let property = state
        .property_repo
        .find_by_id(property_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("property {}", property_id)))?;

    if property.owner_id != user.id {
        return Err(AppError::Forbidden(
            "you do not own this property".to_string(),
        ));
    }

    Ok(property)
}

/// Text fields plus at most one uploaded file, collected from a
/// multipart form body.
#[derive(Default)]
pub(crate) struct FormData {
    fields: HashMap<String, String>,
    pub file: Option<(String, Vec<u8>)>,
}

impl FormData {
    /// Trimmed field value; empty submissions count as absent
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Required field, 400 when missing or blank
    pub fn require(&self, name: &str) -> AppResult<String> {
        self.get(name)
            .map(|v| v.to_string())
            .ok_or_else(|| AppError::Validation(format!("{} is required", name)))
    }

    /// Optional numeric field, 400 when present but unparsable
    pub fn get_f64(&self, name: &str) -> AppResult<Option<f64>> {
        match self.get(name) {
            None => Ok(None),
            Some(v) => v
                .parse::<f64>()
                .map(Some)
                .map_err(|_| AppError::Validation(format!("{} is not a valid number", name))),
        }
    }
}

/// Drain a multipart body into `FormData`. The field named `file_field`
/// is treated as the upload; everything else is read as text.
pub(crate) async fn read_multipart(
    mut multipart: Multipart,
    file_field: &str,
) -> AppResult<FormData> {
    let mut data = FormData::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == file_field {
            let filename = field.file_name().map(|s| s.to_string());
            let bytes = field.bytes().await.map_err(multipart_error)?;
            if let Some(filename) = filename {
                if !filename.is_empty() && !bytes.is_empty() {
                    data.file = Some((filename, bytes.to_vec()));
                }
            }
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            data.fields.insert(name, value);
        }
    }

    Ok(data)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("upload exceeds the size limit".to_string())
    } else {
        AppError::Validation(format!("malformed form body: {}", err))
    }
}
