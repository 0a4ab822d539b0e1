//! Serves stored uploads (property photos and profile pictures) from the
//! upload directory.

use crate::error::{AppError, AppResult};
use crate::uploads;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;

/// `GET /uploads/{filename}` — stored names only; anything with path
/// separators or dot-dot is treated as not found
pub async fn serve(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !uploads::is_safe_stored_name(&filename) {
        return Err(AppError::NotFound(format!("upload {}", filename)));
    }

    let path = state.config.upload.dir.join(&filename);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound(format!("upload {}", filename)))?;

    let content_type = uploads::content_type_for(&filename);

    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}
