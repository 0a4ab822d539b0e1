//! Stored-upload handling: extension whitelist, safe file names, and
//! reading/writing files under the configured upload directory.

use crate::error::{AppError, AppResult};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Image extensions accepted for property and profile photos
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

const MAX_FILENAME_LEN: usize = 100;

/// Whether the file name carries an allowed image extension
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str())
        }
        _ => false,
    }
}

/// Strip everything but alphanumerics, dots, dashes and underscores, and
/// collapse runs of dots, so the result is safe as a bare file name and
/// never contains a `..` sequence the serve route would refuse.
fn sanitize(filename: &str) -> String {
    let mut out = String::with_capacity(filename.len());
    for c in filename.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
            c
        } else {
            '_'
        };
        if c == '.' && out.ends_with('.') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Build the stored name for an uploaded file: a uuid prefix keeps names
/// unique, the sanitized original keeps them recognizable, and the total
/// length is capped while preserving the extension.
pub fn generate_saved_filename(original: &str) -> String {
    let mut name = format!("{}_{}", Uuid::new_v4().simple(), sanitize(original));
    if name.len() > MAX_FILENAME_LEN {
        match name.rsplit_once('.') {
            Some((stem, ext)) => {
                let keep = MAX_FILENAME_LEN.saturating_sub(ext.len() + 1);
                name = format!("{}.{}", &stem[..keep.min(stem.len())], ext);
            }
            None => name.truncate(MAX_FILENAME_LEN),
        }
    }
    name
}

/// A stored name is servable only when it is a bare file name; anything
/// that could walk out of the upload directory is rejected.
pub fn is_safe_stored_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
}

/// Content type for a stored image, from its extension
pub fn content_type_for(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()) {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Write uploaded bytes under the upload directory, creating it on demand.
/// Returns the stored file name.
pub async fn save_upload(dir: &Path, original: &str, bytes: &[u8]) -> AppResult<String> {
    if !allowed_file(original) {
        return Err(AppError::Validation(
            "image must be png, jpg, jpeg or gif".to_string(),
        ));
    }

    let stored = generate_saved_filename(original);

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Message(format!("Failed to create upload dir: {}", e)))?;

    let path: PathBuf = dir.join(&stored);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::Message(format!("Failed to store upload: {}", e)))?;

    Ok(stored)
}
