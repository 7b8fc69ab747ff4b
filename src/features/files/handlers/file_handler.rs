use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::modules::storage::{content_type_for, FileStorage};

/// Serve a stored upload
///
/// Public, so profile images can be embedded directly.
#[utoipa::path(
    get,
    path = "/uploads/{file}",
    params(
        ("file" = String, Path, description = "Stored file name")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid file name"),
        (status = 404, description = "File not found")
    ),
    tag = "files"
)]
pub async fn serve_upload(
    State(storage): State<Arc<dyn FileStorage>>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if file.is_empty() || file.contains("..") || file.contains('/') || file.contains('\\') {
        return Err(AppError::BadRequest("Invalid file name".to_string()));
    }

    let data = storage.load(&file).await?.ok_or_else(|| {
        debug!("Upload not found: {}", file);
        AppError::not_found("file", "name", &file)
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&file)),
            (header::CACHE_CONTROL, "public, max-age=3600"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        data,
    ))
}
