//! Stored image downloads
//!
//! Serves the files written by the media service. Names are content
//! hashes, so the handler only has to reject traversal and misses.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/v1/image/{filename}", get(download))
}

pub async fn download(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    let path = state.media.resolve(&filename)?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::internal(format!("Failed to read image: {}", e)))?;

    let mime = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .to_string();

    Ok(([(http::header::CONTENT_TYPE, mime)], bytes))
}
