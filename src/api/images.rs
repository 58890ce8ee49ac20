//! Image catalog endpoints: list, serve, delete

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::error::ApiResult;
use crate::images::store::ImageEntry;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ImageListResponse {
    pub images: Vec<ImageEntry>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /images/
pub async fn list_images(State(state): State<AppState>) -> ApiResult<Json<ImageListResponse>> {
    let images = state.image_store.list()?;
    Ok(Json(ImageListResponse { images }))
}

/// GET /images/:filename
pub async fn get_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let path = state.image_store.image_path(&filename)?;
    let data = tokio::fs::read(&path).await?;
    // Everything the store writes is PNG
    Ok(([(header::CONTENT_TYPE, "image/png")], data))
}

/// GET /thumb/:filename
pub async fn get_thumbnail(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let path = state.image_store.thumbnail_path(&filename)?;
    let data = tokio::fs::read(&path).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], data))
}

/// DELETE /images/:filename
pub async fn delete_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.image_store.delete(&filename)?;

    info!(%filename, "image deleted");
    Ok(Json(MessageResponse {
        message: "Image and thumbnail deleted successfully".to_string(),
    }))
}
