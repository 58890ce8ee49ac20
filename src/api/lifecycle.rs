//! Tag lifecycle endpoints: remove, restore, factory reset
//!
//! Mutations serialize behind the app-state write lock; each operation is a
//! full read-modify-write over the category files and the journal.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiResult;
use crate::tags::lifecycle;
use crate::AppState;

/// Request body shared by remove and restore
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TagSelection {
    pub character_tags: Vec<String>,
    pub artist_tags: Vec<String>,
}

/// Partial-success report: the names that actually moved
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleResponse {
    pub message: String,
    pub character_tags: Vec<String>,
    pub artist_tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /remove-tags
pub async fn remove_tags(
    State(state): State<AppState>,
    Json(payload): Json<TagSelection>,
) -> ApiResult<Json<LifecycleResponse>> {
    let _guard = state.tag_write_lock.lock().await;
    let moved = lifecycle::remove_tags(
        &state.tag_store,
        &state.journal,
        &payload.character_tags,
        &payload.artist_tags,
    )?;

    info!(
        characters = moved.character_tags.len(),
        artists = moved.artist_tags.len(),
        "tags moved to deletion journal"
    );
    Ok(Json(LifecycleResponse {
        message: "Tags removed and tracked successfully".to_string(),
        character_tags: moved.character_tags,
        artist_tags: moved.artist_tags,
    }))
}

/// POST /restore-deleted-tags
pub async fn restore_deleted_tags(
    State(state): State<AppState>,
    Json(payload): Json<TagSelection>,
) -> ApiResult<Json<LifecycleResponse>> {
    let _guard = state.tag_write_lock.lock().await;
    let moved = lifecycle::restore_tags(
        &state.tag_store,
        &state.journal,
        &payload.character_tags,
        &payload.artist_tags,
    )?;

    info!(
        characters = moved.character_tags.len(),
        artists = moved.artist_tags.len(),
        "tags restored from deletion journal"
    );
    Ok(Json(LifecycleResponse {
        message: "Deleted tags restored successfully".to_string(),
        character_tags: moved.character_tags,
        artist_tags: moved.artist_tags,
    }))
}

/// POST /restore-database
pub async fn restore_database(
    State(state): State<AppState>,
) -> ApiResult<Json<MessageResponse>> {
    let _guard = state.tag_write_lock.lock().await;
    lifecycle::reset_to_default(&state.tag_store, &state.journal)?;

    info!("tag store reset to default snapshot");
    Ok(Json(MessageResponse {
        message: "Database restored to original state".to_string(),
    }))
}
