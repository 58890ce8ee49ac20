//! Image generation endpoint
//!
//! Injects the request text and fresh seeds into the job-graph template,
//! relays the job to the generation backend, and stores every streamed
//! image with its thumbnail.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::generation::graph;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub positive_clip: String,
    pub negative_clip: String,
    #[serde(default)]
    pub character_tags: Vec<String>,
    #[serde(default)]
    pub artist_tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Stored filenames, one per generated image
    pub titles: Vec<String>,
}

/// POST /generate-image/
pub async fn generate_image(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    let template = graph::load_template(&state.config.prompt_template_path())?;
    let job = graph::prepare(template, &request.positive_clip, &request.negative_clip)?;

    let images = state.relay.run(&job).await?;

    // Filename stem: first character tag's first comma-field + first artist tag
    let character = request
        .character_tags
        .first()
        .map(|t| t.split(',').next().unwrap_or(t))
        .unwrap_or("char")
        .to_string();
    let artist = request
        .artist_tags
        .first()
        .map(String::as_str)
        .unwrap_or("artist")
        .to_string();

    let mut titles = Vec::new();
    for data in images {
        let store = state.image_store.clone();
        let character = character.clone();
        let artist = artist.clone();
        // Decode + thumbnail is CPU-bound
        let title = tokio::task::spawn_blocking(move || store.save(&data, &character, &artist))
            .await
            .map_err(|e| ApiError::Internal(format!("Image save task failed: {e}")))??;
        titles.push(title);
    }

    info!(count = titles.len(), "generated images stored");
    Ok(Json(GenerateResponse { titles }))
}
