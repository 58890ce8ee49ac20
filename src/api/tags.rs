//! Tag catalog endpoints: search, random pick, deleted-tag listings

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::tags::query;
use crate::tags::store::{TagCategory, TagRecord};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Case-insensitive substring query
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TagListResponse {
    pub tags: Vec<TagRecord>,
}

#[derive(Debug, Serialize)]
pub struct SingleTagResponse {
    pub tag: TagRecord,
}

fn parse_category(raw: &str) -> ApiResult<TagCategory> {
    TagCategory::parse(raw)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown tag category: {raw}")))
}

/// GET /tags/:category/?q=
pub async fn search_tags(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<TagListResponse>> {
    let category = parse_category(&category)?;
    let tags = query::search(&state.tag_store, category, params.q.as_deref())?;
    Ok(Json(TagListResponse { tags }))
}

/// GET /tags/:category/random
pub async fn random_tag(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Json<SingleTagResponse>> {
    let category = parse_category(&category)?;
    let tag = query::random(&state.tag_store, category)?;
    Ok(Json(SingleTagResponse { tag }))
}

/// GET /tags/deleted-character
pub async fn deleted_character_tags(
    State(state): State<AppState>,
) -> ApiResult<Json<TagListResponse>> {
    let deleted = state.journal.load()?;
    Ok(Json(TagListResponse {
        tags: deleted.character_tags,
    }))
}

/// GET /tags/deleted-artist
pub async fn deleted_artist_tags(
    State(state): State<AppState>,
) -> ApiResult<Json<TagListResponse>> {
    let deleted = state.journal.load()?;
    Ok(Json(TagListResponse {
        tags: deleted.artist_tags,
    }))
}
