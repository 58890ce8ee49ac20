//! genbooth - image generation relay and tag catalog backend
//!
//! A thin service in front of a node-graph image generation backend:
//! forwards prompts, persists results plus thumbnails, and maintains the
//! JSON tag catalogs (with a soft-delete journal) used to prefill prompts.

pub mod api;
pub mod config;
pub mod error;
pub mod generation;
pub mod images;
pub mod tags;

pub use crate::error::{ApiError, ApiResult, Error};

use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::generation::client::RelayClient;
use crate::images::store::ImageStore;
use crate::tags::journal::Journal;
use crate::tags::store::TagStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tag_store: TagStore,
    pub journal: Journal,
    pub image_store: ImageStore,
    pub relay: Arc<RelayClient>,
    /// Serializes tag-file read-modify-write cycles (single-writer guard)
    pub tag_write_lock: Arc<Mutex<()>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: Instant,
}

impl AppState {
    /// Build the state and prepare the on-disk layout: image/thumbnail
    /// directories are created, the active tag directory is seeded from the
    /// default snapshot when absent.
    pub fn new(config: Config) -> error::Result<Self> {
        let tag_store = TagStore::new(config.tags_dir(), config.default_tags_dir());
        tag_store.ensure_seeded()?;

        let image_store = ImageStore::new(config.images_dir(), config.thumbnails_dir());
        image_store.ensure_dirs()?;

        let journal = Journal::new(&config.tags_dir());
        let relay = RelayClient::new(config.backend_address.clone(), config.generation_timeout)?;

        Ok(Self {
            config: Arc::new(config),
            tag_store,
            journal,
            image_store,
            relay: Arc::new(relay),
            tag_write_lock: Arc::new(Mutex::new(())),
            startup_time: Instant::now(),
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    // Interactive single-user tool; origins are wide open by design of the
    // original deployment
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/tags/:category/", get(api::tags::search_tags))
        .route("/tags/:category/random", get(api::tags::random_tag))
        .route("/tags/deleted-character", get(api::tags::deleted_character_tags))
        .route("/tags/deleted-artist", get(api::tags::deleted_artist_tags))
        .route("/remove-tags", post(api::lifecycle::remove_tags))
        .route("/restore-deleted-tags", post(api::lifecycle::restore_deleted_tags))
        .route("/restore-database", post(api::lifecycle::restore_database))
        .route("/generate-image/", post(api::generate::generate_image))
        .route("/images/", get(api::images::list_images))
        .route(
            "/images/:filename",
            get(api::images::get_image).delete(api::images::delete_image),
        )
        .route("/thumb/:filename", get(api::images::get_thumbnail))
        .merge(api::health::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
