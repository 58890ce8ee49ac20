//! Integration tests for the genbooth HTTP surface
//!
//! Tests cover:
//! - Tag search (top-8 ranking, query filtering, unknown categories)
//! - Random tag selection (including the empty-category failure)
//! - Deleted-tag listings
//! - Remove / restore lifecycle with the partial-success report
//! - Factory reset from the default snapshot
//! - Generation endpoint error path (missing job-graph template)
//! - Image catalog listing, serving, and deletion
//! - Health endpoint

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

use genbooth::config::Config;
use genbooth::{build_router, AppState};

/// Test helper: seed a data dir with a default tag snapshot
fn seed_data_dir(root: &Path) {
    let default_tags = root.join("default").join("tags");
    fs::create_dir_all(&default_tags).unwrap();

    fs::write(
        default_tags.join("char.json"),
        r#"[
            {"tag": "alice", "count": 5},
            {"tag": "bob", "count": 3},
            {"tag": "carol", "count": 7},
            {"tag": "dave", "count": 1},
            {"tag": "erin", "count": 9},
            {"tag": "frank", "count": 2},
            {"tag": "grace", "count": 8},
            {"tag": "heidi", "count": 4},
            {"tag": "ivan", "count": 6},
            {"tag": "judy", "count": 0}
        ]"#,
    )
    .unwrap();
    fs::write(
        default_tags.join("artist.json"),
        r#"[{"tag": "rembrandt", "count": "2"}, {"tag": "vermeer", "count": "11"}]"#,
    )
    .unwrap();
    fs::write(default_tags.join("danbooru.json"), r#"[{"tag": "1girl", "count": 100}]"#).unwrap();
    fs::write(default_tags.join("participant.json"), "[]").unwrap();
}

/// Test helper: build the app over a fresh seeded tempdir
fn setup_app() -> (TempDir, axum::Router) {
    let dir = TempDir::new().unwrap();
    seed_data_dir(dir.path());

    let config = Config {
        data_dir: dir.path().to_path_buf(),
        backend_address: "127.0.0.1:8188".to_string(),
        port: 0,
        generation_timeout: Duration::from_secs(1),
    };
    let state = AppState::new(config).expect("state should build over seeded dir");
    (dir, build_router(state))
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn tag_names(body: &Value) -> Vec<String> {
    body["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["tag"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, app) = setup_app();

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "genbooth");
    assert!(body["version"].is_string());
}

// =============================================================================
// Tag Search Tests
// =============================================================================

#[tokio::test]
async fn test_search_returns_top_eight_by_descending_count() {
    let (_dir, app) = setup_app();

    let response = app.oneshot(get_request("/tags/character/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let tags = body["tags"].as_array().unwrap();
    assert_eq!(tags.len(), 8);

    let counts: Vec<i64> = tags.iter().map(|t| t["count"].as_i64().unwrap()).collect();
    assert_eq!(counts, vec![9, 8, 7, 6, 5, 4, 3, 2]);
}

#[tokio::test]
async fn test_search_with_query_filters_substring() {
    let (_dir, app) = setup_app();

    let response = app
        .oneshot(get_request("/tags/character/?q=RA"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    // "grace" (8) and "frank" (2), descending by count
    assert_eq!(tag_names(&body), vec!["grace", "frank"]);
}

#[tokio::test]
async fn test_search_string_counts_rank_numerically() {
    let (_dir, app) = setup_app();

    let response = app.oneshot(get_request("/tags/artist/")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(tag_names(&body), vec!["vermeer", "rembrandt"]);
}

#[tokio::test]
async fn test_search_unknown_category_is_404() {
    let (_dir, app) = setup_app();

    let response = app.oneshot(get_request("/tags/weapons/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Random Tag Tests
// =============================================================================

#[tokio::test]
async fn test_random_tag_comes_from_category() {
    let (_dir, app) = setup_app();

    let response = app
        .oneshot(get_request("/tags/danbooru/random"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["tag"]["tag"], "1girl");
}

#[tokio::test]
async fn test_random_tag_on_empty_category_is_404() {
    let (_dir, app) = setup_app();

    let response = app
        .oneshot(get_request("/tags/participant/random"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Lifecycle Tests: remove, restore, reset
// =============================================================================

#[tokio::test]
async fn test_remove_then_listing_deleted_tags() {
    let (_dir, app) = setup_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/remove-tags",
            json!({"characterTags": ["alice"], "artistTags": []}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["characterTags"], json!(["alice"]));
    assert_eq!(body["artistTags"], json!([]));

    // Journal now holds the full record
    let response = app
        .clone()
        .oneshot(get_request("/tags/deleted-character"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["tags"], json!([{"tag": "alice", "count": 5}]));

    // Active search no longer returns it
    let response = app
        .oneshot(get_request("/tags/character/?q=alice"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert!(tag_names(&body).is_empty());
}

#[tokio::test]
async fn test_remove_unknown_tag_reports_nothing_moved() {
    let (_dir, app) = setup_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/remove-tags",
            json!({"characterTags": ["zelda"], "artistTags": []}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["characterTags"], json!([]));
}

#[tokio::test]
async fn test_remove_without_tags_is_400() {
    let (_dir, app) = setup_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/remove-tags",
            json!({"characterTags": [], "artistTags": []}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_restore_round_trips_removed_tag() {
    let (_dir, app) = setup_app();

    let remove = json_request(
        "POST",
        "/remove-tags",
        json!({"characterTags": ["alice"], "artistTags": ["vermeer"]}),
    );
    app.clone().oneshot(remove).await.unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/restore-deleted-tags",
            json!({"characterTags": ["alice"], "artistTags": ["vermeer"]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["characterTags"], json!(["alice"]));
    assert_eq!(body["artistTags"], json!(["vermeer"]));

    // Journal is empty again
    let response = app
        .clone()
        .oneshot(get_request("/tags/deleted-character"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["tags"], json!([]));

    // Restored record searchable again, with its original count
    let response = app
        .oneshot(get_request("/tags/character/?q=alice"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["tags"], json!([{"tag": "alice", "count": 5}]));
}

#[tokio::test]
async fn test_restore_without_tags_is_400() {
    let (_dir, app) = setup_app();

    let response = app
        .oneshot(json_request("POST", "/restore-deleted-tags", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_restore_database_resets_store_and_journal() {
    let (_dir, app) = setup_app();

    let remove = json_request(
        "POST",
        "/remove-tags",
        json!({"characterTags": ["alice", "bob"], "artistTags": ["vermeer"]}),
    );
    app.clone().oneshot(remove).await.unwrap();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/restore-database", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Full catalog is back
    let response = app
        .clone()
        .oneshot(get_request("/tags/character/?q=alice"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(tag_names(&body), vec!["alice"]);

    // Journal is cleared
    for uri in ["/tags/deleted-character", "/tags/deleted-artist"] {
        let response = app.clone().oneshot(get_request(uri)).await.unwrap();
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["tags"], json!([]));
    }
}

// =============================================================================
// Generation Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_generate_without_prompt_template_is_404() {
    // Seeded data dir deliberately has no default/prompt.json
    let (_dir, app) = setup_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/generate-image/",
            json!({
                "positive_clip": "1girl, smile",
                "negative_clip": "lowres",
                "character_tags": ["alice"],
                "artist_tags": ["vermeer"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// =============================================================================
// Image Catalog Tests
// =============================================================================

fn write_png(path: &Path) {
    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::new(4, 4));
    img.save(path).unwrap();
}

#[tokio::test]
async fn test_image_listing_and_serving() {
    let (dir, app) = setup_app();

    let images_dir = dir.path().join("public").join("images");
    let thumbs_dir = dir.path().join("public").join("thumbnails");
    write_png(&images_dir.join("alice_vermeer_1.png"));
    write_png(&thumbs_dir.join("alice_vermeer_1.png"));

    let response = app.clone().oneshot(get_request("/images/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(
        body["images"],
        json!([{
            "original": "/images/alice_vermeer_1.png",
            "thumbnail": "/thumb/alice_vermeer_1.png",
            "title": "alice_vermeer_1"
        }])
    );

    let response = app
        .clone()
        .oneshot(get_request("/images/alice_vermeer_1.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "image/png"
    );

    let response = app
        .oneshot(get_request("/thumb/alice_vermeer_1.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_image_is_404() {
    let (_dir, app) = setup_app();

    let response = app
        .clone()
        .oneshot(get_request("/images/nope.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get_request("/thumb/nope.png")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_image_removes_original_and_thumbnail() {
    let (dir, app) = setup_app();

    let images_dir = dir.path().join("public").join("images");
    let thumbs_dir = dir.path().join("public").join("thumbnails");
    write_png(&images_dir.join("x_y_1.png"));
    write_png(&thumbs_dir.join("x_y_1.png"));

    let request = Request::builder()
        .method("DELETE")
        .uri("/images/x_y_1.png")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["message"], "Image and thumbnail deleted successfully");
    assert!(!images_dir.join("x_y_1.png").exists());
    assert!(!thumbs_dir.join("x_y_1.png").exists());

    // Second delete is a 404
    let request = Request::builder()
        .method("DELETE")
        .uri("/images/x_y_1.png")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
