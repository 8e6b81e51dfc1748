use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::routes::{create_router, AppState};
use crate::backends::fakes::{FakeImages, FakeSpeech, Outcome};
use crate::backends::{ImageGenerator, SpeechSynthesizer};
use crate::config::Config;
use crate::decks::JsonDeckStore;
use crate::images::ImageService;
use crate::media::MediaPaths;
use crate::tts::AudioService;

struct TestApp {
    _dir: tempfile::TempDir,
    router: Router,
    images: Arc<FakeImages>,
    speech: Arc<FakeSpeech>,
}

fn app() -> TestApp {
    let dir = tempfile::tempdir().expect("create tempdir");
    let base = dir.path().to_string_lossy().to_string();
    let config = Config::from_lookup(|key| (key == "BASE_DIR").then(|| base.clone())).unwrap();
    config.ensure_dirs().unwrap();

    std::fs::write(
        config.decks_dir.join("ir.json"),
        json!([
            {"id": 0, "name": "ir", "learned": false},
            {"id": 1, "name": "ir", "learned": true, "imagePath": "/card_images/ir/ir_card_1_def0.jpg"}
        ])
        .to_string(),
    )
    .unwrap();

    let images = Arc::new(FakeImages::new(Outcome::Images(1)));
    let speech = Arc::new(FakeSpeech::ok());
    let generator: Arc<dyn ImageGenerator> = images.clone();
    let synthesizer: Arc<dyn SpeechSynthesizer> = speech.clone();

    let paths = MediaPaths::new(
        config.images_dir.clone(),
        config.images_mount.clone(),
        config.audio_dir.clone(),
    );
    let state = Arc::new(AppState {
        decks: Box::new(JsonDeckStore::new(config.decks_dir.clone())),
        images: ImageService::new(paths.clone(), Some(generator)),
        audio: AudioService::new(paths, Some(synthesizer)),
    });

    TestApp {
        _dir: dir,
        router: create_router(state, &config),
        images,
        speech,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn send_json(router: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(router, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, bytes) = send(router, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn lists_deck_files() {
    let app = app();
    let (status, body) = get_json(&app.router, "/api/available-flashcards-files").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "files": ["ir.json"]}));
}

#[tokio::test]
async fn serves_deck_data() {
    let app = app();
    let (status, body) = get_json(&app.router, "/api/flashcards-data?deck=ir").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[1]["learned"], true);

    let (status, body) = get_json(&app.router, "/api/flashcards-data?deck=missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "DECK_NOT_FOUND");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn updates_card_status() {
    let app = app();
    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/api/update-status",
        json!({"deck": "ir", "index": 0, "learned": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, deck) = get_json(&app.router, "/api/flashcards-data?deck=ir.json").await;
    assert_eq!(deck[0]["learned"], true);
    assert_eq!(deck[1]["learned"], true);

    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/api/update-status",
        json!({"deck": "ir", "index": 5, "learned": true}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "INDEX_OUT_OF_RANGE");
}

#[tokio::test]
async fn resets_deck() {
    let app = app();
    for _ in 0..2 {
        let (status, _) =
            send_json(&app.router, Method::POST, "/api/reset-all", json!({"deck": "ir"})).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, deck) = get_json(&app.router, "/api/flashcards-data?deck=ir").await;
    for card in deck.as_array().unwrap() {
        assert_eq!(card["learned"], false);
        assert_eq!(card["imagePath"], Value::Null);
    }

    let (status, _) =
        send_json(&app.router, Method::POST, "/api/reset-all", json!({"deck": "nope"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn skipped_generation_reports_expected_path() {
    let app = app();
    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/api/generate-image",
        json!({"prompt": "a walk", "deck": "ir.json", "index": 0, "def_index": 0}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["filename_expected"], "ir_card_0_def0.jpg");
    assert_eq!(body["path_expected"], "/card_images/ir/ir_card_0_def0.jpg");
    assert_eq!(app.images.calls(), 0);
}

#[tokio::test]
async fn forced_generation_is_served_statically() {
    let app = app();
    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/api/generate-image",
        json!({
            "prompt": "a walk",
            "deck": "ir",
            "index": 1,
            "def_index": 2,
            "force_generation": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filename"], "ir_card_1_def2.jpg");
    assert_eq!(body["path"], "/card_images/ir/ir_card_1_def2.jpg");

    let request = Request::builder()
        .uri("/card_images/ir/ir_card_1_def2.jpg")
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"jpeg-0");
}

#[tokio::test]
async fn deleting_absent_image_succeeds() {
    let app = app();
    let (status, body) = send_json(
        &app.router,
        Method::DELETE,
        "/api/delete-image",
        json!({"deck": "ir", "index": 0, "def_index": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "File not found."}));
}

#[tokio::test]
async fn synthesizes_and_reuses_audio() {
    let app = app();
    let body = json!({
        "deck": "ir",
        "text": "Voy a ir",
        "voice_name": "es-ES-Neural2-A",
        "verb_name": "ir"
    });

    for _ in 0..2 {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/synthesize-speech")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"ir_default.mp3\""
        );
    }
    assert_eq!(app.speech.calls(), 1);
}

#[tokio::test]
async fn unsupported_tone_is_bad_request() {
    let app = app();
    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/api/synthesize-speech",
        json!({
            "deck": "ir",
            "text": "Voy a ir",
            "voice_name": "es-ES-Neural2-A",
            "tone": "sarcastic",
            "verb_name": "ir"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(app.speech.calls(), 0);
}

#[tokio::test]
async fn synthesis_without_text_is_bad_request() {
    let app = app();
    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/api/synthesize-speech",
        json!({"deck": "ir", "voice_name": "es-ES-Neural2-A", "verb_name": "ir"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["error"].as_str().unwrap().contains("text"));
    assert_eq!(app.speech.calls(), 0);
}

#[tokio::test]
async fn malformed_bodies_and_queries_get_error_json() {
    let app = app();
    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/api/update-status",
        json!({"deck": "ir", "index": "zero", "learned": true}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/reset-all")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, bytes) = send(&app.router, request).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = get_json(&app.router, "/api/flashcards-data").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn health_reports_version() {
    let app = app();
    let (status, body) = get_json(&app.router, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
