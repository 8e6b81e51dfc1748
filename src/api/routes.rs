use axum::{
    http::{header, Method},
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::handlers;
use crate::config::Config;
use crate::decks::DeckRepository;
use crate::images::ImageService;
use crate::tts::AudioService;

pub struct AppState {
    pub decks: Box<dyn DeckRepository>,
    pub images: ImageService,
    pub audio: AudioService,
}

pub fn create_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/available-flashcards-files", get(handlers::list_files))
        .route("/flashcards-data", get(handlers::flashcards_data))
        .route("/update-status", post(handlers::update_status))
        .route("/reset-all", post(handlers::reset_all))
        .route("/generate-image", post(handlers::generate_image))
        .route("/delete-image", delete(handlers::delete_image))
        .route("/synthesize-speech", post(handlers::synthesize_speech))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api_routes)
        .nest_service(&config.images_mount, ServeDir::new(&config.images_dir))
        .fallback_service(
            ServeDir::new(&config.static_dir).append_index_html_on_directories(true),
        )
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
