use std::net::SocketAddr;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

mod api;
mod backends;
mod config;
mod decks;
mod dsl;
mod error;
mod images;
mod locks;
mod media;
mod tts;

use api::routes::{create_router, AppState};
use backends::{GoogleTts, ImageGenerator, SpeechSynthesizer, VertexImagen};
use config::Config;
use decks::JsonDeckStore;
use images::ImageService;
use media::MediaPaths;
use tts::AudioService;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.ensure_dirs() {
        tracing::error!("Failed to create data directories: {}", e);
        std::process::exit(1);
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid address");

    tracing::info!("Flashcard server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Decks directory: {}", config.decks_dir.display());
    tracing::info!("Images directory: {}", config.images_dir.display());
    tracing::info!("Audio directory: {}", config.audio_dir.display());

    let (generator, synthesizer) = init_backends(&config);

    let paths = MediaPaths::new(
        config.images_dir.clone(),
        config.images_mount.clone(),
        config.audio_dir.clone(),
    );

    let state = Arc::new(AppState {
        decks: Box::new(JsonDeckStore::new(config.decks_dir.clone())),
        images: ImageService::new(paths.clone(), generator),
        audio: AudioService::new(paths, synthesizer),
    });

    let app = create_router(state, &config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

/// Cloud clients are built once. A client that fails to build is logged and
/// left out; its endpoints then report the backend as unavailable.
fn init_backends(
    config: &Config,
) -> (
    Option<Arc<dyn ImageGenerator>>,
    Option<Arc<dyn SpeechSynthesizer>>,
) {
    let generator: Option<Arc<dyn ImageGenerator>> =
        match VertexImagen::new(config, Handle::current()) {
            Ok(imagen) => {
                tracing::info!(
                    "Image generation ready ({} in {})",
                    config.imagen_model,
                    config.region
                );
                Some(Arc::new(imagen))
            }
            Err(e) => {
                tracing::error!("Image generation unavailable: {}", e);
                None
            }
        };

    let synthesizer: Option<Arc<dyn SpeechSynthesizer>> =
        match GoogleTts::new(config, Handle::current()) {
            Ok(tts) => {
                tracing::info!("Text-to-speech ready");
                Some(Arc::new(tts))
            }
            Err(e) => {
                tracing::error!("Text-to-speech unavailable: {}", e);
                None
            }
        };

    (generator, synthesizer)
}
