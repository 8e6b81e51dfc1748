use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::path::Path;
use std::sync::Arc;

use super::{
    DeckQuery, FilesResponse, HealthResponse, ImageDeleteRequest, ImageGenerateRequest,
    ImageResponse, MessageResponse, ResetRequest, SkippedResponse, SynthesizeRequest,
    UpdateStatusRequest,
};
use crate::api::routes::AppState;
use crate::decks::Card;
use crate::error::AppError;
use crate::images::{Deleted, ImageKey};
use crate::media::MediaError;
use crate::tts::SpeechParams;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FilesResponse>, AppError> {
    let files = tokio::task::spawn_blocking(move || state.decks.list_decks()).await??;
    Ok(Json(FilesResponse {
        success: true,
        files,
    }))
}

pub async fn flashcards_data(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DeckQuery>, QueryRejection>,
) -> Result<Json<Vec<Card>>, AppError> {
    let Query(query) = query?;
    let cards = tokio::task::spawn_blocking(move || state.decks.get_deck_data(&query.deck)).await??;
    Ok(Json(cards))
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    request: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(request) = request?;
    let index = request.index;
    tokio::task::spawn_blocking(move || {
        state
            .decks
            .update_card_status(&request.deck, request.index, request.learned)
    })
    .await??;

    Ok(Json(MessageResponse::ok(format!("Card {} updated.", index))))
}

pub async fn reset_all(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ResetRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(request) = request?;
    let deck = request.deck.clone();
    tokio::task::spawn_blocking(move || state.decks.reset_deck_status(&request.deck)).await??;

    Ok(Json(MessageResponse::ok(format!(
        "All cards in '{}' reset.",
        deck
    ))))
}

pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ImageGenerateRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = request?;
    let deck = request.deck.clone();
    let worker = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || {
        let key = ImageKey {
            deck: &request.deck,
            card_index: request.index,
            def_index: request.def_index,
        };
        worker
            .images
            .generate_or_fetch(&request.prompt, &key, request.force_generation)
    })
    .await?;

    let paths = state.images.paths();
    match result {
        Ok(path) => Ok(Json(ImageResponse {
            success: true,
            filename: file_name(&path),
            path: paths.image_web_path(&deck, &path),
        })
        .into_response()),
        Err(err) => match err {
            MediaError::GenerationSkipped { ref expected } => Ok((
                StatusCode::NOT_FOUND,
                Json(SkippedResponse {
                    success: false,
                    message: err.to_string(),
                    filename_expected: file_name(expected),
                    path_expected: paths.image_web_path(&deck, expected),
                }),
            )
                .into_response()),
            other => Err(other.into()),
        },
    }
}

pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ImageDeleteRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(request) = request?;
    let deleted = tokio::task::spawn_blocking(move || {
        state.images.delete(&ImageKey {
            deck: &request.deck,
            card_index: request.index,
            def_index: request.def_index,
        })
    })
    .await??;

    let message = match deleted {
        Deleted::Removed(_) => "Image deleted.",
        Deleted::NotFound => "File not found.",
    };
    Ok(Json(MessageResponse::ok(message)))
}

pub async fn synthesize_speech(
    State(state): State<Arc<AppState>>,
    request: Result<Json<SynthesizeRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = request?;
    let audio = tokio::task::spawn_blocking(move || {
        state.audio.synthesize_or_reuse(&SpeechParams {
            deck: &request.deck,
            text: &request.text,
            voice_name: &request.voice_name,
            model_name: request.model_name.as_deref(),
            tone: &request.tone,
            verb_name: &request.verb_name,
        })
    })
    .await??;

    let disposition = format!("attachment; filename=\"{}\"", audio.filename());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/mpeg".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        audio.bytes,
    )
        .into_response())
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
