use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::decks::DeckError;
use crate::media::MediaError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Deck(e) => match e {
                DeckError::NotFound(_) => (StatusCode::NOT_FOUND, "DECK_NOT_FOUND"),
                DeckError::OutOfRange { .. } => (StatusCode::NOT_FOUND, "INDEX_OUT_OF_RANGE"),
                DeckError::InvalidName(_) => (StatusCode::BAD_REQUEST, "INVALID_DECK_NAME"),
                DeckError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
                DeckError::Json(_) => (StatusCode::INTERNAL_SERVER_ERROR, "JSON_ERROR"),
            },
            AppError::Media(e) => match e {
                MediaError::GenerationSkipped { .. } => {
                    (StatusCode::NOT_FOUND, "GENERATION_SKIPPED")
                }
                MediaError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
                MediaError::BackendUnavailable(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "BACKEND_UNAVAILABLE")
                }
                MediaError::EmptyResponse => (StatusCode::INTERNAL_SERVER_ERROR, "EMPTY_RESPONSE"),
                MediaError::Transient(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "TRANSIENT_NETWORK_ERROR")
                }
                MediaError::Backend(_) => (StatusCode::INTERNAL_SERVER_ERROR, "BACKEND_ERROR"),
                MediaError::Filesystem(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "FILESYSTEM_ERROR")
                }
            },
            AppError::Body(_) | AppError::Query(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            AppError::Join(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.to_string();

        tracing::error!("Request failed: {} - {}", code, message);

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn status(e: impl Into<AppError>) -> StatusCode {
        e.into().status_and_code().0
    }

    #[test]
    fn deck_errors() {
        assert_eq!(status(DeckError::NotFound("ir.json".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status(DeckError::OutOfRange { index: 5, len: 2 }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status(DeckError::InvalidName("..".into())), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn media_errors() {
        assert_eq!(
            status(MediaError::GenerationSkipped {
                expected: PathBuf::from("x.jpg")
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(MediaError::InvalidInput("bad tone".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(MediaError::Transient("timeout".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(MediaError::BackendUnavailable("Image generation")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
