pub mod handlers;
pub mod routes;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DeckQuery {
    pub deck: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub deck: String,
    pub index: i64,
    pub learned: bool,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub deck: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
pub struct ImageGenerateRequest {
    pub prompt: String,
    pub deck: String,
    pub index: usize,
    pub def_index: usize,
    #[serde(default)]
    pub force_generation: bool,
}

#[derive(Debug, Deserialize)]
pub struct ImageDeleteRequest {
    pub deck: String,
    pub index: usize,
    pub def_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub deck: String,
    pub text: String,
    pub voice_name: String,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default = "default_tone")]
    pub tone: String,
    pub verb_name: String,
}

fn default_tone() -> String {
    "default".to_string()
}

#[derive(Debug, Serialize)]
pub struct FilesResponse {
    pub success: bool,
    pub files: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub success: bool,
    pub filename: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct SkippedResponse {
    pub success: bool,
    pub message: String,
    pub filename_expected: String,
    pub path_expected: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
