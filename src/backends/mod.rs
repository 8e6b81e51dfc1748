pub mod google_tts;
pub mod vertex;

pub use google_tts::GoogleTts;
pub use vertex::VertexImagen;

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("Not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Timeout or connection error: {0}")]
    Transient(String),

    #[error("Request rejected: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Upstream(String),
}

impl BackendError {
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() {
            BackendError::Transient(e.to_string())
        } else {
            BackendError::Upstream(e.to_string())
        }
    }

    /// Classify a non-success HTTP status returned by a cloud API.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = format!("HTTP {}: {}", status.as_u16(), body.trim());
        match status.as_u16() {
            400 => BackendError::InvalidRequest(message),
            408 | 504 => BackendError::Transient(message),
            _ => BackendError::Upstream(message),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageRequest<'a> {
    pub prompt: &'a str,
    pub count: u32,
    pub aspect_ratio: &'a str,
}

#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

pub trait ImageGenerator: Send + Sync {
    fn generate(&self, request: &ImageRequest<'_>) -> Result<Vec<GeneratedImage>, BackendError>;
}

/// Voice adjustments applied on top of the selected voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prosody {
    pub speaking_rate: f32,
    pub pitch: f32,
    pub volume_gain_db: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpeechInput {
    Text(String),
    Ssml(String),
}

#[derive(Debug, Clone)]
pub struct SpeechRequest<'a> {
    pub input: SpeechInput,
    pub voice_name: &'a str,
    pub model_name: Option<&'a str>,
    pub prosody: Prosody,
}

pub trait SpeechSynthesizer: Send + Sync {
    /// Returns MP3 audio bytes.
    fn synthesize(&self, request: &SpeechRequest<'_>) -> Result<Vec<u8>, BackendError>;
}
