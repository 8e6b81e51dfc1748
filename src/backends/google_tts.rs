use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

use super::{BackendError, SpeechInput, SpeechRequest, SpeechSynthesizer};
use crate::config::Config;

const SYNTHESIZE_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

/// Google Cloud Text-to-Speech over its REST API.
pub struct GoogleTts {
    client: reqwest::Client,
    runtime: Handle,
    access_token: String,
    project_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeBody<'a> {
    input: Input<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum Input<'a> {
    Text(&'a str),
    Ssml(&'a str),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: String,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f32,
    pitch: f32,
    volume_gain_db: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: String,
}

impl GoogleTts {
    pub fn new(config: &Config, runtime: Handle) -> Result<Self, BackendError> {
        let access_token = config
            .access_token
            .clone()
            .ok_or(BackendError::NotConfigured("GOOGLE_ACCESS_TOKEN"))?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(BackendError::from_reqwest)?;

        Ok(Self {
            client,
            runtime,
            access_token,
            project_id: config.project_id.clone(),
        })
    }

    async fn post(&self, body: &SynthesizeBody<'_>) -> Result<SynthesizeResponse, BackendError> {
        let mut builder = self
            .client
            .post(SYNTHESIZE_URL)
            .bearer_auth(&self.access_token)
            .json(body);
        if let Some(project) = &self.project_id {
            builder = builder.header("x-goog-user-project", project);
        }

        let response = builder.send().await.map_err(BackendError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BackendError::from_status(status, &text));
        }

        response.json().await.map_err(BackendError::from_reqwest)
    }
}

impl SpeechSynthesizer for GoogleTts {
    fn synthesize(&self, request: &SpeechRequest<'_>) -> Result<Vec<u8>, BackendError> {
        let body = build_body(request);
        let response = self.runtime.block_on(self.post(&body))?;

        if response.audio_content.is_empty() {
            return Err(BackendError::Upstream("Empty audio content".into()));
        }

        general_purpose::STANDARD
            .decode(response.audio_content.as_bytes())
            .map_err(|e| BackendError::Upstream(format!("Invalid audio payload: {}", e)))
    }
}

fn build_body<'a>(request: &'a SpeechRequest<'a>) -> SynthesizeBody<'a> {
    let input = match &request.input {
        SpeechInput::Text(text) => Input::Text(text),
        SpeechInput::Ssml(ssml) => Input::Ssml(ssml),
    };

    SynthesizeBody {
        input,
        voice: VoiceSelection {
            language_code: language_code(request.voice_name),
            name: request.voice_name,
            model_name: request.model_name,
        },
        audio_config: AudioConfig {
            audio_encoding: "MP3",
            speaking_rate: request.prosody.speaking_rate,
            pitch: request.prosody.pitch,
            volume_gain_db: request.prosody.volume_gain_db,
        },
    }
}

/// Language code from a voice name, e.g. `en-US-Neural2-F` -> `en-US`.
fn language_code(voice_name: &str) -> String {
    let parts: Vec<&str> = voice_name.split('-').collect();
    if parts.len() >= 2 {
        format!("{}-{}", parts[0], parts[1])
    } else {
        voice_name.to_string()
    }
}
