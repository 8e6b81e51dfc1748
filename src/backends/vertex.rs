use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

use super::{BackendError, GeneratedImage, ImageGenerator, ImageRequest};
use crate::config::Config;

/// Imagen on Vertex AI, called through the REST `:predict` endpoint.
pub struct VertexImagen {
    client: reqwest::Client,
    runtime: Handle,
    endpoint: String,
    access_token: String,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: [Instance<'a>; 1],
    parameters: Parameters<'a>,
}

#[derive(Debug, Serialize)]
struct Instance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters<'a> {
    sample_count: u32,
    aspect_ratio: &'a str,
    output_options: OutputOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions {
    mime_type: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

impl VertexImagen {
    pub fn new(config: &Config, runtime: Handle) -> Result<Self, BackendError> {
        let project = config
            .project_id
            .as_deref()
            .ok_or(BackendError::NotConfigured("PROJECT_ID"))?;
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
            endpoint: predict_endpoint(project, &config.region, &config.imagen_model),
            access_token,
        })
    }

    async fn predict(&self, body: &PredictRequest<'_>) -> Result<PredictResponse, BackendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(BackendError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BackendError::from_status(status, &text));
        }

        response.json().await.map_err(BackendError::from_reqwest)
    }
}

impl ImageGenerator for VertexImagen {
    fn generate(&self, request: &ImageRequest<'_>) -> Result<Vec<GeneratedImage>, BackendError> {
        let body = PredictRequest {
            instances: [Instance {
                prompt: request.prompt,
            }],
            parameters: Parameters {
                sample_count: request.count,
                aspect_ratio: request.aspect_ratio,
                output_options: OutputOptions {
                    mime_type: "image/jpeg",
                },
            },
        };

        let response = self.runtime.block_on(self.predict(&body))?;
        decode_predictions(response)
    }
}

fn predict_endpoint(project: &str, region: &str, model: &str) -> String {
    format!(
        "https://{region}-aiplatform.googleapis.com/v1/projects/{project}/locations/{region}/publishers/google/models/{model}:predict"
    )
}

/// Predictions filtered by safety checks carry no bytes and are dropped.
fn decode_predictions(response: PredictResponse) -> Result<Vec<GeneratedImage>, BackendError> {
    response
        .predictions
        .into_iter()
        .filter_map(|p| p.bytes_base64_encoded.map(|b| (b, p.mime_type)))
        .map(|(encoded, mime_type)| {
            let bytes = general_purpose::STANDARD
                .decode(encoded.as_bytes())
                .map_err(|e| BackendError::Upstream(format!("Invalid image payload: {}", e)))?;
            Ok(GeneratedImage { bytes, mime_type })
        })
        .collect()
}
