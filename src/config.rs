use std::path::PathBuf;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("PORT must be a number, got '{0}'")]
    InvalidPort(String),

    #[error("SERVER_TIMEOUT must be a whole number of seconds, got '{0}'")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub decks_dir: PathBuf,
    pub images_dir: PathBuf,
    /// URL prefix the images directory is served under, e.g. `/card_images`.
    pub images_mount: String,
    pub audio_dir: PathBuf,
    pub project_id: Option<String>,
    pub region: String,
    pub imagen_model: String,
    pub access_token: Option<String>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port_raw = var("PORT", "8000");
        let port = port_raw
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port_raw.clone()))?;

        let timeout_raw = var("SERVER_TIMEOUT", "300");
        let timeout_secs: u64 = timeout_raw
            .parse()
            .map_err(|_| ConfigError::InvalidTimeout(timeout_raw.clone()))?;

        let base_dir = PathBuf::from(var("BASE_DIR", "."));
        let static_dir = base_dir.join(var("STATIC_DIR", "static"));
        let decks_dir = static_dir.join(var("JSON_SUB_DIR", "json"));

        let images_sub = var("CARD_IMAGES_BASE_DIR", "card_images");
        let images_mount = format!("/{}", images_sub.trim_matches('/'));
        let images_dir = base_dir.join(&images_sub);
        let audio_dir = base_dir.join(var("AUDIO_DIR", "card_audio"));

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port,
            static_dir,
            decks_dir,
            images_dir,
            images_mount,
            audio_dir,
            project_id: optional("PROJECT_ID"),
            region: var("REGION", "us-central1"),
            imagen_model: var("IMAGEN_MODEL", "imagen-3.0-generate-002"),
            access_token: optional("GOOGLE_ACCESS_TOKEN"),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Create every directory the server writes into.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [&self.decks_dir, &self.images_dir, &self.audio_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}
