use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::backends::{ImageGenerator, ImageRequest};
use crate::decks::deck_basename;
use crate::locks::{hold, KeyedLocks};
use crate::media::{write_file, MediaError, MediaPaths};

const ASPECT_RATIO: &str = "1:1";

#[derive(Debug, Clone)]
pub struct ImageKey<'a> {
    pub deck: &'a str,
    pub card_index: usize,
    pub def_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Deleted {
    Removed(PathBuf),
    NotFound,
}

impl ImageKey<'_> {
    fn lock_key(&self) -> String {
        format!(
            "{}/{}/{}",
            deck_basename(self.deck),
            self.card_index,
            self.def_index
        )
    }
}

pub struct ImageService {
    paths: MediaPaths,
    generator: Option<Arc<dyn ImageGenerator>>,
    locks: KeyedLocks,
}

impl ImageService {
    pub fn new(paths: MediaPaths, generator: Option<Arc<dyn ImageGenerator>>) -> Self {
        Self {
            paths,
            generator,
            locks: KeyedLocks::new(),
        }
    }

    pub fn paths(&self) -> &MediaPaths {
        &self.paths
    }

    /// Existing image for the key, or a freshly generated one when `force` is set.
    pub fn generate_or_fetch(
        &self,
        prompt: &str,
        key: &ImageKey<'_>,
        force: bool,
    ) -> Result<PathBuf, MediaError> {
        let lock = self.locks.get(&key.lock_key());
        let _guard = hold(&lock);

        if let Some(existing) =
            self.paths
                .find_existing_image(key.deck, key.card_index, key.def_index)?
        {
            tracing::info!("Image already exists: {}", existing.display());
            return Ok(existing);
        }

        let path = self
            .paths
            .canonical_image_path(key.deck, key.card_index, key.def_index)?;

        if !force {
            return Err(MediaError::GenerationSkipped { expected: path });
        }

        let generator = self
            .generator
            .as_ref()
            .ok_or(MediaError::BackendUnavailable("Image generation"))?;

        if prompt.trim().is_empty() {
            return Err(MediaError::InvalidInput("Prompt cannot be empty".into()));
        }

        tracing::info!(
            "Generating image {} for: '{}'",
            path.display(),
            prompt.chars().take(80).collect::<String>()
        );

        let request = ImageRequest {
            prompt,
            count: 1,
            aspect_ratio: ASPECT_RATIO,
        };
        let images = generator.generate(&request).map_err(|e| {
            tracing::warn!("Image generation failed: {}", e);
            MediaError::from(e)
        })?;

        let image = images.into_iter().next().ok_or(MediaError::EmptyResponse)?;
        if let Some(mime) = image.mime_type.as_deref().filter(|m| *m != "image/jpeg") {
            tracing::warn!("Backend returned {} for {}", mime, path.display());
        }

        write_file(&path, &image.bytes)?;
        tracing::info!("Generated {}", path.display());
        Ok(path)
    }

    /// Removing an image that is not there is not an error.
    pub fn delete(&self, key: &ImageKey<'_>) -> Result<Deleted, MediaError> {
        let lock = self.locks.get(&key.lock_key());
        let _guard = hold(&lock);

        let Some(path) = self
            .paths
            .find_existing_image(key.deck, key.card_index, key.def_index)?
        else {
            return Ok(Deleted::NotFound);
        };

        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!("Deleted image {}", path.display());
                Ok(Deleted::Removed(path))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Deleted::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}
