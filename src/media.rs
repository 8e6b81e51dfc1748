use std::io;
use std::path::{Path, PathBuf};

use crate::backends::BackendError;
use crate::decks::{deck_basename, validate_deck_name};
use crate::tts::Tone;

#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    #[error("Image does not exist and generation was skipped (force_generation=false)")]
    GenerationSkipped { expected: PathBuf },

    #[error("{0} backend is not available")]
    BackendUnavailable(&'static str),

    #[error("The image API returned no images")]
    EmptyResponse,

    #[error("Timeout or connection error: {0}")]
    Transient(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Filesystem error: {0}")]
    Filesystem(#[from] io::Error),
}

impl From<BackendError> for MediaError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Transient(msg) => MediaError::Transient(msg),
            BackendError::InvalidRequest(msg) => MediaError::InvalidInput(msg),
            BackendError::NotConfigured(_) | BackendError::Upstream(_) => {
                MediaError::Backend(e.to_string())
            }
        }
    }
}

/// Derives where card images and audio live. Existence on disk is the only
/// record of what has been generated.
#[derive(Debug, Clone)]
pub struct MediaPaths {
    images_dir: PathBuf,
    images_mount: String,
    audio_dir: PathBuf,
}

impl MediaPaths {
    pub fn new(images_dir: PathBuf, images_mount: String, audio_dir: PathBuf) -> Self {
        Self {
            images_dir,
            images_mount,
            audio_dir,
        }
    }

    fn deck_dir(root: &Path, deck: &str) -> Result<PathBuf, MediaError> {
        validate_deck_name(deck).map_err(|e| MediaError::InvalidInput(e.to_string()))?;
        let dir = root.join(deck_basename(deck));
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn image_stem(deck: &str, card_index: usize, def_index: usize) -> String {
        format!("{}_card_{}_def{}", deck_basename(deck), card_index, def_index)
    }

    /// `{images}/{deck}/{deck}_card_{i}_def{d}.jpg`, creating the deck directory.
    pub fn canonical_image_path(
        &self,
        deck: &str,
        card_index: usize,
        def_index: usize,
    ) -> Result<PathBuf, MediaError> {
        let dir = Self::deck_dir(&self.images_dir, deck)?;
        Ok(dir.join(format!("{}.jpg", Self::image_stem(deck, card_index, def_index))))
    }

    /// Existing image for the key, `.jpg` checked before `.jpeg`.
    pub fn find_existing_image(
        &self,
        deck: &str,
        card_index: usize,
        def_index: usize,
    ) -> Result<Option<PathBuf>, MediaError> {
        let dir = Self::deck_dir(&self.images_dir, deck)?;
        let stem = Self::image_stem(deck, card_index, def_index);

        Ok(["jpg", "jpeg"]
            .iter()
            .map(|ext| dir.join(format!("{}.{}", stem, ext)))
            .find(|path| path.is_file()))
    }

    /// URL path an image is served under, e.g. `/card_images/ir/ir_card_0_def0.jpg`.
    pub fn image_web_path(&self, deck: &str, path: &Path) -> String {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        format!("{}/{}/{}", self.images_mount, deck_basename(deck), file_name)
    }

    /// `{audio}/{deck}/{verb_slug}_{tone}.mp3`, creating the deck directory.
    pub fn canonical_audio_path(
        &self,
        deck: &str,
        verb_name: &str,
        tone: Tone,
    ) -> Result<PathBuf, MediaError> {
        let slug = verb_slug(verb_name);
        if slug.is_empty() {
            return Err(MediaError::InvalidInput(format!(
                "verb name '{}' has no usable characters",
                verb_name
            )));
        }
        let dir = Self::deck_dir(&self.audio_dir, deck)?;
        Ok(dir.join(format!("{}_{}.mp3", slug, tone.as_str())))
    }
}

/// Write through a sibling `.part` file so a reader never sees half a file.
pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".part");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)
}

/// Lower-case the verb and collapse every run of other characters into `_`.
pub fn verb_slug(verb_name: &str) -> String {
    let mut slug = String::new();
    let mut pending_sep = false;

    for c in verb_name.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }

    slug
}
