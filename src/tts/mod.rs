pub mod tone;

use std::path::PathBuf;
use std::sync::Arc;

use crate::backends::{SpeechRequest, SpeechSynthesizer};
use crate::decks::deck_basename;
use crate::dsl;
use crate::locks::{hold, KeyedLocks};
use crate::media::{verb_slug, write_file, MediaError, MediaPaths};

pub use tone::Tone;

/// Google's per-request input limit.
const MAX_TEXT_BYTES: usize = 5000;

#[derive(Debug, Clone)]
pub struct SpeechParams<'a> {
    pub deck: &'a str,
    pub text: &'a str,
    pub voice_name: &'a str,
    pub model_name: Option<&'a str>,
    pub tone: &'a str,
    pub verb_name: &'a str,
}

#[derive(Debug)]
pub struct SynthesizedAudio {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub reused: bool,
}

impl SynthesizedAudio {
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// One audio file per `(deck, verb)`: reused while the tone matches, replaced
/// when it changes.
pub struct AudioService {
    paths: MediaPaths,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    locks: KeyedLocks,
}

impl AudioService {
    pub fn new(paths: MediaPaths, synthesizer: Option<Arc<dyn SpeechSynthesizer>>) -> Self {
        Self {
            paths,
            synthesizer,
            locks: KeyedLocks::new(),
        }
    }

    pub fn synthesize_or_reuse(
        &self,
        params: &SpeechParams<'_>,
    ) -> Result<SynthesizedAudio, MediaError> {
        let tone = validate(params)?;
        let path = self
            .paths
            .canonical_audio_path(params.deck, params.verb_name, tone)?;

        let lock = self.locks.get(&format!(
            "{}/{}",
            deck_basename(params.deck),
            verb_slug(params.verb_name)
        ));
        let _guard = hold(&lock);

        if path.is_file() {
            tracing::info!("Reusing audio {}", path.display());
            return Ok(SynthesizedAudio {
                bytes: std::fs::read(&path)?,
                path,
                reused: true,
            });
        }

        let synthesizer = self
            .synthesizer
            .as_ref()
            .ok_or(MediaError::BackendUnavailable("Text-to-speech"))?;

        self.remove_other_tones(params, tone)?;

        let request = SpeechRequest {
            input: dsl::to_speech_input(params.text),
            voice_name: params.voice_name,
            model_name: params.model_name,
            prosody: tone.prosody(),
        };

        tracing::info!(
            "Synthesizing '{}' ({}, tone={})",
            params.verb_name,
            params.voice_name,
            tone
        );
        let bytes = synthesizer.synthesize(&request).map_err(|e| {
            tracing::warn!("Speech synthesis failed: {}", e);
            MediaError::from(e)
        })?;

        write_file(&path, &bytes)?;

        Ok(SynthesizedAudio {
            path,
            bytes,
            reused: false,
        })
    }

    fn remove_other_tones(&self, params: &SpeechParams<'_>, keep: Tone) -> Result<(), MediaError> {
        for other in Tone::ALL.into_iter().filter(|t| *t != keep) {
            let stale = self
                .paths
                .canonical_audio_path(params.deck, params.verb_name, other)?;
            if stale.is_file() {
                std::fs::remove_file(&stale)?;
                tracing::info!("Tone changed to {}: removed {}", keep, stale.display());
            }
        }
        Ok(())
    }
}

fn validate(params: &SpeechParams<'_>) -> Result<Tone, MediaError> {
    if params.text.trim().is_empty() {
        return Err(MediaError::InvalidInput("Text cannot be empty".into()));
    }

    if params.text.len() > MAX_TEXT_BYTES {
        return Err(MediaError::InvalidInput(format!(
            "Text too long (max {} bytes)",
            MAX_TEXT_BYTES
        )));
    }

    if params.voice_name.trim().is_empty() {
        return Err(MediaError::InvalidInput("Voice cannot be empty".into()));
    }

    if params.verb_name.trim().is_empty() {
        return Err(MediaError::InvalidInput("Verb name cannot be empty".into()));
    }

    params
        .tone
        .parse::<Tone>()
        .map_err(|e| MediaError::InvalidInput(e.to_string()))
}
