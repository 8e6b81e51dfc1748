use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::{deck_filename, validate_deck_name, Card, DeckError, DeckRepository};
use crate::locks::{hold, KeyedLocks};

/// Decks stored as one pretty-printed JSON array per file.
pub struct JsonDeckStore {
    dir: PathBuf,
    locks: KeyedLocks,
}

impl JsonDeckStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            locks: KeyedLocks::new(),
        }
    }

    fn deck_path(&self, name: &str) -> Result<PathBuf, DeckError> {
        validate_deck_name(name)?;
        let path = self.dir.join(deck_filename(name));
        if !path.is_file() {
            return Err(DeckError::NotFound(deck_filename(name)));
        }
        Ok(path)
    }

    fn modify<F>(&self, name: &str, change: F) -> Result<(), DeckError>
    where
        F: FnOnce(&mut Vec<Card>) -> Result<(), DeckError>,
    {
        let lock = self.locks.get(&deck_filename(name));
        let _guard = hold(&lock);

        let path = self.deck_path(name)?;
        let mut cards = read_cards(&path)?;
        change(&mut cards)?;
        write_cards(&path, &cards)
    }
}

impl DeckRepository for JsonDeckStore {
    fn list_decks(&self) -> Result<Vec<String>, DeckError> {
        let mut files = Vec::new();

        if !self.dir.exists() {
            return Ok(files);
        }

        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Some(name) = path.file_name() {
                    files.push(name.to_string_lossy().to_string());
                }
            }
        }

        files.sort();
        Ok(files)
    }

    fn get_deck_data(&self, name: &str) -> Result<Vec<Card>, DeckError> {
        let path = self.deck_path(name)?;
        read_cards(&path)
    }

    fn update_card_status(&self, name: &str, index: i64, learned: bool) -> Result<(), DeckError> {
        self.modify(name, |cards| {
            let len = cards.len();
            let card = usize::try_from(index)
                .ok()
                .and_then(|i| cards.get_mut(i))
                .ok_or(DeckError::OutOfRange { index, len })?;
            card.learned = learned;
            Ok(())
        })?;

        tracing::info!("Deck '{}': card {} learned={}", name, index, learned);
        Ok(())
    }

    fn reset_deck_status(&self, name: &str) -> Result<(), DeckError> {
        self.modify(name, |cards| {
            cards.iter_mut().for_each(Card::reset);
            Ok(())
        })?;

        tracing::info!("Deck '{}': all cards reset", name);
        Ok(())
    }
}

fn read_cards(path: &Path) -> Result<Vec<Card>, DeckError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Write the whole deck to a sibling temp file, then rename over the original.
fn write_cards(path: &Path, cards: &[Card]) -> Result<(), DeckError> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    cards.serialize(&mut serializer)?;

    let tmp = path.with_extension("json.tmp");
    {
        let mut file = File::create(&tmp)?;
        file.write_all(&buffer)?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}
