pub mod card;
pub mod store;

pub use card::Card;
pub use store::JsonDeckStore;

#[derive(thiserror::Error, Debug)]
pub enum DeckError {
    #[error("Deck not found: {0}")]
    NotFound(String),

    #[error("Card index {index} out of range (deck has {len} cards)")]
    OutOfRange { index: i64, len: usize },

    #[error("Invalid deck name: '{0}'")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed deck file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence for decks. Every call reads the backing store fresh.
pub trait DeckRepository: Send + Sync {
    fn list_decks(&self) -> Result<Vec<String>, DeckError>;

    fn get_deck_data(&self, name: &str) -> Result<Vec<Card>, DeckError>;

    fn update_card_status(&self, name: &str, index: i64, learned: bool) -> Result<(), DeckError>;

    fn reset_deck_status(&self, name: &str) -> Result<(), DeckError>;
}

/// Deck name with any `.json` suffix stripped, e.g. `ir.json` -> `ir`.
pub fn deck_basename(name: &str) -> &str {
    name.strip_suffix(".json").unwrap_or(name)
}

/// File name for a deck: the name itself when it already ends in `.json`.
pub fn deck_filename(name: &str) -> String {
    if name.ends_with(".json") {
        name.to_string()
    } else {
        format!("{}.json", name)
    }
}

/// Reject names that would escape the deck directory.
pub fn validate_deck_name(name: &str) -> Result<(), DeckError> {
    let base = deck_basename(name);
    if base.trim().is_empty() || base.contains(['/', '\\']) || base.contains("..") {
        return Err(DeckError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_suffix() {
        assert_eq!(deck_basename("ir.json"), "ir");
        assert_eq!(deck_basename("ir"), "ir");
    }

    #[test]
    fn appends_json_suffix_once() {
        assert_eq!(deck_filename("ir"), "ir.json");
        assert_eq!(deck_filename("ir.json"), "ir.json");
    }

    #[test]
    fn rejects_path_like_names() {
        for bad in ["", ".json", "../secrets", "a/b", "a\\b", "  "] {
            assert!(
                matches!(validate_deck_name(bad), Err(DeckError::InvalidName(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(validate_deck_name("phrasal_verbs.json").is_ok());
    }
}
