pub mod builtin;
pub mod remote;

// Re-export the concrete sources for convenience
pub use builtin::{BuiltinSource, WordList};
pub use remote::RemoteSource;

use thiserror::Error;

/// Failure modes for word acquisition. Any of these aborts the pending
/// start; the round never begins with a malformed secret.
#[derive(Debug, Error)]
pub enum WordSourceError {
    #[error("word service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("word service returned an unreadable payload: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("word source returned an empty word")]
    EmptyWord,
    #[error("word source returned a non-alphabetic word {0:?}")]
    NotAlphabetic(String),
    #[error("no word list for difficulty {0:?}")]
    UnknownDifficulty(String),
}

/// Capability supplying one secret word per call.
///
/// `difficulty` is an opaque selector forwarded by the caller; each source
/// interprets it its own way (list name, query parameter, ignored).
pub trait WordSource {
    fn fetch(&self, difficulty: &str) -> Result<String, WordSourceError>;
}

/// Lowercases a raw word and enforces the source contract: non-empty and
/// ASCII-alphabetic. Every word enters a round through this.
pub fn normalize_word(raw: &str) -> Result<String, WordSourceError> {
    let word = raw.to_lowercase();
    if word.is_empty() {
        return Err(WordSourceError::EmptyWord);
    }
    if !word.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(WordSourceError::NotAlphabetic(word));
    }
    Ok(word)
}

/// Source that always supplies the same word. Backs the `--word` flag and
/// keeps tests independent of lists and networks.
#[derive(Clone, Debug)]
pub struct FixedSource {
    word: String,
}

impl FixedSource {
    pub fn new(word: impl Into<String>) -> Self {
        Self { word: word.into() }
    }
}

impl WordSource for FixedSource {
    fn fetch(&self, _difficulty: &str) -> Result<String, WordSourceError> {
        normalize_word(&self.word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize_word("BoOk").unwrap(), "book");
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(matches!(
            normalize_word(""),
            Err(WordSourceError::EmptyWord)
        ));
    }

    #[test]
    fn test_normalize_rejects_digits_and_spaces() {
        assert!(matches!(
            normalize_word("b00k"),
            Err(WordSourceError::NotAlphabetic(_))
        ));
        assert!(matches!(
            normalize_word("two words"),
            Err(WordSourceError::NotAlphabetic(_))
        ));
    }

    #[test]
    fn test_fixed_source_normalizes() {
        let source = FixedSource::new("Cat");
        assert_eq!(source.fetch("easy").unwrap(), "cat");
    }

    #[test]
    fn test_fixed_source_ignores_difficulty() {
        let source = FixedSource::new("cat");
        assert_eq!(source.fetch("easy").unwrap(), "cat");
        assert_eq!(source.fetch("anything").unwrap(), "cat");
    }

    #[test]
    fn test_fixed_source_propagates_invalid_word() {
        let source = FixedSource::new("not a word");
        assert!(source.fetch("easy").is_err());
    }
}
