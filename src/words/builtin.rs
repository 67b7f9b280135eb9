use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::words::{normalize_word, WordSource, WordSourceError};

static LISTS_DIR: Dir = include_dir!("src/words/lists");

/// One embedded word list, keyed by difficulty name.
#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl WordList {
    /// Loads the list for a difficulty selector (`easy`, `medium`, `hard`).
    pub fn load(difficulty: &str) -> Result<Self, WordSourceError> {
        let file = LISTS_DIR
            .get_file(format!("{difficulty}.json"))
            .ok_or_else(|| WordSourceError::UnknownDifficulty(difficulty.to_string()))?;
        let list: WordList = serde_json::from_slice(file.contents())?;
        Ok(list)
    }

    /// Uniformly random member of the list.
    pub fn pick(&self) -> Option<&str> {
        self.words
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
    }
}

/// Offline word source backed by the lists compiled into the binary. The
/// default; keeps the game playable with no service configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinSource;

impl WordSource for BuiltinSource {
    fn fetch(&self, difficulty: &str) -> Result<String, WordSourceError> {
        let list = WordList::load(difficulty)?;
        let raw = list.pick().ok_or(WordSourceError::EmptyWord)?;
        normalize_word(raw)
    }
}
