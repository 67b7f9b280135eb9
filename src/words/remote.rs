use log::debug;
use serde::Deserialize;

use crate::words::{normalize_word, WordSource, WordSourceError};

/// Payload shape of the word-supply service: `{ "word": "book" }`.
#[derive(Debug, Deserialize)]
struct WordPayload {
    word: String,
}

/// Client for a remote word-supply endpoint. The service takes the
/// difficulty as a query parameter and answers with a single-word JSON
/// object; anything honoring that contract can stand in.
#[derive(Clone, Debug)]
pub struct RemoteSource {
    base_url: String,
}

impl RemoteSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn request_url(&self, difficulty: &str) -> String {
        format!("{}?difficulty={}", self.base_url, difficulty)
    }
}

fn parse_word_payload(body: &str) -> Result<String, WordSourceError> {
    let payload: WordPayload = serde_json::from_str(body)?;
    normalize_word(&payload.word)
}

impl WordSource for RemoteSource {
    fn fetch(&self, difficulty: &str) -> Result<String, WordSourceError> {
        let url = self.request_url(difficulty);
        debug!("requesting word from {url}");
        let body = reqwest::blocking::get(&url)?.error_for_status()?.text()?;
        parse_word_payload(&body)
    }
}
