use itertools::Itertools;
use log::debug;
use thiserror::Error;

use crate::sink::PresentationSink;
use crate::stage::{Stage, MAX_WRONG_GUESSES};
use crate::words::{normalize_word, WordSource, WordSourceError};

/// Why a guess was refused. Reported synchronously; a refused guess never
/// changes the round.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GuessError {
    #[error("no input provided")]
    EmptyInput,
    #[error("non-alphabetic character")]
    InvalidCharacter,
    #[error("provide only one letter")]
    InvalidLength,
    #[error("letter has already been guessed")]
    DuplicateGuess,
}

/// One play-through of the game: owns the secret word, the ordered guess
/// history and the win/loss flags. Created by `start` (or `with_word`),
/// discarded once over; nothing survives across rounds.
#[derive(Debug, Clone)]
pub struct Round {
    secret_word: String,
    guesses: Vec<char>,
    wrong_guesses: usize,
    is_over: bool,
    did_win: bool,
}

impl Round {
    /// Starts a round by fetching one word from the source. The difficulty
    /// selector is forwarded verbatim. On success the sink hears
    /// `round_ready`; on any failure no round exists and the caller may
    /// retry.
    pub fn start(
        source: &dyn WordSource,
        difficulty: &str,
        sink: &mut dyn PresentationSink,
    ) -> Result<Self, WordSourceError> {
        let word = source.fetch(difficulty)?;
        Self::with_word(&word, sink)
    }

    /// Starts a round around an already-acquired word. Normalizes to
    /// lowercase and rejects empty or non-alphabetic words so play can
    /// never begin with a malformed secret.
    pub fn with_word(
        raw: &str,
        sink: &mut dyn PresentationSink,
    ) -> Result<Self, WordSourceError> {
        let secret_word = normalize_word(raw)?;
        debug!("secret word for this round: {secret_word}");

        let round = Self {
            secret_word,
            guesses: Vec::new(),
            wrong_guesses: 0,
            is_over: false,
            did_win: false,
        };
        sink.round_ready();
        Ok(round)
    }

    /// Submits one guess. Validation order: empty input, non-alphabetic
    /// content, length, duplicate; the first violation is returned and the
    /// round is untouched. An accepted letter is recorded and classified,
    /// which may end the round through the sink.
    pub fn guess(
        &mut self,
        input: &str,
        sink: &mut dyn PresentationSink,
    ) -> Result<(), GuessError> {
        if self.is_over {
            // The shell disables input once the round is over; stray calls
            // are ignored rather than re-counted.
            return Ok(());
        }

        let mut chars = input.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => return Err(GuessError::EmptyInput),
        };
        if !input.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GuessError::InvalidCharacter);
        }
        if chars.next().is_some() {
            return Err(GuessError::InvalidLength);
        }

        let letter = first.to_ascii_lowercase();
        if self.guesses.contains(&letter) {
            return Err(GuessError::DuplicateGuess);
        }

        self.guesses.push(letter);
        if self.secret_word.contains(letter) {
            self.check_win(sink);
        } else {
            self.on_wrong_guess(sink);
        }
        Ok(())
    }

    /// Recomputes word coverage after a correct guess. Idempotent; flips the
    /// two flags and emits the terminal event once the whole word is known.
    fn check_win(&mut self, sink: &mut dyn PresentationSink) {
        let covered = self
            .secret_word
            .chars()
            .all(|c| self.guesses.contains(&c));
        if covered {
            self.did_win = true;
            self.is_over = true;
            sink.round_ended(true, &self.secret_word);
        }
    }

    /// Books one miss against the budget and announces the stage it reveals.
    /// The sixth miss is a terminal loss regardless of partial coverage.
    fn on_wrong_guess(&mut self, sink: &mut dyn PresentationSink) {
        self.wrong_guesses += 1;
        if let Some(stage) = Stage::for_wrong_guess(self.wrong_guesses) {
            sink.failure_stage(stage);
        }
        if self.wrong_guesses == MAX_WRONG_GUESSES {
            self.is_over = true;
            self.did_win = false;
            sink.round_ended(false, &self.secret_word);
        }
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    /// Accepted guesses in submission order, lowercased, no duplicates.
    pub fn guessed_letters(&self) -> &[char] {
        &self.guesses
    }

    pub fn wrong_guesses(&self) -> usize {
        self.wrong_guesses
    }

    /// Misses still available before the round is lost.
    pub fn misses_remaining(&self) -> usize {
        MAX_WRONG_GUESSES - self.wrong_guesses
    }

    pub fn is_over(&self) -> bool {
        self.is_over
    }

    /// Meaningful only once `is_over` is true.
    pub fn did_win(&self) -> bool {
        self.did_win
    }

    /// One entry per secret-word position, in order: `Some(letter)` where
    /// the letter has been guessed, `None` otherwise.
    pub fn masked(&self) -> Vec<Option<char>> {
        self.secret_word
            .chars()
            .map(|c| self.guesses.contains(&c).then_some(c))
            .collect()
    }

    /// Default mask rendering: revealed letters and `-` placeholders joined
    /// by spaces, e.g. `b - - -` once `b` is guessed in `book`.
    pub fn masked_text(&self) -> String {
        self.masked()
            .into_iter()
            .map(|slot| slot.unwrap_or('-'))
            .join(" ")
    }

    /// Comma-joined guess history, e.g. `b, o, x`.
    pub fn guesses_text(&self) -> String {
        self.guesses.iter().join(", ")
    }
}
