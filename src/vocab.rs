use crate::error::{GazeError, GtResult};
use std::collections::HashSet;
use tracing::warn;

/// Flat candidate set. Membership only; iteration follows insertion order so
/// rankings break ties deterministically.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uppercases `word` and adds it. Returns `Ok(false)` for a duplicate and
    /// an error for anything that is not purely alphabetic.
    pub fn insert(&mut self, word: &str) -> GtResult<bool> {
        let word = word.trim().to_ascii_uppercase();
        if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GazeError::Validation(format!(
                "'{}' is not an alphabetic word",
                word
            )));
        }
        if self.index.contains(&word) {
            return Ok(false);
        }
        self.index.insert(word.clone());
        self.words.push(word);
        Ok(true)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(&word.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn longest_word(&self) -> usize {
        self.words.iter().map(String::len).max().unwrap_or(0)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut vocab = Vocabulary::new();
        for word in iter {
            if let Err(e) = vocab.insert(word.as_ref()) {
                warn!("Skipping vocabulary entry: {}", e);
            }
        }
        vocab
    }
}
