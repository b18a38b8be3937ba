//! Canonical dictionary records.

use serde::{Deserialize, Serialize};

/// Canonical part-of-speech substituted for unknown tags and used for formats
/// that carry no part-of-speech at all.
pub const DEFAULT_PART_OF_SPEECH: &str = "名詞";

/// A single dictionary entry.
///
/// `part_of_speech` always holds the canonical label between parsing and
/// rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Reading (yomi)
    pub pronunciation: String,
    /// Surface form
    pub word: String,
    /// Canonical part-of-speech (hinshi)
    pub part_of_speech: String,
}

impl Record {
    /// Creates a new record.
    pub fn new(
        pronunciation: impl Into<String>,
        word: impl Into<String>,
        part_of_speech: impl Into<String>,
    ) -> Self {
        Self {
            pronunciation: pronunciation.into(),
            word: word.into(),
            part_of_speech: part_of_speech.into(),
        }
    }

    /// Creates a record tagged with [`DEFAULT_PART_OF_SPEECH`].
    pub fn noun(pronunciation: impl Into<String>, word: impl Into<String>) -> Self {
        Self::new(pronunciation, word, DEFAULT_PART_OF_SPEECH)
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.pronunciation, self.word, self.part_of_speech
        )
    }
}
