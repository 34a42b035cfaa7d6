use chrono::Local;

use super::letters::{DawgType, MAX_WORD_LENGTH};

/// Settings for one lexicon build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexiconConfig {
    /// Lexicon name stored in the header.
    pub name: String,
    /// Free-form date stored in the header.
    pub date: String,
    /// Which sub-lexicons are built.
    pub dawg_type: DawgType,
    /// Words read from a word list are truncated to this many letters.
    pub max_word_length: usize,
}

impl Default for LexiconConfig {
    /// Name "Lexicon", today's date as e.g. "07 March 2025", forward words only, and
    /// [`MAX_WORD_LENGTH`] letters.
    fn default() -> Self {
        LexiconConfig {
            name: "Lexicon".to_owned(),
            date: Local::now().format("%d %B %Y").to_string(),
            dawg_type: DawgType::default(),
            max_word_length: MAX_WORD_LENGTH,
        }
    }
}

impl LexiconConfig {
    /// Sets the lexicon name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the date string stored verbatim in the header.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Selects which sub-lexicons are built.
    pub fn with_dawg_type(mut self, dawg_type: DawgType) -> Self {
        self.dawg_type = dawg_type;
        self
    }

    /// Sets the length at which [`WordSource`](super::source::WordSource) truncates words.
    pub fn with_max_word_length(mut self, max_word_length: usize) -> Self {
        self.max_word_length = max_word_length;
        self
    }
}
