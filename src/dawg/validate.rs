//! Checks a saved DAWG against the word list it was built from.

use std::path::Path;

use hashbrown::HashSet;
use log::{info, warn};

use super::config::LexiconConfig;
use super::error::Result;
use super::letters::{Category, Letters, MAX_WORD_LENGTH};
use super::lexicon::Dawg;
use super::source::WordSource;

/// Loads the DAWG at `path` and checks it against the word list at `word_list_path`.
///
/// Returns `Ok(true)` if every word of the list, and every wordlet the DAWG type derives
/// from it, is found, and the DAWG holds no entry beyond those. Each discrepancy is logged
/// at `warn` level. Words are read with the default maximum length of
/// [`MAX_WORD_LENGTH`]; use [`validate_with`] for lexicons built with another one.
///
/// # Errors
///
/// Fails if either file cannot be read or the DAWG does not load.
pub fn validate(path: impl AsRef<Path>, word_list_path: impl AsRef<Path>) -> Result<bool> {
    validate_file(path.as_ref(), word_list_path.as_ref(), MAX_WORD_LENGTH)
}

/// Like [`validate`], but reads the word list the way a build with `config` did, so words
/// are truncated at `config.max_word_length`.
pub fn validate_with(
    path: impl AsRef<Path>,
    word_list_path: impl AsRef<Path>,
    config: &LexiconConfig,
) -> Result<bool> {
    validate_file(path.as_ref(), word_list_path.as_ref(), config.max_word_length)
}

fn validate_file(path: &Path, word_list_path: &Path, max_word_length: usize) -> Result<bool> {
    let dawg = Dawg::load(path)?;
    let words = WordSource::from_path(word_list_path, max_word_length)?.collect::<Result<Vec<_>>>()?;
    let valid = validate_words(&dawg, words);
    if valid {
        info!("'{}' is valid", dawg.header().lexicon_name);
    }
    Ok(valid)
}

/// Checks `dawg` against an in-memory word list, with the same rules as [`validate`].
pub fn validate_words<S: AsRef<str>>(dawg: &Dawg, words: impl IntoIterator<Item = S>) -> bool {
    let dawg_type = dawg.header().dawg_type;
    let mut expected: [HashSet<Letters>; 3] = Default::default();
    for word in words {
        let letters: Letters = word.as_ref().bytes().collect();
        if letters.is_empty() {
            continue;
        }
        if dawg_type.includes(Category::ReverseWordlet) {
            for end in 1..=letters.len() {
                expected[Category::ReverseWordlet as usize].insert(letters[..end].iter().rev().copied().collect());
            }
        }
        if dawg_type.includes(Category::ForwardWordlet) {
            for start in 0..letters.len() {
                expected[Category::ForwardWordlet as usize].insert(letters[start..].iter().copied().collect());
            }
        }
        expected[Category::ForwardWord as usize].insert(letters);
    }

    let mut valid = true;
    for category in Category::ALL {
        let entries = &expected[category as usize];
        for entry in entries {
            if !dawg.contains(category, entry.as_slice()) {
                warn!(
                    "Missing {}: {}",
                    category.describe(),
                    String::from_utf8_lossy(entry)
                );
                valid = false;
            }
        }
        let stored = match category {
            Category::ForwardWord => dawg.count_words(),
            Category::ReverseWordlet => dawg.count_reverse_wordlets(),
            Category::ForwardWordlet => dawg.count_forward_wordlets(),
        };
        if stored as usize != entries.len() {
            warn!(
                "DAWG stores {stored} {}, the word list implies {}",
                category.describe(),
                entries.len()
            );
            valid = false;
        }
    }
    valid
}
