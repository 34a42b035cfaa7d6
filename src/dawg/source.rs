//! Reading word lists: one word per line, `#` comments, case-folded to uppercase.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use super::error::{DawgError, Result};

/// Iterator over the words of a word list.
///
/// Blank lines and lines starting with `#` are skipped, letters are uppercased and words
/// longer than the configured maximum are truncated.
///
/// # Examples
///
/// ```
/// use lexdawg::WordSource;
///
/// let list = "# fruit\napple\n\n  Banana\n";
/// let words: Vec<String> = WordSource::new(list.as_bytes(), 64)
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(words, ["APPLE", "BANANA"]);
/// ```
#[derive(Debug)]
pub struct WordSource<R> {
    reader: R,
    buf: String,
    max_word_length: usize,
    line: usize,
    truncated: usize,
}

impl WordSource<BufReader<File>> {
    /// Opens the word list at `path`.
    pub fn from_path(path: impl AsRef<Path>, max_word_length: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(DawgError::file_io(path))?;
        debug!("Reading word list {}", path.display());
        Ok(Self::new(BufReader::new(file), max_word_length))
    }
}

impl<R: BufRead> WordSource<R> {
    /// Reads words from any buffered reader.
    pub fn new(reader: R, max_word_length: usize) -> Self {
        WordSource {
            reader,
            buf: String::with_capacity(80),
            max_word_length,
            line: 0,
            truncated: 0,
        }
    }

    /// Number of words truncated so far.
    pub fn truncated(&self) -> usize {
        self.truncated
    }

    fn clean(&mut self) -> Option<String> {
        let line = self.buf.trim();
        if line.is_empty() || is_comment(line) {
            return None;
        }
        let mut word = line.to_uppercase();
        if let Some((cut, _)) = word.char_indices().nth(self.max_word_length) {
            warn!(
                "Line {}: word truncated to {} letters: {word}",
                self.line, self.max_word_length
            );
            word.truncate(cut);
            self.truncated += 1;
        }
        Some(word)
    }
}

impl<R: BufRead> Iterator for WordSource<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        // read_line reuses one buffer instead of allocating a string per line.
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line += 1,
                Err(err) => return Some(Err(err.into())),
            }
            if let Some(word) = self.clean() {
                return Some(Ok(word));
            }
        }
    }
}

/// Returns true if this line is a comment.
pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

#[cfg(test)]
mod test {
    use super::*;

    fn words(text: &str, max_word_length: usize) -> Vec<String> {
        WordSource::new(text.as_bytes(), max_word_length)
            .collect::<Result<_>>()
            .unwrap()
    }

    #[test]
    fn comment_that_starts_with_pound() {
        assert!(is_comment("# This is a comment"));
    }

    #[test]
    fn comment_with_whitespace_before_pound() {
        assert!(is_comment("        # This is a comment with whitespace"));
    }

    #[test]
    fn non_comment() {
        assert!(!is_comment("REVERBERATE"));
        assert!(!is_comment(" REVERBERATE"));
        assert!(!is_comment("REVERB#ERATE"));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# header\nalpha\r\n\n   \n  # indented comment\nBravo\ncharlie";
        assert_eq!(words(text, 64), ["ALPHA", "BRAVO", "CHARLIE"]);
    }

    #[test]
    fn long_words_are_truncated() {
        let mut source = WordSource::new("abcdefgh\nabc\n".as_bytes(), 5);
        assert_eq!(source.next().unwrap().unwrap(), "ABCDE");
        assert_eq!(source.next().unwrap().unwrap(), "ABC");
        assert!(source.next().is_none());
        assert_eq!(source.truncated(), 1);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = WordSource::from_path("no/such/word/list.txt", 64).unwrap_err();
        match err {
            DawgError::FileIo { path, .. } => assert!(path.ends_with("list.txt")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
