use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use super::error::{DawgError, HeaderDefect, Result};

/// Letter stored in the root node.
pub const ROOT_LETTER: u8 = b' ';
/// Marker under which full forward words are stored.
pub const FORWARD_WORD_MARKER: u8 = b'*';
/// Marker under which reversed prefixes ("reverse wordlets") are stored.
pub const REVERSE_WORDLET_MARKER: u8 = b'<';
/// Marker under which suffixes ("forward wordlets") are stored.
pub const FORWARD_WORDLET_MARKER: u8 = b'>';

/// First valid word letter.
pub const START_LETTER: u8 = b'A';
/// Last valid word letter.
pub const END_LETTER: u8 = b'Z';

/// Words longer than this are truncated by [`WordSource`](super::source::WordSource).
pub const MAX_WORD_LENGTH: usize = 64;

/// One of the sub-lexicons stored below the root, each under its own marker node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Complete words.
    ForwardWord,
    /// Reversed prefixes of words.
    ReverseWordlet,
    /// Suffixes of words.
    ForwardWordlet,
}

impl Category {
    /// All categories in marker-letter order.
    pub const ALL: [Category; 3] = [
        Category::ForwardWord,
        Category::ReverseWordlet,
        Category::ForwardWordlet,
    ];

    /// The marker letter of this category's sentinel node.
    pub const fn marker(self) -> u8 {
        match self {
            Category::ForwardWord => FORWARD_WORD_MARKER,
            Category::ReverseWordlet => REVERSE_WORDLET_MARKER,
            Category::ForwardWordlet => FORWARD_WORDLET_MARKER,
        }
    }

    pub(crate) fn describe(self) -> &'static str {
        match self {
            Category::ForwardWord => "words",
            Category::ReverseWordlet => "reverse wordlets",
            Category::ForwardWordlet => "forward wordlets",
        }
    }
}

/// Which sub-lexicons a DAWG carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DawgType {
    /// Full words only.
    #[default]
    ForwardWord,
    /// Full words plus reversed prefixes, for cross-check queries.
    ForwardWordAndReverseWordlet,
    /// Full words, reversed prefixes and suffixes.
    All,
}

impl DawgType {
    /// Returns true if words added to a builder of this type also produce entries in `category`.
    pub fn includes(self, category: Category) -> bool {
        match category {
            Category::ForwardWord => true,
            Category::ReverseWordlet => self != DawgType::ForwardWord,
            Category::ForwardWordlet => self == DawgType::All,
        }
    }

    /// The tag written in the file header.
    pub fn as_str(self) -> &'static str {
        match self {
            DawgType::ForwardWord => "ForwardWord",
            DawgType::ForwardWordAndReverseWordlet => "ForwardWordAndReverseWordlet",
            DawgType::All => "All",
        }
    }
}

impl fmt::Display for DawgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DawgType {
    type Err = DawgError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ForwardWord" => Ok(DawgType::ForwardWord),
            "ForwardWordAndReverseWordlet" => Ok(DawgType::ForwardWordAndReverseWordlet),
            "All" => Ok(DawgType::All),
            other => Err(HeaderDefect::UnknownDawgType(other.to_string()).into()),
        }
    }
}

/// A word as a buffer of letters.
pub type Letters = SmallVec<[u8; 32]>;

/// Trait for types that can be inserted as a word.
///
/// Implemented for string and byte sequence types so that
/// [`DawgBuilder::add_word`](super::builder::DawgBuilder::add_word) accepts them directly.
pub trait IntoWord {
    /// Collects this word into a letter buffer.
    fn collect_word(self) -> Letters;
}

impl IntoWord for &str {
    fn collect_word(self) -> Letters {
        self.bytes().collect()
    }
}

impl IntoWord for &&str {
    fn collect_word(self) -> Letters {
        self.bytes().collect()
    }
}

impl IntoWord for String {
    fn collect_word(self) -> Letters {
        self.bytes().collect()
    }
}

impl IntoWord for &String {
    fn collect_word(self) -> Letters {
        self.bytes().collect()
    }
}

impl IntoWord for &[u8] {
    fn collect_word(self) -> Letters {
        self.iter().copied().collect()
    }
}

impl IntoWord for Vec<u8> {
    fn collect_word(self) -> Letters {
        self.into_iter().collect()
    }
}

impl IntoWord for Letters {
    fn collect_word(self) -> Letters {
        self
    }
}

/// Checks that `word` is non-empty and made of `A`..`Z` only.
pub(crate) fn check_word(word: &[u8]) -> Result<()> {
    if word.is_empty() {
        return Err(DawgError::EmptyWord);
    }
    match word.iter().find(|&&b| !(START_LETTER..=END_LETTER).contains(&b)) {
        Some(&bad) => Err(DawgError::InvalidLetter {
            word: String::from_utf8_lossy(word).into_owned(),
            letter: bad as char,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn markers_sort_before_letters() {
        assert!(ROOT_LETTER < FORWARD_WORD_MARKER);
        assert!(FORWARD_WORD_MARKER < REVERSE_WORDLET_MARKER);
        assert!(REVERSE_WORDLET_MARKER < FORWARD_WORDLET_MARKER);
        assert!(FORWARD_WORDLET_MARKER < START_LETTER);
    }

    #[test]
    fn dawg_type_tags_parse_back() {
        for ty in [
            DawgType::ForwardWord,
            DawgType::ForwardWordAndReverseWordlet,
            DawgType::All,
        ] {
            assert_eq!(ty.as_str().parse::<DawgType>().unwrap(), ty);
        }
        assert!(matches!(
            "Reverse".parse::<DawgType>(),
            Err(DawgError::MalformedHeader(HeaderDefect::UnknownDawgType(_)))
        ));
    }

    #[test]
    fn dawg_type_includes() {
        assert!(!DawgType::ForwardWord.includes(Category::ReverseWordlet));
        assert!(DawgType::ForwardWordAndReverseWordlet.includes(Category::ReverseWordlet));
        assert!(!DawgType::ForwardWordAndReverseWordlet.includes(Category::ForwardWordlet));
        assert!(DawgType::All.includes(Category::ForwardWordlet));
    }

    #[test]
    fn check_word_rejects_non_letters() {
        assert!(check_word(b"CAT").is_ok());
        assert!(matches!(check_word(b""), Err(DawgError::EmptyWord)));
        assert!(matches!(
            check_word(b"CA*T"),
            Err(DawgError::InvalidLetter { letter: '*', .. })
        ));
        assert!(matches!(
            check_word(b"cat"),
            Err(DawgError::InvalidLetter { letter: 'c', .. })
        ));
    }
}
