//! # lexdawg
//!
//! Builds word-game lexicons as a [DAWG](https://en.wikipedia.org/wiki/Deterministic_acyclic_finite_state_automaton)
//! (Directed Acyclic Word Graph) and stores them in a compact binary file.
//!
//! Words are inserted into a trie, equal subtrees are merged so that common suffixes are
//! stored once, and the resulting graph is laid out as an array of small node records in
//! which every sibling run is contiguous. Besides full words a lexicon can carry two kinds
//! of wordlets, each below its own marker node of the root:
//!
//! - **reverse wordlets**: every prefix of every word, reversed, for cross-check queries
//!   that extend a fragment to the left;
//! - **forward wordlets**: every suffix of every word.
//!
//! ## Quick Start
//!
//! ```
//! use lexdawg::{Category, DawgBuilder, DawgType, LexiconConfig};
//!
//! let config = LexiconConfig::default()
//!     .with_name("Kitchen")
//!     .with_dawg_type(DawgType::ForwardWordAndReverseWordlet);
//! let mut builder = DawgBuilder::new(config);
//! for word in ["BAKE", "CAKE", "FAKE", "LAKE", "MAKE"] {
//!     builder.add_word(word).unwrap();
//! }
//! let reduction = builder.compress().unwrap();
//! assert!(reduction > 0.0);
//!
//! let dawg = builder.lexicon().unwrap();
//! assert!(dawg.contains(Category::ForwardWord, "CAKE"));
//! assert!(!dawg.contains(Category::ForwardWord, "AKE"));
//! // "KAM" is "MAK" reversed
//! assert!(dawg.contains(Category::ReverseWordlet, "KAM"));
//! ```
//!
//! ## Files
//!
//! [`DawgBuilder::save`] writes the file atomically, [`Dawg::load`] reads it back and
//! recounts every sub-lexicon against the header, and [`validate`] checks a file against
//! the word list it was built from:
//!
//! ```no_run
//! use lexdawg::{validate, DawgBuilder, LexiconConfig, WordSource};
//!
//! let config = LexiconConfig::default();
//! let mut builder = DawgBuilder::new(config.clone());
//! for word in WordSource::from_path("words.txt", config.max_word_length).unwrap() {
//!     builder.add_word(word.unwrap()).unwrap();
//! }
//! builder.compress().unwrap();
//! builder.save("words.dawg").unwrap();
//! assert!(validate("words.dawg", "words.txt").unwrap());
//! ```

#![warn(missing_docs)]

/// DAWG construction, encoding and queries.
pub mod dawg;

pub use dawg::{
    build_dawg, spawn_build, validate, validate_with, validate_words, BuildHandle, BuildReport, Category, Dawg,
    DawgBuilder, DawgError, DawgHeader, DawgNode, DawgType, DawgWriter, HeaderDefect, IntoWord,
    LexiconConfig, Phase, Result, SaveStats, WordSource,
};
