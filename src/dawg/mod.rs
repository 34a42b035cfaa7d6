/// Background build wrapper.
pub mod background;
/// Build session with its phase state machine.
pub mod builder;
/// Compact sorted child lists of the build-time trie.
pub mod children;
/// Binary reader and writer.
pub mod codec;
/// Build settings.
pub mod config;
/// Error types.
pub mod error;
/// Lays a minimized trie out as node records.
pub mod indexer;
/// Letters, markers and sub-lexicon categories.
pub mod letters;
/// Loaded, validated DAWG and its queries.
pub mod lexicon;
/// Suffix sharing.
pub mod minimize;
/// Encoded node records and the file header.
pub mod node;
/// Word list reader.
pub mod source;
/// Build-time prefix tree.
pub mod trie;
/// Round-trip validation against a word list.
pub mod validate;

pub use background::{spawn_build, BuildHandle};
pub use builder::{build_dawg, BuildReport, DawgBuilder, Phase};
pub use codec::{DawgWriter, SaveStats};
pub use config::LexiconConfig;
pub use error::{DawgError, HeaderDefect, Result};
pub use letters::{Category, DawgType, IntoWord};
pub use lexicon::Dawg;
pub use node::{DawgHeader, DawgNode};
pub use source::WordSource;
pub use validate::{validate, validate_with, validate_words};
