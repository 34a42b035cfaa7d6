//! Error types for building, saving and loading DAWGs.

use std::path::PathBuf;

use thiserror::Error;

use super::builder::Phase;

/// The error type for every fallible operation in this crate.
#[derive(Debug, Error)]
pub enum DawgError {
    /// The header of a DAWG file is not acceptable.
    #[error("Malformed DAWG header: {0}")]
    MalformedHeader(HeaderDefect),

    /// A count recomputed from the nodes disagrees with the header.
    #[error("Count mismatch for {what}: header declares {declared}, but {counted} were counted")]
    CountMismatch {
        /// Which count disagrees, e.g. `"words"`.
        what: &'static str,
        /// Value stored in the header.
        declared: u32,
        /// Value found in the nodes.
        counted: u32,
    },

    /// Fewer nodes were added than the header declares.
    #[error("Expected number of nodes: {declared}. However, only {added} nodes have been added")]
    IncompleteWrite {
        /// Node count of the header.
        declared: u32,
        /// Nodes actually added.
        added: u32,
    },

    /// A node was added beyond the declared node count.
    #[error("Cannot add more than the declared {declared} nodes")]
    NodeOverflow {
        /// Node count of the header.
        declared: u32,
    },

    /// An I/O error on a stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An I/O error tied to a file path.
    #[error("I/O error on '{}': {source}", path.display())]
    FileIo {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An operation was invoked in a phase where it is not allowed.
    #[error("'{operation}' is not allowed while the builder is {phase}")]
    PhaseViolation {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Phase the builder was in.
        phase: Phase,
    },

    /// A word contains something other than `A`..`Z`.
    #[error("Word {word:?} contains invalid letter {letter:?}")]
    InvalidLetter {
        /// The rejected word.
        word: String,
        /// First offending character.
        letter: char,
    },

    /// An empty word was inserted.
    #[error("Cannot insert an empty word")]
    EmptyWord,

    /// A node points outside the node array.
    #[error("Node {index} refers to node {target}, but there are only {num_nodes} nodes")]
    DanglingChild {
        /// Index of the node holding the bad link.
        index: u32,
        /// The out-of-range child index.
        target: u32,
        /// Length of the node array.
        num_nodes: u32,
    },

    /// Following child links from a node never terminates.
    #[error("Node {index} is part of a cycle")]
    CyclicGraph {
        /// Node at which the walk gave up.
        index: u32,
    },

    /// A background build thread panicked.
    #[error("Background build panicked: {0}")]
    ThreadPanic(String),
}

/// The specific reason a header was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderDefect {
    /// The version field is not [`CURRENT_VERSION`](super::node::CURRENT_VERSION).
    #[error("unexpected version {0}, only version 1 is supported")]
    UnsupportedVersion(u32),

    /// Fewer nodes than the root and the two required markers.
    #[error("declared node count {declared} is less than the minimum of {minimum}")]
    TooFewNodes {
        /// Node count in the header.
        declared: u32,
        /// Smallest count a valid file can have.
        minimum: u32,
    },

    /// The DAWG type tag is not one of the known tags.
    #[error("unknown DAWG type {0:?}")]
    UnknownDawgType(String),

    /// A string field could not be decoded.
    #[error("string field is not valid UTF-8 or its length prefix is corrupt")]
    InvalidString,
}

impl DawgError {
    /// Returns a closure wrapping an `io::Error` together with `path`.
    pub(crate) fn file_io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| DawgError::FileIo { path, source }
    }

    /// Attaches `path` to a plain I/O error; other errors are returned unchanged.
    pub(crate) fn at_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            DawgError::Io(source) => DawgError::FileIo {
                path: path.into(),
                source,
            },
            other => other,
        }
    }
}

impl From<HeaderDefect> for DawgError {
    fn from(defect: HeaderDefect) -> Self {
        DawgError::MalformedHeader(defect)
    }
}

/// A `Result` alias using [`DawgError`] by default.
pub type Result<T, E = DawgError> = std::result::Result<T, E>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn io_errors_get_the_path() {
        let err = DawgError::from(std::io::Error::from(std::io::ErrorKind::WriteZero)).at_path("out.dawg");
        match err {
            DawgError::FileIo { path, source } => {
                assert_eq!(path, PathBuf::from("out.dawg"));
                assert_eq!(source.kind(), std::io::ErrorKind::WriteZero);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(matches!(
            DawgError::EmptyWord.at_path("out.dawg"),
            DawgError::EmptyWord
        ));
    }
}
