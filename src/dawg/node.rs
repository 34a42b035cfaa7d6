use super::letters::DawgType;

/// Version of the only supported on-disk layout.
pub const CURRENT_VERSION: u32 = 1;

/// Smallest valid node count: the root plus the forward-word and reverse-wordlet markers.
pub const MIN_NUM_NODES: u32 = 3;

/// One encoded node.
///
/// The children of a node occupy consecutive indices starting at `child_idx`; the run ends
/// at the first node with `is_last_child` set. Index 0 is the root, so a `child_idx` of 0
/// means the node has no children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DawgNode {
    /// Index of the first child, or 0 for none.
    pub child_idx: u32,
    /// ASCII letter or marker byte.
    pub letter: u8,
    /// The path ending here is an entry.
    pub is_terminal: bool,
    /// Ends its sibling run.
    pub is_last_child: bool,
}

impl DawgNode {
    /// Creates a node record.
    pub const fn new(child_idx: u32, letter: u8, is_terminal: bool, is_last_child: bool) -> Self {
        DawgNode {
            child_idx,
            letter,
            is_terminal,
            is_last_child,
        }
    }

    /// True if the node has at least one child.
    #[inline]
    pub fn has_children(&self) -> bool {
        self.child_idx != 0
    }
}

/// File header, followed on disk by `num_nodes` [`DawgNode`] records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DawgHeader {
    /// Layout version, always [`CURRENT_VERSION`] when written by this crate.
    pub version: u32,
    /// Number of node records that follow the header.
    pub num_nodes: u32,
    /// Display name of the lexicon.
    pub lexicon_name: String,
    /// Free-form date, by default "dd MMMM yyyy".
    pub lexicon_date: String,
    /// Entries below the `'*'` marker.
    pub num_words: u32,
    /// Which sub-lexicons the file carries.
    pub dawg_type: DawgType,
    /// Entries below the `'<'` marker.
    pub num_reverse_wordlets: u32,
    /// Entries below the `'>'` marker.
    pub num_forward_wordlets: u32,
}

impl DawgHeader {
    /// Creates a current-version header with all counts set to zero.
    pub fn new(lexicon_name: impl Into<String>, lexicon_date: impl Into<String>, dawg_type: DawgType) -> Self {
        DawgHeader {
            version: CURRENT_VERSION,
            num_nodes: 0,
            lexicon_name: lexicon_name.into(),
            lexicon_date: lexicon_date.into(),
            num_words: 0,
            dawg_type,
            num_reverse_wordlets: 0,
            num_forward_wordlets: 0,
        }
    }
}
