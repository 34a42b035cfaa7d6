//! Build-time prefix tree.
//!
//! Nodes live in a single arena and refer to each other by [`NodeId`]. The root owns one
//! sentinel marker child per [`Category`]; every entry of a category is inserted below its
//! marker. Until [`Minimizer`](super::minimize::Minimizer) runs, the arena forms a tree.

use itertools::{Itertools, Position};
use log::trace;

use super::children::Children;
use super::error::Result;
use super::letters::{check_word, Category, ROOT_LETTER};

/// Index of a node in the trie arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the build-time trie.
#[derive(Clone, Debug)]
pub struct TrieNode {
    /// The letter (or marker) this node stands for.
    pub letter: u8,
    /// True if the path from the marker down to this node spells a stored entry.
    pub terminal: bool,
    /// Children in ascending letter order.
    pub children: Children,
    /// The node this one was created under. Only used while minimizing.
    pub parent: Option<NodeId>,
}

impl TrieNode {
    fn new(letter: u8, parent: Option<NodeId>) -> Self {
        TrieNode {
            letter,
            terminal: false,
            children: Children::None,
            parent,
        }
    }
}

/// Counters collected while inserting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InsertStats {
    /// Entries that were not present before.
    pub entries_added: u32,
    /// Entries that were already present.
    pub duplicates: u32,
    /// Letters walked or created over all insertions.
    pub letters_inserted: u64,
    /// Nodes allocated, including the root and markers.
    pub nodes_created: u32,
}

/// Arena-backed prefix tree with one marker subtree per [`Category`].
#[derive(Clone, Debug)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    markers: [NodeId; 3],
    entries: [u32; 3],
    stats: InsertStats,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    /// The root is always the first node of the arena.
    pub const ROOT: NodeId = NodeId(0);

    /// Creates a trie holding the root and the three marker nodes.
    pub fn new() -> Self {
        let mut trie = Trie {
            nodes: vec![TrieNode::new(ROOT_LETTER, None)],
            markers: [Self::ROOT; 3],
            entries: [0; 3],
            stats: InsertStats {
                nodes_created: 1,
                ..InsertStats::default()
            },
        };
        for (slot, category) in Category::ALL.into_iter().enumerate() {
            trie.markers[slot] = trie.add_child(Self::ROOT, category.marker());
        }
        trie
    }

    /// Inserts `word` below the marker of `category`.
    ///
    /// Returns `true` if the entry was not present before. Inserting a prefix of an
    /// existing entry marks the existing node terminal; terminal flags are never cleared.
    ///
    /// # Errors
    ///
    /// Returns [`DawgError::EmptyWord`](super::error::DawgError::EmptyWord) or
    /// [`DawgError::InvalidLetter`](super::error::DawgError::InvalidLetter) if the word is
    /// not made of `A`..`Z`.
    pub fn insert(&mut self, word: &[u8], category: Category) -> Result<bool> {
        check_word(word)?;
        let mut current = self.marker(category);
        let mut added = false;
        for (position, &letter) in word.iter().with_position() {
            current = match self.nodes[current.index()].children.get(letter) {
                Some(child) => child,
                None => self.add_child(current, letter),
            };
            if matches!(position, Position::Last | Position::Only) {
                let node = &mut self.nodes[current.index()];
                added = !node.terminal;
                node.terminal = true;
            }
        }
        self.stats.letters_inserted += word.len() as u64;
        if added {
            self.entries[category as usize] += 1;
            self.stats.entries_added += 1;
        } else {
            self.stats.duplicates += 1;
        }
        trace!(
            "Inserted {:?} under {:?} (new: {added})",
            String::from_utf8_lossy(word),
            category
        );
        Ok(added)
    }

    /// Returns true if `word` is a stored entry of `category`.
    pub fn contains(&self, word: &[u8], category: Category) -> bool {
        word.iter()
            .try_fold(self.marker(category), |node, &letter| {
                self.nodes[node.index()].children.get(letter)
            })
            .is_some_and(|node| self.nodes[node.index()].terminal)
    }

    /// Number of distinct entries stored below the marker of `category`.
    pub fn entry_count(&self, category: Category) -> u32 {
        self.entries[category as usize]
    }

    /// The marker node of `category`.
    pub fn marker(&self, category: Category) -> NodeId {
        self.markers[category as usize]
    }

    /// Returns the node with the given id.
    #[inline]
    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut TrieNode {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes ever allocated in the arena.
    ///
    /// After minimization some of them are no longer reachable from the root.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Counters collected by [`insert`](Trie::insert).
    pub fn stats(&self) -> InsertStats {
        self.stats
    }

    fn add_child(&mut self, parent: NodeId, letter: u8) -> NodeId {
        let id = NodeId(
            u32::try_from(self.nodes.len()).expect("trie arena exceeds u32::MAX nodes"),
        );
        self.nodes.push(TrieNode::new(letter, Some(parent)));
        self.nodes[parent.index()].children.insert(letter, id);
        self.stats.nodes_created += 1;
        id
    }
}
