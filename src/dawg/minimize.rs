//! Suffix sharing: collapses structurally identical subtrees of a [`Trie`] into one node.
//!
//! Nodes are visited in postorder, so by the time a node is considered all of its children
//! are already canonical. Two nodes are then equal iff they have the same letter, the same
//! terminal flag and the very same canonical children in the same order; there is no need to
//! recurse. A cheap [`fingerprint`] narrows the candidates down to one bucket first.

use hashbrown::HashMap;
use log::debug;
use smallvec::SmallVec;

use super::trie::{NodeId, Trie, TrieNode};

/// Counters collected while minimizing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinimizeStats {
    /// Nodes reachable from the root before minimizing.
    pub nodes_before: u32,
    /// Canonical nodes left afterwards.
    pub nodes_after: u32,
    /// Distinct fingerprints seen.
    pub buckets: u32,
    /// Most canonical nodes sharing one fingerprint.
    pub largest_bucket: u32,
}

/// Register of canonical nodes, keyed by fingerprint.
#[derive(Debug, Default)]
pub struct Minimizer {
    register: HashMap<u32, SmallVec<[NodeId; 4]>>,
    descendants: Vec<u32>,
    visited: Vec<bool>,
    stats: MinimizeStats,
}

impl Minimizer {
    /// Creates an empty minimizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimizes `trie` in place and returns what it did.
    ///
    /// Each duplicate is dropped by pointing its parent's edge at the canonical node. The
    /// duplicates stay in the arena but are no longer reachable from the root.
    pub fn minimize(mut self, trie: &mut Trie) -> MinimizeStats {
        self.descendants = vec![0; trie.arena_len()];
        self.visited = vec![false; trie.arena_len()];

        let mut stack: Vec<(NodeId, bool)> = vec![(Trie::ROOT, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                self.canonicalize(trie, id);
                continue;
            }
            if std::mem::replace(&mut self.visited[id.index()], true) {
                continue;
            }
            stack.push((id, true));
            // Reversed so that the first child is finished first.
            let children = &trie.node(id).children;
            stack.extend(children.iter().rev().map(|(_, child)| (child, false)));
            self.stats.nodes_before += 1;
        }

        self.stats.buckets = self.register.len() as u32;
        self.stats.largest_bucket = self
            .register
            .values()
            .map(|bucket| bucket.len() as u32)
            .max()
            .unwrap_or(0);
        debug!(
            "Minimized {} nodes to {} ({} buckets, largest {})",
            self.stats.nodes_before,
            self.stats.nodes_after,
            self.stats.buckets,
            self.stats.largest_bucket
        );
        self.stats
    }

    fn canonicalize(&mut self, trie: &mut Trie, id: NodeId) {
        let node = trie.node(id);
        let descendants: u32 = node
            .children
            .iter()
            .map(|(_, child)| 1 + self.descendants[child.index()])
            .sum();
        self.descendants[id.index()] = descendants;

        let bucket = self
            .register
            .entry(fingerprint(node, descendants))
            .or_default();
        match bucket.iter().copied().find(|&c| same_node(trie.node(c), node)) {
            Some(canonical) => {
                let (letter, parent) = (node.letter, node.parent);
                // Only the root has no parent, and no other node carries its letter.
                if let Some(parent) = parent {
                    trie.node_mut(parent).children.redirect(letter, canonical);
                }
            }
            None => {
                bucket.push(id);
                self.stats.nodes_after += 1;
            }
        }
    }
}

/// Minimizes `trie` in place with a fresh [`Minimizer`].
pub fn minimize(trie: &mut Trie) -> MinimizeStats {
    Minimizer::new().minimize(trie)
}

/// Fingerprint of a node whose children are already canonical.
///
/// Bits 0-7 hold the letter, bit 8 the terminal flag, bits 10-17 the child count and
/// bits 18-31 the low bits of the descendant count plus the sum of child letters.
/// Collisions are resolved by [`same_node`].
pub fn fingerprint(node: &TrieNode, descendants: u32) -> u32 {
    let letter_sum: u32 = node.children.iter().map(|(letter, _)| u32::from(letter)).sum();
    let aggregate = descendants.wrapping_add(letter_sum) & 0x3FFF;
    (aggregate << 18)
        | ((node.children.len() as u32 & 0xFF) << 10)
        | (u32::from(node.terminal) << 8)
        | u32::from(node.letter)
}

/// Equality for nodes whose children are canonical: children compare by id, in order.
fn same_node(a: &TrieNode, b: &TrieNode) -> bool {
    a.letter == b.letter && a.terminal == b.terminal && a.children == b.children
}
