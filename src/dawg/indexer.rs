//! Lays a minimized [`Trie`] out as an array of [`DawgNode`] records.
//!
//! The encoding only stores the index of a node's first child, so every sibling run has to
//! occupy consecutive indices in ascending letter order. Ids are handed out one run at a
//! time: when a node is visited, a block is reserved for all of its children at once, then
//! each child's own run is laid out depth-first in child order.
//!
//! Sharing happens at run granularity. Two nodes with identical child lists point at the
//! same run, and a run that was already laid out is not laid out again.

use hashbrown::HashMap;
use log::debug;

use super::children::Children;
use super::node::DawgNode;
use super::trie::Trie;

/// Counters collected while indexing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Records produced, including the root.
    pub records: u32,
    /// Distinct sibling runs laid out.
    pub runs: u32,
    /// Child links that reused an already laid out run.
    pub shared_runs: u32,
}

struct Indexer<'t> {
    trie: &'t Trie,
    records: Vec<DawgNode>,
    runs: HashMap<&'t Children, u32>,
    stats: IndexStats,
}

impl<'t> Indexer<'t> {
    /// Lays out `children` and, depth-first, every run below it. Returns the first index
    /// of the run, or 0 if there are no children.
    fn lay_out(&mut self, children: &'t Children) -> u32 {
        let (first, new) = self.reserve(children);
        if !new {
            return first;
        }
        let trie = self.trie;
        // (first record of the run, the run's child list, next child to descend into)
        let mut stack: Vec<(u32, &'t Children, usize)> = vec![(first, children, 0)];
        while let Some(frame) = stack.last_mut() {
            let (run_first, run, next) = *frame;
            let Some((_, child)) = run.get_at(next) else {
                stack.pop();
                continue;
            };
            frame.2 += 1;
            let grandchildren = &trie.node(child).children;
            let (child_idx, new) = self.reserve(grandchildren);
            self.records[run_first as usize + next].child_idx = child_idx;
            if new {
                stack.push((child_idx, grandchildren, 0));
            }
        }
        first
    }

    /// Appends the records of a run that has not been laid out yet.
    ///
    /// Returns the first index of the run and whether it was new. Child indices of the new
    /// records are filled in later.
    fn reserve(&mut self, children: &'t Children) -> (u32, bool) {
        if children.is_empty() {
            return (0, false);
        }
        if let Some(&first) = self.runs.get(children) {
            self.stats.shared_runs += 1;
            return (first, false);
        }

        let trie = self.trie;
        let first = u32::try_from(self.records.len()).expect("more than u32::MAX DAWG nodes");
        let last = children.len() - 1;
        self.records
            .extend(children.iter().enumerate().map(|(i, (letter, child))| {
                DawgNode::new(0, letter, trie.node(child).terminal, i == last)
            }));
        self.runs.insert(children, first);
        self.stats.runs += 1;
        (first, true)
    }
}

/// Assigns ids to the nodes reachable from the root of `trie` and returns the records in
/// id order. The root is record 0.
pub fn index_nodes(trie: &Trie) -> (Vec<DawgNode>, IndexStats) {
    let root = trie.node(Trie::ROOT);
    let mut indexer = Indexer {
        trie,
        records: vec![DawgNode::new(0, root.letter, root.terminal, true)],
        runs: HashMap::new(),
        stats: IndexStats::default(),
    };
    let child_idx = indexer.lay_out(&root.children);
    indexer.records[0].child_idx = child_idx;

    let mut stats = indexer.stats;
    stats.records = indexer.records.len() as u32;
    debug!(
        "Indexed {} records in {} runs ({} shared)",
        stats.records, stats.runs, stats.shared_runs
    );
    (indexer.records, stats)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dawg::letters::{Category, FORWARD_WORD_MARKER, REVERSE_WORDLET_MARKER, FORWARD_WORDLET_MARKER};
    use crate::dawg::minimize::minimize;

    fn indexed(words: &[&str]) -> Vec<DawgNode> {
        let mut trie = Trie::new();
        for word in words {
            trie.insert(word.as_bytes(), Category::ForwardWord).unwrap();
        }
        minimize(&mut trie);
        index_nodes(&trie).0
    }

    fn run(records: &[DawgNode], first: u32) -> Vec<DawgNode> {
        let mut out = Vec::new();
        let mut idx = first as usize;
        loop {
            out.push(records[idx]);
            if records[idx].is_last_child {
                return out;
            }
            idx += 1;
        }
    }

    #[test]
    fn root_and_markers_come_first() {
        let records = indexed(&[]);
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].child_idx, 1);
        assert!(records[0].is_last_child);
        let markers: Vec<u8> = run(&records, 1).iter().map(|n| n.letter).collect();
        assert_eq!(
            markers,
            [FORWARD_WORD_MARKER, REVERSE_WORDLET_MARKER, FORWARD_WORDLET_MARKER]
        );
        assert!(records[1..].iter().all(|n| n.child_idx == 0));
    }

    #[test]
    fn sibling_runs_are_contiguous_and_sorted() {
        let records = indexed(&["ZOO", "APE", "MOLE", "APT", "BEE"]);
        for node in &records {
            if node.has_children() {
                let letters: Vec<u8> = run(&records, node.child_idx).iter().map(|n| n.letter).collect();
                assert!(letters.windows(2).all(|w| w[0] < w[1]), "{letters:?}");
            }
        }
        let forward = run(&records, records[1].child_idx);
        let letters: Vec<u8> = forward.iter().map(|n| n.letter).collect();
        assert_eq!(letters, b"ABMZ");
    }

    #[test]
    fn identical_child_lists_share_one_run() {
        let records = indexed(&["CAT", "BAT", "RAT"]);
        // root, three markers, B C R, A, T
        assert_eq!(records.len(), 9);
        let forward = run(&records, records[1].child_idx);
        assert_eq!(forward.len(), 3);
        assert!(forward.iter().all(|n| n.child_idx == forward[0].child_idx));
        let a = records[forward[0].child_idx as usize];
        assert_eq!(a.letter, b'A');
        let t = records[a.child_idx as usize];
        assert_eq!(t.letter, b'T');
        assert!(t.is_terminal && t.is_last_child && !t.has_children());
    }

    #[test]
    fn deep_chain_is_laid_out_without_recursion() {
        let word = "AB".repeat(50_000);
        let records = indexed(&[word.as_str()]);
        assert_eq!(records.len(), 4 + word.len());
        let mut idx = records[1].child_idx;
        for letter in word.bytes() {
            let node = records[idx as usize];
            assert_eq!(node.letter, letter);
            assert!(node.is_last_child);
            idx = node.child_idx;
        }
        assert_eq!(idx, 0);
        assert!(records[records.len() - 1].is_terminal);
    }

    #[test]
    fn first_child_subtree_is_laid_out_before_next_sibling() {
        let records = indexed(&["AB", "CD"]);
        // 0 root, 1-3 markers, 4 A, 5 C, 6 B (run of A), 7 D (run of C)
        let letters: Vec<u8> = records.iter().map(|n| n.letter).collect();
        assert_eq!(&letters[4..], b"ACBD");
        assert_eq!(records[4].child_idx, 6);
        assert_eq!(records[5].child_idx, 7);
    }
}
