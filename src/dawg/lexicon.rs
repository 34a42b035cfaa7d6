//! A loaded, validated DAWG and the queries built on its node layout.

use std::io::{Read, Write};
use std::path::Path;

use log::{debug, info};

use super::codec::{self, SaveStats};
use super::error::{DawgError, HeaderDefect, Result};
use super::letters::{Category, IntoWord};
use super::node::{DawgHeader, DawgNode, CURRENT_VERSION, MIN_NUM_NODES};

/// An immutable DAWG whose header counts have been checked against its nodes.
///
/// # Examples
///
/// ```
/// use lexdawg::{Category, DawgBuilder, LexiconConfig};
///
/// let mut builder = DawgBuilder::new(LexiconConfig::default());
/// for word in ["BAKE", "CAKE", "FAKE"] {
///     builder.add_word(word).unwrap();
/// }
/// builder.compress().unwrap();
/// let dawg = builder.lexicon().unwrap();
///
/// assert!(dawg.contains(Category::ForwardWord, "CAKE"));
/// assert!(!dawg.contains(Category::ForwardWord, "AKE"));
/// assert_eq!(dawg.count_words(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dawg {
    header: DawgHeader,
    nodes: Vec<DawgNode>,
    markers: [Option<u32>; 3],
    counts: [u32; 3],
}

impl Dawg {
    /// Loads and validates a DAWG file.
    ///
    /// # Errors
    ///
    /// Fails with [`DawgError::FileIo`] if the file cannot be opened,
    /// [`DawgError::MalformedHeader`] if the header is rejected, and
    /// [`DawgError::CountMismatch`] if the recounted entries disagree with the header.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = codec::open_reader(path)?;
        let dawg = Self::read_from(&mut reader)?;
        info!(
            "Loaded DAWG '{}' from {} ({} nodes, {} words)",
            dawg.header.lexicon_name,
            path.display(),
            dawg.node_count(),
            dawg.count_words()
        );
        Ok(dawg)
    }

    /// Reads and validates a DAWG from a stream.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let (header, nodes) = codec::read_dawg(reader)?;
        Self::from_parts(header, nodes)
    }

    /// Builds a DAWG from a header and its records, recounting every category.
    ///
    /// # Errors
    ///
    /// Returns [`DawgError::CountMismatch`] if the node count or any recounted category
    /// differs from the header, and [`DawgError::DanglingChild`] or
    /// [`DawgError::CyclicGraph`] if the records are not a well-formed graph.
    pub fn from_parts(header: DawgHeader, nodes: Vec<DawgNode>) -> Result<Self> {
        if header.version != CURRENT_VERSION {
            return Err(HeaderDefect::UnsupportedVersion(header.version).into());
        }
        if header.num_nodes < MIN_NUM_NODES {
            return Err(HeaderDefect::TooFewNodes {
                declared: header.num_nodes,
                minimum: MIN_NUM_NODES,
            }
            .into());
        }
        check_count("nodes", header.num_nodes, nodes.len().try_into().unwrap_or(u32::MAX))?;

        let (markers, counts) = tally(&nodes)?;
        let dawg = Dawg {
            header,
            nodes,
            markers,
            counts,
        };
        check_count("words", dawg.header.num_words, dawg.count_words())?;
        check_count(
            "reverse wordlets",
            dawg.header.num_reverse_wordlets,
            dawg.count_reverse_wordlets(),
        )?;
        check_count(
            "forward wordlets",
            dawg.header.num_forward_wordlets,
            dawg.count_forward_wordlets(),
        )?;
        debug!("Validated counts {:?} for '{}'", dawg.counts, dawg.header.lexicon_name);
        Ok(dawg)
    }

    /// Writes the header and records to `writer`, exactly as they were read or built.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        codec::write_dawg(writer, &self.header, &self.nodes)
    }

    /// Saves the DAWG to `path`, replacing any existing file atomically.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<SaveStats> {
        codec::save_atomically(path.as_ref(), &self.header, &self.nodes)
    }

    /// The header, with counts already checked against the nodes.
    pub fn header(&self) -> &DawgHeader {
        &self.header
    }

    /// All records in id order; record 0 is the root.
    pub fn nodes(&self) -> &[DawgNode] {
        &self.nodes
    }

    /// Number of node records, markers and root included.
    pub fn node_count(&self) -> u32 {
        self.header.num_nodes
    }

    /// Number of full words.
    pub fn count_words(&self) -> u32 {
        self.counts[Category::ForwardWord as usize]
    }

    /// Number of reversed word prefixes.
    pub fn count_reverse_wordlets(&self) -> u32 {
        self.counts[Category::ReverseWordlet as usize]
    }

    /// Number of word suffixes.
    pub fn count_forward_wordlets(&self) -> u32 {
        self.counts[Category::ForwardWordlet as usize]
    }

    /// Index of the marker node of `category`, if the DAWG has one.
    pub fn marker(&self, category: Category) -> Option<u32> {
        self.markers[category as usize]
    }

    /// Counts the terminal nodes reachable from the run starting at `idx`.
    ///
    /// A node contributes one if it is terminal, plus the count of its own child run, plus,
    /// unless it is the last of its siblings, the count of the node right after it.
    pub fn count_entries(&self, idx: u32) -> Result<u32> {
        count_from(&self.nodes, idx)
    }

    /// Finds the node for `letter` in the sibling run starting at `run_start`.
    pub fn find_child(&self, run_start: u32, letter: u8) -> Option<u32> {
        self.run(run_start)
            .find(|&idx| self.nodes[idx as usize].letter == letter)
    }

    /// Returns true if `word` is a stored entry of `category`.
    pub fn contains(&self, category: Category, word: impl IntoWord) -> bool {
        let word = word.collect_word();
        !word.is_empty()
            && self
                .walk(category, &word)
                .is_some_and(|idx| self.nodes[idx as usize].is_terminal)
    }

    /// Returns true if some entry of `category` starts with `prefix`.
    pub fn has_prefix(&self, category: Category, prefix: impl IntoWord) -> bool {
        self.walk(category, &prefix.collect_word()).is_some()
    }

    /// All entries of `category` in ascending order.
    pub fn entries(&self, category: Category) -> Vec<String> {
        let mut entries = Vec::new();
        let Some(marker) = self.marker(category) else {
            return entries;
        };
        let mut prefix: Vec<u8> = Vec::new();
        // One partially consumed sibling run per letter of `prefix`, plus the current one.
        let mut stack = vec![self.run(self.nodes[marker as usize].child_idx)];
        while let Some(run) = stack.last_mut() {
            let Some(idx) = run.next() else {
                stack.pop();
                continue;
            };
            let node = &self.nodes[idx as usize];
            prefix.truncate(stack.len() - 1);
            prefix.push(node.letter);
            if node.is_terminal {
                entries.push(String::from_utf8_lossy(&prefix).into_owned());
            }
            stack.push(self.run(node.child_idx));
        }
        entries
    }

    /// Follows `letters` from the marker of `category`; returns the last node reached.
    fn walk(&self, category: Category, letters: &[u8]) -> Option<u32> {
        letters.iter().try_fold(self.marker(category)?, |idx, &letter| {
            self.find_child(self.nodes[idx as usize].child_idx, letter)
        })
    }

    fn run(&self, run_start: u32) -> RunIter<'_> {
        RunIter::new(&self.nodes, run_start)
    }
}

/// Locates the marker of every category and counts the entries below it.
///
/// Markers are looked up in the run of root children; an absent marker counts as zero.
pub(crate) fn tally(nodes: &[DawgNode]) -> Result<([Option<u32>; 3], [u32; 3])> {
    let mut markers = [None; 3];
    let mut counts = [0; 3];
    let Some(root) = nodes.first() else {
        return Ok((markers, counts));
    };
    for category in Category::ALL {
        let marker = RunIter::new(nodes, root.child_idx)
            .find(|&idx| nodes[idx as usize].letter == category.marker());
        if let Some(marker) = marker {
            counts[category as usize] = count_from(nodes, nodes[marker as usize].child_idx)?;
        }
        markers[category as usize] = marker;
    }
    Ok((markers, counts))
}

/// Counts the terminal nodes reachable from the run starting at `idx`.
fn count_from(nodes: &[DawgNode], idx: u32) -> Result<u32> {
    let num_nodes = u32::try_from(nodes.len()).unwrap_or(u32::MAX);
    let mut count: u64 = 0;
    // (node, number of child links followed to reach it, node that refers to it)
    let mut stack = vec![(idx, 0u32, 0u32)];
    while let Some((idx, depth, from)) = stack.pop() {
        if idx == 0 {
            continue;
        }
        let node = nodes.get(idx as usize).ok_or(DawgError::DanglingChild {
            index: from,
            target: idx,
            num_nodes,
        })?;
        if depth > num_nodes {
            return Err(DawgError::CyclicGraph { index: idx });
        }
        count += u64::from(node.is_terminal);
        if !node.is_last_child {
            stack.push((idx + 1, depth, idx));
        }
        stack.push((node.child_idx, depth + 1, idx));
    }
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Iterates over the indices of one sibling run.
struct RunIter<'a> {
    nodes: &'a [DawgNode],
    next: Option<u32>,
}

impl<'a> RunIter<'a> {
    fn new(nodes: &'a [DawgNode], run_start: u32) -> Self {
        RunIter {
            nodes,
            next: (run_start != 0).then_some(run_start),
        }
    }
}

impl Iterator for RunIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let idx = self.next?;
        let node = self.nodes.get(idx as usize)?;
        self.next = (!node.is_last_child).then(|| idx + 1);
        Some(idx)
    }
}

fn check_count(what: &'static str, declared: u32, counted: u32) -> Result<()> {
    if declared != counted {
        return Err(DawgError::CountMismatch {
            what,
            declared,
            counted,
        });
    }
    Ok(())
}
