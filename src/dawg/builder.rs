//! The build session: insert words, compress once, then save or query.

use std::fmt;
use std::mem;
use std::path::Path;

use log::{debug, info};

use super::codec::{DawgWriter, SaveStats};
use super::config::LexiconConfig;
use super::error::{DawgError, Result};
use super::indexer::{index_nodes, IndexStats};
use super::letters::{Category, IntoWord, Letters};
use super::lexicon::{tally, Dawg};
use super::minimize::{MinimizeStats, Minimizer};
use super::node::{DawgHeader, DawgNode};
use super::trie::{InsertStats, Trie};

/// Where a [`DawgBuilder`] is in its life cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Words may be inserted.
    AddingWords,
    /// The trie is being minimized and indexed.
    Compressing,
    /// The node records are final; the DAWG may be saved or queried.
    Compressed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::AddingWords => "adding words",
            Phase::Compressing => "compressing",
            Phase::Compressed => "compressed",
        })
    }
}

/// Everything a build session measured, phase by phase.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildReport {
    /// Name from the build's [`LexiconConfig`].
    pub lexicon_name: String,
    /// Trie growth during insertion.
    pub insert: InsertStats,
    /// Nodes merged by minimization.
    pub minimize: MinimizeStats,
    /// Records and shared runs of the final layout.
    pub index: IndexStats,
    /// Share of trie nodes saved by compression, between 0 and 1.
    pub reduction: f64,
    /// Distinct words, as written to the header.
    pub num_words: u32,
    /// Distinct reverse wordlets, as written to the header.
    pub num_reverse_wordlets: u32,
    /// Distinct forward wordlets, as written to the header.
    pub num_forward_wordlets: u32,
    /// Set once the DAWG has been saved.
    pub save: Option<SaveStats>,
}

#[derive(Debug)]
struct Compressed {
    header: DawgHeader,
    nodes: Vec<DawgNode>,
    minimize: MinimizeStats,
    index: IndexStats,
    reduction: f64,
    save: Option<SaveStats>,
}

/// Builds a DAWG lexicon from words added in any order.
///
/// Words go into a trie below the marker of their category. [`compress`](Self::compress)
/// then merges equal subtrees and lays the result out as node records, after which no
/// more words may be added.
///
/// # Examples
///
/// ```
/// use lexdawg::{Category, DawgBuilder, DawgType, LexiconConfig};
///
/// let config = LexiconConfig::default().with_dawg_type(DawgType::ForwardWordAndReverseWordlet);
/// let mut builder = DawgBuilder::new(config);
/// builder.add_word("BATS").unwrap();
/// builder.compress().unwrap();
///
/// let dawg = builder.lexicon().unwrap();
/// assert_eq!(dawg.count_words(), 1);
/// assert_eq!(dawg.entries(Category::ReverseWordlet), ["AB", "B", "STAB", "TAB"]);
/// ```
#[derive(Debug)]
pub struct DawgBuilder {
    config: LexiconConfig,
    phase: Phase,
    trie: Trie,
    insert_stats: InsertStats,
    compressed: Option<Compressed>,
}

impl DawgBuilder {
    /// Creates an empty builder in the [`Phase::AddingWords`] phase.
    pub fn new(config: LexiconConfig) -> Self {
        DawgBuilder {
            config,
            phase: Phase::AddingWords,
            trie: Trie::new(),
            insert_stats: InsertStats::default(),
            compressed: None,
        }
    }

    /// The configuration this session was started with.
    pub fn config(&self) -> &LexiconConfig {
        &self.config
    }

    /// Current phase of the session.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Adds a word together with the wordlets its [`DawgType`](super::letters::DawgType)
    /// calls for.
    ///
    /// Every prefix of the word is also stored reversed as a reverse wordlet ("BATS" gives
    /// B, AB, TAB and STAB), and every suffix as a forward wordlet (BATS, ATS, TS and S).
    /// Returns `true` if the word itself was new.
    ///
    /// # Errors
    ///
    /// Returns [`DawgError::PhaseViolation`] after [`compress`](Self::compress), and
    /// [`DawgError::EmptyWord`] or [`DawgError::InvalidLetter`] for words that are not
    /// made of `A`..`Z`. A rejected word leaves the builder unchanged.
    pub fn add_word(&mut self, word: impl IntoWord) -> Result<bool> {
        self.require(Phase::AddingWords, "add_word")?;
        let letters = word.collect_word();
        let added = self.trie.insert(&letters, Category::ForwardWord)?;

        let dawg_type = self.config.dawg_type;
        if dawg_type.includes(Category::ReverseWordlet) {
            for end in 1..=letters.len() {
                let reversed: Letters = letters[..end].iter().rev().copied().collect();
                self.trie.insert(&reversed, Category::ReverseWordlet)?;
            }
        }
        if dawg_type.includes(Category::ForwardWordlet) {
            for start in 0..letters.len() {
                self.trie.insert(&letters[start..], Category::ForwardWordlet)?;
            }
        }
        Ok(added)
    }

    /// Inserts a single entry below the marker of `category`, without deriving wordlets.
    ///
    /// # Errors
    ///
    /// Same as [`add_word`](Self::add_word).
    pub fn insert(&mut self, word: impl IntoWord, category: Category) -> Result<bool> {
        self.require(Phase::AddingWords, "insert")?;
        self.trie.insert(&word.collect_word(), category)
    }

    /// Minimizes the trie and lays it out as node records.
    ///
    /// Returns the reduction ratio `1 - records / trie nodes`. Calling it again once
    /// compressed returns the same ratio without doing any work.
    pub fn compress(&mut self) -> Result<f64> {
        match self.phase {
            Phase::Compressed => return Ok(self.compressed_in("compress")?.reduction),
            Phase::Compressing => {
                return Err(DawgError::PhaseViolation {
                    operation: "compress",
                    phase: Phase::Compressing,
                })
            }
            Phase::AddingWords => {}
        }
        self.insert_stats = self.trie.stats();
        let mut header = DawgHeader::new(&self.config.name, &self.config.date, self.config.dawg_type);
        header.num_words = self.trie.entry_count(Category::ForwardWord);
        header.num_reverse_wordlets = self.trie.entry_count(Category::ReverseWordlet);
        header.num_forward_wordlets = self.trie.entry_count(Category::ForwardWordlet);
        info!(
            "Compressing '{}': {} entries, {} letters",
            self.config.name, self.insert_stats.entries_added, self.insert_stats.letters_inserted
        );

        // Infallible from here on.
        self.phase = Phase::Compressing;
        let mut trie = mem::take(&mut self.trie);
        let minimize = Minimizer::new().minimize(&mut trie);
        let (nodes, index) = index_nodes(&trie);
        drop(trie);
        header.num_nodes = index.records;
        debug_assert_eq!(
            tally(&nodes).ok().map(|(_, counts)| counts),
            Some([
                header.num_words,
                header.num_reverse_wordlets,
                header.num_forward_wordlets
            ])
        );

        let reduction = if minimize.nodes_before == 0 {
            0.0
        } else {
            1.0 - f64::from(index.records) / f64::from(minimize.nodes_before)
        };
        info!(
            "Compressed '{}' from {} trie nodes to {} records ({:.1}% smaller)",
            self.config.name,
            minimize.nodes_before,
            index.records,
            reduction * 100.0
        );
        self.compressed = Some(Compressed {
            header,
            nodes,
            minimize,
            index,
            reduction,
            save: None,
        });
        self.phase = Phase::Compressed;
        Ok(reduction)
    }

    /// The compressed DAWG, validated the same way a loaded file is.
    pub fn lexicon(&self) -> Result<Dawg> {
        let compressed = self.compressed_in("lexicon")?;
        Dawg::from_parts(compressed.header.clone(), compressed.nodes.clone())
    }

    /// Saves the compressed DAWG to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DawgError::PhaseViolation`] before [`compress`](Self::compress) and
    /// [`DawgError::FileIo`] if the file cannot be written.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<SaveStats> {
        let compressed = self.compressed_in("save")?;
        let mut writer = DawgWriter::new(compressed.header.clone());
        for node in &compressed.nodes {
            writer.add_node(*node)?;
        }
        let stats = writer.save(path)?;
        debug!("Saved {} bytes to {}", stats.bytes, stats.path.display());
        if let Some(compressed) = self.compressed.as_mut() {
            compressed.save = Some(stats.clone());
        }
        Ok(stats)
    }

    /// Counters of the insert phase so far.
    pub fn insert_stats(&self) -> InsertStats {
        match self.phase {
            Phase::AddingWords => self.trie.stats(),
            _ => self.insert_stats,
        }
    }

    /// Statistics of the whole session.
    ///
    /// # Errors
    ///
    /// Returns [`DawgError::PhaseViolation`] before [`compress`](Self::compress).
    pub fn report(&self) -> Result<BuildReport> {
        let compressed = self.compressed_in("report")?;
        let header = &compressed.header;
        Ok(BuildReport {
            lexicon_name: header.lexicon_name.clone(),
            insert: self.insert_stats,
            minimize: compressed.minimize,
            index: compressed.index,
            reduction: compressed.reduction,
            num_words: header.num_words,
            num_reverse_wordlets: header.num_reverse_wordlets,
            num_forward_wordlets: header.num_forward_wordlets,
            save: compressed.save.clone(),
        })
    }

    fn require(&self, phase: Phase, operation: &'static str) -> Result<()> {
        if self.phase != phase {
            return Err(DawgError::PhaseViolation {
                operation,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn compressed_in(&self, operation: &'static str) -> Result<&Compressed> {
        self.require(Phase::Compressed, operation)?;
        self.compressed.as_ref().ok_or(DawgError::PhaseViolation {
            operation,
            phase: self.phase,
        })
    }
}

/// Builds and compresses a DAWG from `words` in one go.
///
/// ```
/// use lexdawg::{build_dawg, Category, LexiconConfig};
///
/// let dawg = build_dawg(LexiconConfig::default(), ["APPLE", "BANANA", "CHERRY"]).unwrap();
/// assert!(dawg.contains(Category::ForwardWord, "BANANA"));
/// assert!(!dawg.contains(Category::ForwardWord, "APRICOT"));
/// ```
pub fn build_dawg<W: IntoWord>(config: LexiconConfig, words: impl IntoIterator<Item = W>) -> Result<Dawg> {
    let mut builder = DawgBuilder::new(config);
    for word in words {
        builder.add_word(word)?;
    }
    builder.compress()?;
    builder.lexicon()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dawg::letters::DawgType;

    fn builder(dawg_type: DawgType) -> DawgBuilder {
        DawgBuilder::new(
            LexiconConfig::default()
                .with_name("Test")
                .with_date("01 January 2024")
                .with_dawg_type(dawg_type),
        )
    }

    #[test]
    fn shared_suffix_reduces_nodes() {
        let mut b = builder(DawgType::ForwardWord);
        for word in ["CAT", "BAT", "RAT"] {
            assert!(b.add_word(word).unwrap());
        }
        let reduction = b.compress().unwrap();
        let dawg = b.lexicon().unwrap();
        // root, 3 markers, B C R, A, T
        assert_eq!(dawg.node_count(), 9);
        assert!((reduction - (1.0 - 9.0 / 13.0)).abs() < 1e-9);
    }

    #[test]
    fn compress_twice_gives_same_result() {
        let mut b = builder(DawgType::All);
        for word in ["BAKE", "CAKE", "FAKE", "LAKE", "MAKE", "BAKED"] {
            b.add_word(word).unwrap();
        }
        let first = b.compress().unwrap();
        let nodes = b.lexicon().unwrap().node_count();
        let second = b.compress().unwrap();
        assert_eq!(first, second);
        assert_eq!(b.lexicon().unwrap().node_count(), nodes);
    }

    #[test]
    fn wordlets_follow_dawg_type() {
        let mut b = builder(DawgType::ForwardWord);
        b.add_word("BATS").unwrap();
        b.compress().unwrap();
        let dawg = b.lexicon().unwrap();
        assert_eq!(dawg.count_words(), 1);
        assert_eq!(dawg.count_reverse_wordlets(), 0);
        assert_eq!(dawg.count_forward_wordlets(), 0);

        let mut b = builder(DawgType::ForwardWordAndReverseWordlet);
        b.add_word("BATS").unwrap();
        b.compress().unwrap();
        let dawg = b.lexicon().unwrap();
        assert_eq!(dawg.count_words(), 1);
        assert_eq!(dawg.count_reverse_wordlets(), 4);
        assert_eq!(dawg.entries(Category::ReverseWordlet), ["AB", "B", "STAB", "TAB"]);
        assert_eq!(dawg.count_forward_wordlets(), 0);

        let mut b = builder(DawgType::All);
        b.add_word("BATS").unwrap();
        b.compress().unwrap();
        let dawg = b.lexicon().unwrap();
        assert_eq!(dawg.count_reverse_wordlets(), 4);
        assert_eq!(dawg.entries(Category::ForwardWordlet), ["ATS", "BATS", "S", "TS"]);
    }

    #[test]
    fn header_counts_are_filled_in() {
        let mut b = builder(DawgType::All);
        for word in ["AB", "BA"] {
            b.add_word(word).unwrap();
        }
        b.compress().unwrap();
        let report = b.report().unwrap();
        assert_eq!(report.num_words, 2);
        // A, B, BA, AB
        assert_eq!(report.num_reverse_wordlets, 4);
        // AB, B, BA, A
        assert_eq!(report.num_forward_wordlets, 4);
        assert_eq!(report.lexicon_name, "Test");
        assert_eq!(report.save, None);

        let header = b.lexicon().unwrap().header().clone();
        assert_eq!(header.num_words, 2);
        assert_eq!(header.dawg_type, DawgType::All);
        assert_eq!(header.lexicon_date, "01 January 2024");
    }

    #[test]
    fn header_counts_agree_with_recount() {
        let mut b = builder(DawgType::All);
        for word in ["BAKE", "BAKED", "BAKER", "CAKE", "MAKE", "MAKER", "TAKE"] {
            b.add_word(word).unwrap();
        }
        b.add_word("BAKE").unwrap();
        b.compress().unwrap();
        assert_eq!(b.phase(), Phase::Compressed);
        let report = b.report().unwrap();
        let dawg = b.lexicon().unwrap();
        let (_, counts) = tally(dawg.nodes()).unwrap();
        assert_eq!(
            counts,
            [
                report.num_words,
                report.num_reverse_wordlets,
                report.num_forward_wordlets
            ]
        );
        assert_eq!(report.num_words, 7);
    }

    #[test]
    fn very_long_word_compresses() {
        let word = "AB".repeat(50_000);
        let mut b = builder(DawgType::ForwardWord);
        b.add_word(&word).unwrap();
        b.compress().unwrap();
        let dawg = b.lexicon().unwrap();
        assert_eq!(dawg.count_words(), 1);
        assert!(dawg.contains(Category::ForwardWord, &word));
        assert!(!dawg.contains(Category::ForwardWord, &word[1..]));
        assert_eq!(dawg.entries(Category::ForwardWord), [word]);
    }

    #[test]
    fn insertion_order_does_not_matter() {
        use itertools::Itertools;
        const WORDS: [&str; 6] = ["ALFA", "BRAVO", "CHARLIE", "DELTA", "ECHO", "FOXTROT"];

        let reference = build_dawg(LexiconConfig::default().with_date("x"), WORDS).unwrap();
        // Go through all permutations and check that each one gives the very same records.
        for wordlist in WORDS.iter().permutations(WORDS.len()) {
            let dawg = build_dawg(LexiconConfig::default().with_date("x"), wordlist).unwrap();
            assert_eq!(dawg.nodes(), reference.nodes());
        }
    }

    #[test]
    fn duplicates_and_prefixes() {
        let mut b = builder(DawgType::ForwardWord);
        assert!(b.add_word("TESTER").unwrap());
        assert!(b.add_word("TEST").unwrap());
        assert!(!b.add_word("TEST").unwrap());
        let stats = b.insert_stats();
        assert_eq!(stats.entries_added, 2);
        assert_eq!(stats.duplicates, 1);

        b.compress().unwrap();
        let dawg = b.lexicon().unwrap();
        assert_eq!(dawg.entries(Category::ForwardWord), ["TEST", "TESTER"]);
        assert!(!dawg.contains(Category::ForwardWord, "TES"));
        assert!(dawg.has_prefix(Category::ForwardWord, "TES"));
        assert_eq!(b.insert_stats(), stats);
    }

    #[test]
    fn raw_insert_skips_wordlets() {
        let mut b = builder(DawgType::All);
        b.insert("ZAP", Category::ForwardWord).unwrap();
        b.insert("PAZ", Category::ReverseWordlet).unwrap();
        b.compress().unwrap();
        let dawg = b.lexicon().unwrap();
        assert_eq!(dawg.count_words(), 1);
        assert_eq!(dawg.count_reverse_wordlets(), 1);
        assert_eq!(dawg.count_forward_wordlets(), 0);
    }

    #[test]
    fn adding_after_compress_is_a_phase_violation() {
        let mut b = builder(DawgType::ForwardWord);
        b.add_word("ONE").unwrap();
        b.compress().unwrap();
        let err = b.add_word("TWO").unwrap_err();
        assert!(matches!(
            err,
            DawgError::PhaseViolation {
                operation: "add_word",
                phase: Phase::Compressed
            }
        ));
        assert!(matches!(
            b.insert("TWO", Category::ForwardWord),
            Err(DawgError::PhaseViolation { .. })
        ));
    }

    #[test]
    fn querying_before_compress_is_a_phase_violation() {
        let mut b = builder(DawgType::ForwardWord);
        b.add_word("ONE").unwrap();
        assert!(matches!(
            b.lexicon(),
            Err(DawgError::PhaseViolation {
                operation: "lexicon",
                phase: Phase::AddingWords
            })
        ));
        assert!(matches!(b.save("never.dawg"), Err(DawgError::PhaseViolation { .. })));
        assert!(matches!(b.report(), Err(DawgError::PhaseViolation { .. })));
        assert_eq!(
            b.lexicon().unwrap_err().to_string(),
            "'lexicon' is not allowed while the builder is adding words"
        );
    }

    #[test]
    fn rejected_word_leaves_builder_usable() {
        let mut b = builder(DawgType::All);
        assert!(matches!(
            b.add_word("NO WAY"),
            Err(DawgError::InvalidLetter { letter: ' ', .. })
        ));
        assert!(matches!(b.add_word(""), Err(DawgError::EmptyWord)));
        assert_eq!(b.phase(), Phase::AddingWords);
        b.add_word("YES").unwrap();
        b.compress().unwrap();
        let dawg = b.lexicon().unwrap();
        assert_eq!(dawg.entries(Category::ForwardWord), ["YES"]);
        assert_eq!(dawg.count_reverse_wordlets(), 3);
    }

    #[test]
    fn empty_lexicon_still_has_root_and_markers() {
        let mut b = builder(DawgType::ForwardWord);
        assert_eq!(b.compress().unwrap(), 0.0);
        let dawg = b.lexicon().unwrap();
        assert_eq!(dawg.node_count(), 4);
        assert_eq!(dawg.count_words(), 0);
    }

    #[test]
    fn save_is_recorded_in_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.dawg");
        let mut b = builder(DawgType::ForwardWord);
        b.add_word("SAVED").unwrap();
        b.compress().unwrap();
        let stats = b.save(&path).unwrap();
        assert_eq!(stats.nodes, b.lexicon().unwrap().node_count());
        assert_eq!(b.report().unwrap().save, Some(stats));
        assert_eq!(Dawg::load(&path).unwrap(), b.lexicon().unwrap());
    }
}
