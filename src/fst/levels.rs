//! Per-level LOUDS-Sparse and LOUDS-Dense vectors
//!
//! Both encodings are stored one array per trie level. Bit arrays are word
//! vectors that grow one word at a time: a level starts with one zero word,
//! and a fresh word is appended whenever an append fills the current one,
//! so the slot for the next item always exists.

use serde::{Deserialize, Serialize};

use crate::succinct::{read_bit, set_bit, Word, FANOUT, WORD_BITS};

/// LOUDS-Sparse vectors, one entry per trie level
///
/// Within a level, index `slot` addresses one edge: `labels[level][slot]`
/// is its byte, and bit `slot` of the two bit arrays holds its
/// child-indicator and node-start flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseLevels {
    labels: Vec<Vec<u8>>,
    child_indicator_bits: Vec<Vec<Word>>,
    louds_bits: Vec<Vec<Word>>,
    node_counts: Vec<usize>,
    is_last_item_terminator: Vec<bool>,
}

impl SparseLevels {
    /// Create an empty set of levels
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of levels
    #[inline]
    pub fn tree_height(&self) -> usize {
        self.labels.len()
    }

    /// Number of edges stored at `level`
    #[inline]
    pub fn num_items(&self, level: usize) -> usize {
        self.labels[level].len()
    }

    /// Edge counts of every level
    pub fn item_counts(&self) -> Vec<usize> {
        self.labels.iter().map(Vec::len).collect()
    }

    /// Edge labels per level
    pub fn labels(&self) -> &[Vec<u8>] {
        &self.labels
    }

    /// Child-indicator bits per level
    pub fn child_indicator_bits(&self) -> &[Vec<Word>] {
        &self.child_indicator_bits
    }

    /// Node-start (LOUDS) bits per level
    pub fn louds_bits(&self) -> &[Vec<Word>] {
        &self.louds_bits
    }

    /// Number of nodes per level
    pub fn node_counts(&self) -> &[usize] {
        &self.node_counts
    }

    /// Whether the last edge appended at each level was a terminator
    pub fn is_last_item_terminator(&self) -> &[bool] {
        &self.is_last_item_terminator
    }

    /// Label of the edge at `(level, pos)`
    #[inline]
    pub fn label(&self, level: usize, pos: usize) -> u8 {
        self.labels[level][pos]
    }

    /// Whether the edge at `(level, pos)` continues to the next level
    #[inline]
    pub fn has_child(&self, level: usize, pos: usize) -> bool {
        read_bit(&self.child_indicator_bits[level], pos)
    }

    /// Whether the edge at `(level, pos)` opens a node
    #[inline]
    pub fn is_start_of_node(&self, level: usize, pos: usize) -> bool {
        read_bit(&self.louds_bits[level], pos)
    }

    /// Whether the edge at `(level, pos)` is a childless terminator edge
    #[inline]
    pub fn is_terminator(&self, level: usize, pos: usize, terminator: u8) -> bool {
        self.labels[level][pos] == terminator && !self.has_child(level, pos)
    }

    pub(crate) fn is_level_empty(&self, level: usize) -> bool {
        level >= self.tree_height() || self.labels[level].is_empty()
    }

    // A key byte shares the trie path if it equals the last label at its
    // level and that label does not close a prefix key.
    pub(crate) fn is_char_common_prefix(&self, c: u8, level: usize) -> bool {
        level < self.tree_height()
            && !self.is_last_item_terminator[level]
            && self.labels[level].last() == Some(&c)
    }

    /// Mark the last edge at `level` as having children
    pub(crate) fn set_last_child_bit(&mut self, level: usize) {
        let pos = self.num_items(level) - 1;
        set_bit(&mut self.child_indicator_bits[level], pos);
    }

    pub(crate) fn insert_key_byte(
        &mut self,
        c: u8,
        level: usize,
        is_start_of_node: bool,
        is_term: bool,
    ) {
        if level >= self.tree_height() {
            debug_assert_eq!(level, self.tree_height());
            self.add_level();
        }

        if level > 0 {
            self.set_last_child_bit(level - 1);
        }

        self.labels[level].push(c);
        if is_start_of_node {
            let pos = self.num_items(level) - 1;
            set_bit(&mut self.louds_bits[level], pos);
            self.node_counts[level] += 1;
        }
        self.is_last_item_terminator[level] = is_term;

        self.move_to_next_item_slot(level);
    }

    fn move_to_next_item_slot(&mut self, level: usize) {
        if self.num_items(level) % WORD_BITS == 0 {
            self.child_indicator_bits[level].push(0);
            self.louds_bits[level].push(0);
        }
    }

    fn add_level(&mut self) {
        self.labels.push(Vec::new());
        self.child_indicator_bits.push(vec![0]);
        self.louds_bits.push(vec![0]);
        self.node_counts.push(0);
        self.is_last_item_terminator.push(false);
    }
}

/// LOUDS-Dense vectors for the levels above the cutoff
///
/// Node `n` of a level owns bits `n * FANOUT .. (n + 1) * FANOUT` of that
/// level's label and child bitmaps, and bit `n` of its prefix-key bits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenseLevels {
    bitmap_labels: Vec<Vec<Word>>,
    bitmap_child_indicator_bits: Vec<Vec<Word>>,
    prefixkey_indicator_bits: Vec<Vec<Word>>,
    node_counts: Vec<usize>,
}

impl DenseLevels {
    /// Create an empty set of levels
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of dense levels
    #[inline]
    pub fn num_levels(&self) -> usize {
        self.bitmap_labels.len()
    }

    /// Label bitmaps per level
    pub fn bitmap_labels(&self) -> &[Vec<Word>] {
        &self.bitmap_labels
    }

    /// Child-indicator bitmaps per level
    pub fn bitmap_child_indicator_bits(&self) -> &[Vec<Word>] {
        &self.bitmap_child_indicator_bits
    }

    /// Prefix-key bits per level
    pub fn prefixkey_indicator_bits(&self) -> &[Vec<Word>] {
        &self.prefixkey_indicator_bits
    }

    /// Number of nodes per dense level
    pub fn node_counts(&self) -> &[usize] {
        &self.node_counts
    }

    /// Bits in the label (and child) bitmap of each level
    pub fn bitmap_bit_counts(&self) -> Vec<usize> {
        self.node_counts.iter().map(|&nc| nc * FANOUT).collect()
    }

    /// Bits in the prefix-key array of each level
    pub fn prefix_key_bit_counts(&self) -> Vec<usize> {
        self.node_counts.clone()
    }

    /// Whether node `node` at `level` has an edge labeled `label`
    pub fn has_label(&self, level: usize, node: usize, label: u8) -> bool {
        read_bit(&self.bitmap_labels[level], node * FANOUT + label as usize)
    }

    /// Whether the edge `label` of node `node` at `level` has children
    pub fn has_child(&self, level: usize, node: usize, label: u8) -> bool {
        read_bit(
            &self.bitmap_child_indicator_bits[level],
            node * FANOUT + label as usize,
        )
    }

    /// Whether node `node` at `level` terminates a prefix key
    pub fn is_prefix_key(&self, level: usize, node: usize) -> bool {
        read_bit(&self.prefixkey_indicator_bits[level], node)
    }

    /// Append zeroed vectors for a level with `node_count` nodes
    pub(crate) fn init_level(&mut self, node_count: usize) {
        let bitmap_words = node_count * (FANOUT / WORD_BITS);
        self.bitmap_labels.push(vec![0; bitmap_words]);
        self.bitmap_child_indicator_bits.push(vec![0; bitmap_words]);
        self.prefixkey_indicator_bits
            .push(vec![0; (node_count + WORD_BITS - 1) / WORD_BITS]);
        self.node_counts.push(node_count);
    }

    pub(crate) fn set_label(&mut self, level: usize, node: usize, label: u8, has_child: bool) {
        let pos = node * FANOUT + label as usize;
        set_bit(&mut self.bitmap_labels[level], pos);
        if has_child {
            set_bit(&mut self.bitmap_child_indicator_bits[level], pos);
        }
    }

    pub(crate) fn set_prefix_key(&mut self, level: usize, node: usize) {
        set_bit(&mut self.prefixkey_indicator_bits[level], node);
    }
}
