//! Immutable output of a trie build

use serde::{Deserialize, Serialize};

use super::levels::{DenseLevels, SparseLevels};
use crate::succinct::Word;

/// Structural slot at which a key became unique in the trie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPosition {
    /// Trie level of the slot
    pub level: usize,
    /// Edge slot within the sparse arrays of `level`
    pub slot: usize,
    /// Index of the key in the input list (first of a run of duplicates)
    pub key_index: usize,
}

/// LOUDS-Dense and LOUDS-Sparse vectors produced by
/// [`FstBuilder`](super::FstBuilder)
///
/// The sparse vectors cover every level of the trie; consumers of the
/// sparse encoding read levels `sparse_start_level()..tree_height()`. The
/// dense vectors cover levels `0..sparse_start_level()`.
///
/// Key positions are partitioned by region and ordered by level, then slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FstLayout {
    pub(crate) sparse: SparseLevels,
    pub(crate) dense: DenseLevels,
    pub(crate) sparse_start_level: usize,
    pub(crate) dense_positions: Vec<KeyPosition>,
    pub(crate) sparse_positions: Vec<KeyPosition>,
    pub(crate) num_keys: usize,
}

impl FstLayout {
    /// Number of trie levels
    #[inline]
    pub fn tree_height(&self) -> usize {
        self.sparse.tree_height()
    }

    /// First level of the sparse region; levels below it are dense
    #[inline]
    pub fn sparse_start_level(&self) -> usize {
        self.sparse_start_level
    }

    /// Number of keys in the input list, duplicates included
    #[inline]
    pub fn num_keys(&self) -> usize {
        self.num_keys
    }

    /// Number of distinct keys, one per recorded position
    pub fn num_distinct_keys(&self) -> usize {
        self.dense_positions.len() + self.sparse_positions.len()
    }

    /// Sparse vectors of every level
    pub fn sparse(&self) -> &SparseLevels {
        &self.sparse
    }

    /// Dense vectors of the levels below the cutoff
    pub fn dense(&self) -> &DenseLevels {
        &self.dense
    }

    /// Edge labels per level
    pub fn labels(&self) -> &[Vec<u8>] {
        self.sparse.labels()
    }

    /// Child-indicator bits per level
    pub fn child_indicator_bits(&self) -> &[Vec<Word>] {
        self.sparse.child_indicator_bits()
    }

    /// Node-start bits per level
    pub fn louds_bits(&self) -> &[Vec<Word>] {
        self.sparse.louds_bits()
    }

    /// Number of nodes per level
    pub fn node_counts(&self) -> &[usize] {
        self.sparse.node_counts()
    }

    /// Number of edges (and of valid sparse bits) per level
    pub fn sparse_item_counts(&self) -> Vec<usize> {
        self.sparse.item_counts()
    }

    /// Label bitmaps of the dense levels
    pub fn bitmap_labels(&self) -> &[Vec<Word>] {
        self.dense.bitmap_labels()
    }

    /// Child-indicator bitmaps of the dense levels
    pub fn bitmap_child_indicator_bits(&self) -> &[Vec<Word>] {
        self.dense.bitmap_child_indicator_bits()
    }

    /// Prefix-key bits of the dense levels
    pub fn prefixkey_indicator_bits(&self) -> &[Vec<Word>] {
        self.dense.prefixkey_indicator_bits()
    }

    /// Number of valid bits in each dense label/child bitmap
    pub fn dense_bitmap_bit_counts(&self) -> Vec<usize> {
        self.dense.bitmap_bit_counts()
    }

    /// Number of valid bits in each dense prefix-key array
    pub fn prefix_key_bit_counts(&self) -> Vec<usize> {
        self.dense.prefix_key_bit_counts()
    }

    /// Positions recorded in the dense region
    pub fn dense_positions(&self) -> &[KeyPosition] {
        &self.dense_positions
    }

    /// Positions recorded in the sparse region
    pub fn sparse_positions(&self) -> &[KeyPosition] {
        &self.sparse_positions
    }

    /// Key indices of the dense region, in structural order
    pub fn dense_key_indices(&self) -> Vec<usize> {
        self.dense_positions.iter().map(|p| p.key_index).collect()
    }

    /// Key indices of the sparse region, in structural order
    pub fn sparse_key_indices(&self) -> Vec<usize> {
        self.sparse_positions.iter().map(|p| p.key_index).collect()
    }

    /// Recorded position at `(level, slot)`, if a key became unique there
    pub fn position_at(&self, level: usize, slot: usize) -> Option<&KeyPosition> {
        let region = if level < self.sparse_start_level {
            &self.dense_positions
        } else {
            &self.sparse_positions
        };
        region
            .binary_search_by(|p| (p.level, p.slot).cmp(&(level, slot)))
            .ok()
            .map(|i| &region[i])
    }

    /// Estimated dense cost at the chosen cutoff
    pub fn dense_mem(&self) -> u64 {
        super::cutoff::dense_mem(self.sparse.node_counts(), self.sparse_start_level)
    }

    /// Estimated sparse cost at the chosen cutoff
    pub fn sparse_mem(&self) -> u64 {
        super::cutoff::sparse_mem(&self.sparse.item_counts(), self.sparse_start_level)
    }

    /// Bytes held by the vectors each region actually uses
    pub fn memory_usage(&self) -> usize {
        let word = std::mem::size_of::<Word>();
        let start = self.sparse_start_level;

        let sparse: usize = (start..self.tree_height())
            .map(|level| {
                self.labels()[level].len()
                    + (self.child_indicator_bits()[level].len() + self.louds_bits()[level].len())
                        * word
            })
            .sum();

        let dense: usize = (0..self.dense.num_levels())
            .map(|level| {
                (self.bitmap_labels()[level].len()
                    + self.bitmap_child_indicator_bits()[level].len()
                    + self.prefixkey_indicator_bits()[level].len())
                    * word
            })
            .sum();

        let positions = (self.dense_positions.len() + self.sparse_positions.len())
            * std::mem::size_of::<usize>();

        sparse + dense + positions
    }
}
