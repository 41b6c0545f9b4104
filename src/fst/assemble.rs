//! Rank/select indexes over the regions of a built trie
//!
//! [`AssembledFst`] turns the per-level vectors of an [`FstLayout`] into the
//! concatenated bit sequences and auxiliary indexes a query engine walks:
//! select over the sparse node-start bits to find where a node begins, rank
//! over child-indicator bits to find which node an edge leads to.

use std::sync::Arc;

use log::debug;

use super::layout::FstLayout;
use super::stats::{BuildStats, StatisticsProvider};
use crate::config::FstConfig;
use crate::error::Result;
use crate::succinct::{BitIndex, RankIndex, SelectIndex, WordBitVector};

/// Dense region indexes, levels `0..sparse_start_level`
#[derive(Debug, Clone)]
pub struct DenseRegion {
    label_bitmaps: RankIndex,
    child_bitmaps: RankIndex,
    prefix_keys: RankIndex,
}

impl DenseRegion {
    fn new(layout: &FstLayout, config: &FstConfig) -> Result<Self> {
        let cutoff = layout.sparse_start_level();
        let bitmap_counts = layout.dense_bitmap_bit_counts();
        let prefix_counts = layout.prefix_key_bit_counts();

        let labels =
            WordBitVector::from_levels(layout.bitmap_labels(), &bitmap_counts, 0, cutoff)?;
        let children = WordBitVector::from_levels(
            layout.bitmap_child_indicator_bits(),
            &bitmap_counts,
            0,
            cutoff,
        )?;
        let prefix_keys =
            WordBitVector::from_levels(layout.prefixkey_indicator_bits(), &prefix_counts, 0, cutoff)?;

        Ok(Self {
            label_bitmaps: RankIndex::new(config.rank_block_size, Arc::new(labels))?,
            child_bitmaps: RankIndex::new(config.rank_block_size, Arc::new(children))?,
            prefix_keys: RankIndex::new(config.rank_block_size, Arc::new(prefix_keys))?,
        })
    }

    /// Rank over the concatenated label bitmaps
    pub fn label_bitmaps(&self) -> &RankIndex {
        &self.label_bitmaps
    }

    /// Rank over the concatenated child-indicator bitmaps
    pub fn child_bitmaps(&self) -> &RankIndex {
        &self.child_bitmaps
    }

    /// Rank over the concatenated prefix-key bits
    pub fn prefix_keys(&self) -> &RankIndex {
        &self.prefix_keys
    }

    /// Bytes used by the region
    pub fn size(&self) -> usize {
        self.label_bitmaps.size() + self.child_bitmaps.size() + self.prefix_keys.size()
    }
}

/// Sparse region indexes, levels `sparse_start_level..tree_height`
#[derive(Debug, Clone)]
pub struct SparseRegion {
    labels: Vec<u8>,
    louds: SelectIndex,
    child_indicator: RankIndex,
}

impl SparseRegion {
    fn new(layout: &FstLayout, config: &FstConfig) -> Result<Self> {
        let start = layout.sparse_start_level();
        let end = layout.tree_height();
        let item_counts = layout.sparse_item_counts();

        let labels = layout.labels()[start..end].concat();
        let louds = WordBitVector::from_levels(layout.louds_bits(), &item_counts, start, end)?;
        let children =
            WordBitVector::from_levels(layout.child_indicator_bits(), &item_counts, start, end)?;

        Ok(Self {
            labels,
            louds: SelectIndex::new(config.select_sample_interval, Arc::new(louds))?,
            child_indicator: RankIndex::new(config.rank_block_size, Arc::new(children))?,
        })
    }

    /// Concatenated edge labels
    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    /// Select over the concatenated node-start bits
    pub fn louds(&self) -> &SelectIndex {
        &self.louds
    }

    /// Rank over the concatenated child-indicator bits
    pub fn child_indicator(&self) -> &RankIndex {
        &self.child_indicator
    }

    /// Bytes used by the region
    pub fn size(&self) -> usize {
        self.labels.len() + self.louds.size() + self.child_indicator.size()
    }
}

/// Rank/select indexes over both regions of a trie layout
///
/// A region with no levels is `None`.
///
/// # Examples
///
/// ```rust
/// use louds_fst::{AssembledFst, FstBuilder, FstConfig};
///
/// let config = FstConfig::default();
/// let layout = FstBuilder::new(config.clone()).build(&["f", "far", "fast", "s", "top", "toy", "trie"])?;
/// let fst = AssembledFst::new(&layout, &config)?;
///
/// let sparse = fst.sparse().expect("levels 1..3 are sparse");
/// assert_eq!(sparse.labels(), b"aorrspy");
/// // Second node of the sparse region starts at edge 1 ("o" under "t").
/// assert_eq!(sparse.louds().select(2)?, 1);
/// # Ok::<(), louds_fst::FstError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AssembledFst {
    dense: Option<DenseRegion>,
    sparse: Option<SparseRegion>,
    sparse_start_level: usize,
    tree_height: usize,
    stats: BuildStats,
}

impl AssembledFst {
    /// Build the region indexes for `layout`
    pub fn new(layout: &FstLayout, config: &FstConfig) -> Result<Self> {
        let dense = if layout.sparse_start_level() > 0 {
            Some(DenseRegion::new(layout, config)?)
        } else {
            None
        };
        let sparse = if layout.sparse_start_level() < layout.tree_height() {
            Some(SparseRegion::new(layout, config)?)
        } else {
            None
        };

        let mut fst = Self {
            dense,
            sparse,
            sparse_start_level: layout.sparse_start_level(),
            tree_height: layout.tree_height(),
            stats: layout.stats(),
        };
        fst.stats.memory_usage = fst.size();
        fst.stats.calculate_bits_per_key();

        debug!(
            "assembled trie: dense {} bytes, sparse {} bytes",
            fst.dense.as_ref().map_or(0, DenseRegion::size),
            fst.sparse.as_ref().map_or(0, SparseRegion::size)
        );
        Ok(fst)
    }

    /// Dense region, if any level is dense
    pub fn dense(&self) -> Option<&DenseRegion> {
        self.dense.as_ref()
    }

    /// Sparse region, if any level is sparse
    pub fn sparse(&self) -> Option<&SparseRegion> {
        self.sparse.as_ref()
    }

    /// First sparse level
    pub fn sparse_start_level(&self) -> usize {
        self.sparse_start_level
    }

    /// Number of trie levels
    pub fn tree_height(&self) -> usize {
        self.tree_height
    }

    /// Total bytes used by both regions
    pub fn size(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.dense.as_ref().map_or(0, DenseRegion::size)
            + self.sparse.as_ref().map_or(0, SparseRegion::size)
    }
}

impl StatisticsProvider for AssembledFst {
    fn stats(&self) -> BuildStats {
        self.stats.clone()
    }
}
