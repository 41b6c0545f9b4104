//! Memory cost model for choosing the dense/sparse cutoff level
//!
//! Costs are rough sizes in bytes, comparable only with each other.

use log::trace;

use crate::succinct::FANOUT;

/// Estimated cost of encoding levels `0..downto_level` densely
///
/// Each node pays for its label and child bitmaps; each level after the
/// first also pays for the prefix-key bits of the level above it.
pub fn dense_mem(node_counts: &[usize], downto_level: usize) -> u64 {
    debug_assert!(downto_level <= node_counts.len());
    let mut mem = 0u64;
    for level in 0..downto_level {
        mem += (2 * FANOUT * node_counts[level]) as u64;
        if level > 0 {
            mem += (node_counts[level - 1] / 8 + 1) as u64;
        }
    }
    mem
}

/// Estimated cost of encoding levels `start_level..` sparsely
///
/// One byte per label plus two indicator bits per item, rounded up per level.
pub fn sparse_mem(item_counts: &[usize], start_level: usize) -> u64 {
    item_counts
        .iter()
        .skip(start_level)
        .map(|&num_items| (num_items + 2 * num_items / 8 + 1) as u64)
        .sum()
}

/// First level where `dense_mem(L) * ratio >= sparse_mem(L)`, or the tree
/// height when no level satisfies it
pub fn determine_cutoff_level(node_counts: &[usize], item_counts: &[usize], ratio: u32) -> usize {
    let height = item_counts.len();
    let mut cutoff_level = 0;
    let mut dense = dense_mem(node_counts, cutoff_level);
    let mut sparse = sparse_mem(item_counts, cutoff_level);
    while cutoff_level < height && dense.saturating_mul(ratio as u64) < sparse {
        trace!(
            "cutoff candidate {}: dense {} x {} < sparse {}",
            cutoff_level,
            dense,
            ratio,
            sparse
        );
        cutoff_level += 1;
        dense = dense_mem(node_counts, cutoff_level);
        sparse = sparse_mem(item_counts, cutoff_level);
    }
    cutoff_level
}
