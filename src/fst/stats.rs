//! Build statistics

use serde::{Deserialize, Serialize};

use super::layout::FstLayout;

/// Summary of a built trie
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Number of input keys, duplicates included
    pub num_keys: usize,
    /// Number of distinct keys
    pub num_distinct_keys: usize,
    /// Number of trie levels
    pub tree_height: usize,
    /// First sparse level
    pub sparse_start_level: usize,
    /// Nodes encoded densely
    pub dense_node_count: usize,
    /// Edges encoded sparsely
    pub sparse_item_count: usize,
    /// Estimated dense cost at the cutoff
    pub dense_mem: u64,
    /// Estimated sparse cost at the cutoff
    pub sparse_mem: u64,
    /// Memory usage in bytes
    pub memory_usage: usize,
    /// Space efficiency (bits per distinct key)
    pub bits_per_key: f64,
}

impl BuildStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate bits per key
    pub fn calculate_bits_per_key(&mut self) {
        if self.num_distinct_keys > 0 {
            self.bits_per_key = (self.memory_usage * 8) as f64 / self.num_distinct_keys as f64;
        }
    }
}

/// Types that can report [`BuildStats`]
pub trait StatisticsProvider {
    /// Get detailed statistics
    fn stats(&self) -> BuildStats;

    /// Get memory usage in bytes
    fn memory_usage(&self) -> usize {
        self.stats().memory_usage
    }

    /// Get space efficiency in bits per key
    fn bits_per_key(&self) -> f64 {
        self.stats().bits_per_key
    }
}

impl StatisticsProvider for FstLayout {
    fn stats(&self) -> BuildStats {
        let cutoff = self.sparse_start_level();
        let mut stats = BuildStats {
            num_keys: self.num_keys(),
            num_distinct_keys: self.num_distinct_keys(),
            tree_height: self.tree_height(),
            sparse_start_level: cutoff,
            dense_node_count: self.node_counts()[..cutoff].iter().sum(),
            sparse_item_count: self.sparse_item_counts()[cutoff..].iter().sum(),
            dense_mem: self.dense_mem(),
            sparse_mem: self.sparse_mem(),
            memory_usage: self.memory_usage(),
            bits_per_key: 0.0,
        };
        stats.calculate_bits_per_key();
        stats
    }
}
