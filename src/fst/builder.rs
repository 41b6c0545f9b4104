//! Single-pass construction of the LOUDS-Sparse and LOUDS-Dense vectors
//!
//! The builder streams a sorted key list once. For each key it walks down
//! the path shared with the previously inserted key, then appends only as
//! many bytes as are needed to tell the key apart from its successor. The
//! levels above a cost-based cutoff are afterwards re-encoded densely from
//! the finished sparse vectors.

use log::{debug, warn};

use super::cutoff::{dense_mem, determine_cutoff_level, sparse_mem};
use super::layout::{FstLayout, KeyPosition};
use super::levels::{DenseLevels, SparseLevels};
use crate::config::FstConfig;
use crate::error::{FstError, Result};

/// Builds [`FstLayout`]s from sorted key lists
///
/// # Examples
///
/// ```rust
/// use louds_fst::{FstBuilder, FstConfig};
///
/// let keys = ["f", "far", "fast", "s", "top", "toy", "trie"];
/// let layout = FstBuilder::new(FstConfig::default()).build(&keys)?;
///
/// assert_eq!(layout.tree_height(), 3);
/// assert_eq!(layout.sparse_start_level(), 1);
/// assert_eq!(layout.dense_key_indices(), vec![0, 3]);
/// assert_eq!(layout.sparse_key_indices(), vec![6, 1, 2, 4, 5]);
/// # Ok::<(), louds_fst::FstError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FstBuilder {
    config: FstConfig,
}

impl FstBuilder {
    /// Create a builder with the given configuration
    pub fn new(config: FstConfig) -> Self {
        Self { config }
    }

    /// Configuration used by [`build`](Self::build)
    pub fn config(&self) -> &FstConfig {
        &self.config
    }

    /// Build the trie vectors for `keys`
    ///
    /// `keys` must be non-empty, free of empty keys and sorted ascending by
    /// byte value. Consecutive duplicates collapse to the first occurrence.
    /// Sort order is checked only when
    /// [`VERIFY_SORTED`](crate::config::BuildFlags::VERIFY_SORTED) is set.
    pub fn build<K: AsRef<[u8]>>(&self, keys: &[K]) -> Result<FstLayout> {
        self.validate_keys(keys)?;

        let mut pass = SparsePass::new(&self.config);
        pass.run(keys)?;
        let SparsePass {
            sparse, positions, ..
        } = pass;

        let sparse_start_level = if self.config.include_dense() {
            let cutoff = determine_cutoff_level(
                sparse.node_counts(),
                &sparse.item_counts(),
                self.config.sparse_dense_ratio,
            );
            debug!(
                "cutoff level {} of {} (dense {} x {}, sparse {})",
                cutoff,
                sparse.tree_height(),
                dense_mem(sparse.node_counts(), cutoff),
                self.config.sparse_dense_ratio,
                sparse_mem(&sparse.item_counts(), cutoff)
            );
            cutoff
        } else {
            0
        };

        let dense = build_dense(&sparse, sparse_start_level, self.config.terminator);

        let (dense_positions, sparse_positions) = partition_positions(positions, sparse_start_level);

        let layout = FstLayout {
            sparse,
            dense,
            sparse_start_level,
            dense_positions,
            sparse_positions,
            num_keys: keys.len(),
        };

        debug!(
            "built trie: {} keys ({} distinct), height {}, cutoff {}, {} sparse items",
            layout.num_keys(),
            layout.num_distinct_keys(),
            layout.tree_height(),
            layout.sparse_start_level(),
            layout.sparse_item_counts().iter().skip(sparse_start_level).sum::<usize>()
        );

        Ok(layout)
    }

    fn validate_keys<K: AsRef<[u8]>>(&self, keys: &[K]) -> Result<()> {
        if keys.is_empty() {
            return Err(FstError::EmptyKeySet);
        }
        if let Some(index) = keys.iter().position(|k| k.as_ref().is_empty()) {
            return Err(FstError::empty_key(index));
        }
        if self.config.verify_sorted() {
            if let Some(index) = keys
                .windows(2)
                .position(|pair| pair[0].as_ref() > pair[1].as_ref())
            {
                return Err(FstError::unsorted_keys(index));
            }
        } else {
            warn!(
                "sort verification disabled, building from {} keys assumed sorted",
                keys.len()
            );
        }
        Ok(())
    }
}

/// Mutable state of the sparse pass
struct SparsePass {
    sparse: SparseLevels,
    positions: Vec<Vec<KeyPosition>>,
    // Levels occupied by the previously inserted key. Last labels below
    // this depth belong to other branches.
    prev_key_depth: usize,
    terminator: u8,
    terminate_prefix_keys: bool,
}

impl SparsePass {
    fn new(config: &FstConfig) -> Self {
        Self {
            sparse: SparseLevels::new(),
            positions: Vec::new(),
            prev_key_depth: 0,
            terminator: config.terminator,
            terminate_prefix_keys: config.terminate_prefix_keys(),
        }
    }

    fn run<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> Result<()> {
        let mut i = 0;
        while i < keys.len() {
            let key = keys[i].as_ref();
            let level = self.skip_common_prefix(key);
            let position = i;
            while i + 1 < keys.len() && keys[i + 1].as_ref() == key {
                i += 1;
            }
            let next_key: &[u8] = match keys.get(i + 1) {
                Some(next) => next.as_ref(),
                None => &[],
            };

            // The whole key lies on the previous key's path, so it sorts
            // before it.
            if level >= key.len() {
                return Err(FstError::unsorted_keys(position - 1));
            }
            self.insert_key_bytes_until_unique(key, position, next_key, level);
            i += 1;
        }
        Ok(())
    }

    fn skip_common_prefix(&mut self, key: &[u8]) -> usize {
        let mut level = 0;
        while level < key.len()
            && level < self.prev_key_depth
            && self.sparse.is_char_common_prefix(key[level], level)
        {
            self.sparse.set_last_child_bit(level);
            level += 1;
        }
        level
    }

    fn insert_key_bytes_until_unique(
        &mut self,
        key: &[u8],
        position: usize,
        next_key: &[u8],
        start_level: usize,
    ) {
        let mut level = start_level;
        // Below the previous key's last edge the byte opens a new node.
        let is_start_of_node =
            self.sparse.is_level_empty(level) || level >= self.prev_key_depth;
        self.insert_key_byte(key[level], level, is_start_of_node, false);
        level += 1;

        if level > next_key.len() || key[..level] != next_key[..level] {
            self.record_position(level - 1, position);
            return;
        }

        // Every further byte opens a single-child node.
        while level < key.len() && level < next_key.len() && key[level - 1] == next_key[level - 1] {
            self.insert_key_byte(key[level], level, true, false);
            level += 1;
        }

        if self.terminate_prefix_keys
            && level == key.len()
            && next_key.len() > key.len()
            && next_key.starts_with(key)
        {
            self.insert_key_byte(self.terminator, level, true, true);
            level += 1;
        }

        self.record_position(level - 1, position);
    }

    fn insert_key_byte(&mut self, c: u8, level: usize, is_start_of_node: bool, is_term: bool) {
        self.sparse.insert_key_byte(c, level, is_start_of_node, is_term);
        if self.positions.len() < self.sparse.tree_height() {
            self.positions.push(Vec::new());
        }
    }

    fn record_position(&mut self, level: usize, key_index: usize) {
        let slot = self.sparse.num_items(level) - 1;
        self.positions[level].push(KeyPosition {
            level,
            slot,
            key_index,
        });
        self.prev_key_depth = level + 1;
    }
}

/// Re-encode levels `0..cutoff` of `sparse` as dense bitmaps
fn build_dense(sparse: &SparseLevels, cutoff: usize, terminator: u8) -> DenseLevels {
    let mut dense = DenseLevels::new();
    for level in 0..cutoff {
        dense.init_level(sparse.node_counts()[level]);

        let mut node = 0;
        for pos in 0..sparse.num_items(level) {
            let opens_node = sparse.is_start_of_node(level, pos);
            if opens_node && pos > 0 {
                node += 1;
            }
            if (opens_node || pos == 0) && sparse.is_terminator(level, pos, terminator) {
                dense.set_prefix_key(level, node);
                continue;
            }
            dense.set_label(level, node, sparse.label(level, pos), sparse.has_child(level, pos));
        }
    }
    dense
}

fn partition_positions(
    positions: Vec<Vec<KeyPosition>>,
    cutoff: usize,
) -> (Vec<KeyPosition>, Vec<KeyPosition>) {
    let mut dense = Vec::new();
    let mut sparse = Vec::new();
    for (level, level_positions) in positions.into_iter().enumerate() {
        if level < cutoff {
            dense.extend(level_positions);
        } else {
            sparse.extend(level_positions);
        }
    }
    (dense, sparse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::succinct::{read_bit, FANOUT};

    const GOLDEN_KEYS: [&str; 7] = ["f", "far", "fast", "s", "top", "toy", "trie"];

    fn bits(words: &[u64], len: usize) -> Vec<u8> {
        (0..len).map(|i| read_bit(words, i) as u8).collect()
    }

    fn sparse_only() -> FstBuilder {
        FstBuilder::new(FstConfig::builder().include_dense(false).build().unwrap())
    }

    #[test]
    fn test_golden_sparse_encoding() {
        let layout = sparse_only().build(&GOLDEN_KEYS).unwrap();

        assert_eq!(layout.tree_height(), 3);
        assert_eq!(layout.sparse_start_level(), 0);
        assert_eq!(
            layout.labels(),
            &[b"fst".to_vec(), b"aor".to_vec(), b"rspy".to_vec()]
        );
        assert_eq!(bits(&layout.child_indicator_bits()[0], 3), vec![1, 0, 1]);
        assert_eq!(bits(&layout.child_indicator_bits()[1], 3), vec![1, 1, 0]);
        assert_eq!(bits(&layout.child_indicator_bits()[2], 4), vec![0, 0, 0, 0]);
        assert_eq!(bits(&layout.louds_bits()[0], 3), vec![1, 0, 0]);
        assert_eq!(bits(&layout.louds_bits()[1], 3), vec![1, 1, 0]);
        assert_eq!(bits(&layout.louds_bits()[2], 4), vec![1, 0, 1, 0]);
        assert_eq!(layout.node_counts(), &[1, 2, 2]);
        assert_eq!(layout.sparse_item_counts(), vec![3, 3, 4]);

        assert!(layout.dense_key_indices().is_empty());
        assert_eq!(layout.sparse_key_indices(), vec![0, 3, 6, 1, 2, 4, 5]);
        assert_eq!(
            layout.position_at(1, 2),
            Some(&KeyPosition { level: 1, slot: 2, key_index: 6 })
        );
        assert_eq!(layout.position_at(1, 0), None);
    }

    #[test]
    fn test_golden_dense_encoding() {
        let layout = FstBuilder::default().build(&GOLDEN_KEYS).unwrap();

        assert_eq!(layout.sparse_start_level(), 1);
        assert_eq!(layout.dense_bitmap_bit_counts(), vec![FANOUT]);
        assert_eq!(layout.prefix_key_bit_counts(), vec![1]);

        let set_labels: Vec<usize> = (0..FANOUT)
            .filter(|&i| read_bit(&layout.bitmap_labels()[0], i))
            .collect();
        assert_eq!(set_labels, vec![b'f' as usize, b's' as usize, b't' as usize]);
        let with_child: Vec<usize> = (0..FANOUT)
            .filter(|&i| read_bit(&layout.bitmap_child_indicator_bits()[0], i))
            .collect();
        assert_eq!(with_child, vec![b'f' as usize, b't' as usize]);
        assert!(!layout.dense().is_prefix_key(0, 0));

        assert_eq!(layout.dense_key_indices(), vec![0, 3]);
        assert_eq!(layout.sparse_key_indices(), vec![6, 1, 2, 4, 5]);
        assert_eq!(layout.dense_mem(), 512);
        assert_eq!(layout.sparse_mem(), 10);
    }

    #[test]
    fn test_zero_ratio_makes_every_level_dense() {
        let config = FstConfig::builder().sparse_dense_ratio(0).build().unwrap();
        let layout = FstBuilder::new(config).build(&GOLDEN_KEYS).unwrap();

        assert_eq!(layout.sparse_start_level(), 3);
        assert_eq!(layout.dense().num_levels(), 3);
        assert!(layout.sparse_positions().is_empty());
        assert_eq!(layout.dense_key_indices(), vec![0, 3, 6, 1, 2, 4, 5]);
        // Node 1 of level 2 is the "to" node holding 'p' and 'y'.
        assert!(layout.dense().has_label(2, 1, b'p'));
        assert!(layout.dense().has_label(2, 1, b'y'));
        assert!(!layout.dense().has_child(2, 1, b'y'));
    }

    #[test]
    fn test_duplicates_collapse() {
        let layout = sparse_only().build(&["a", "a", "b"]).unwrap();
        assert_eq!(layout.sparse_key_indices(), vec![0, 2]);
        assert_eq!(layout.num_keys(), 3);
        assert_eq!(layout.num_distinct_keys(), 2);
        assert_eq!(layout.labels(), &[b"ab".to_vec()]);
    }

    #[test]
    fn test_single_key() {
        let layout = FstBuilder::default().build(&["x"]).unwrap();
        assert_eq!(layout.tree_height(), 1);
        assert_eq!(layout.labels(), &[b"x".to_vec()]);
        assert_eq!(layout.node_counts(), &[1]);
        let mut all = layout.dense_key_indices();
        all.extend(layout.sparse_key_indices());
        assert_eq!(all, vec![0]);
    }

    #[test]
    fn test_long_shared_prefix_builds_single_child_chain() {
        let layout = sparse_only().build(&["abcdx", "abcdy"]).unwrap();
        assert_eq!(layout.tree_height(), 5);
        assert_eq!(layout.node_counts(), &[1, 1, 1, 1, 1]);
        assert_eq!(layout.labels()[4], b"xy".to_vec());
        assert_eq!(bits(&layout.louds_bits()[4], 2), vec![1, 0]);
        assert_eq!(layout.sparse_key_indices(), vec![0, 1]);
        assert!(layout.sparse_positions().iter().all(|p| p.level == 4));
    }

    #[test]
    fn test_prefix_key_shares_slot_without_terminator() {
        let layout = sparse_only().build(&["ab", "abc"]).unwrap();
        assert_eq!(layout.labels(), &[b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert_eq!(
            layout.sparse_positions(),
            &[
                KeyPosition { level: 1, slot: 0, key_index: 0 },
                KeyPosition { level: 2, slot: 0, key_index: 1 },
            ]
        );
        assert!(layout.sparse().has_child(1, 0));
    }

    #[test]
    fn test_prefix_key_before_sibling_branch() {
        // "b" never reaches level 1, so the 'b' left there by "ab" is not
        // on the path of "bb".
        let layout = sparse_only().build(&["aa", "ab", "b", "bb"]).unwrap();
        assert_eq!(layout.labels(), &[b"ab".to_vec(), b"abb".to_vec()]);
        assert_eq!(bits(&layout.child_indicator_bits()[0], 2), vec![1, 1]);
        assert_eq!(bits(&layout.child_indicator_bits()[1], 3), vec![0, 0, 0]);
        assert_eq!(bits(&layout.louds_bits()[1], 3), vec![1, 0, 1]);
        assert_eq!(layout.node_counts(), &[1, 2]);
        assert_eq!(layout.sparse_key_indices(), vec![2, 0, 1, 3]);
        assert_eq!(
            layout.position_at(1, 2),
            Some(&KeyPosition { level: 1, slot: 2, key_index: 3 })
        );
    }

    #[test]
    fn test_prefix_key_before_longer_sibling_branch() {
        let layout = sparse_only().build(&["aa", "ab", "b", "bbc"]).unwrap();
        assert_eq!(layout.labels(), &[b"ab".to_vec(), b"abb".to_vec()]);
        assert_eq!(bits(&layout.child_indicator_bits()[1], 3), vec![0, 0, 0]);
        assert_eq!(bits(&layout.louds_bits()[1], 3), vec![1, 0, 1]);
        assert_eq!(layout.sparse_key_indices(), vec![2, 0, 1, 3]);

        let layout = FstBuilder::default().build(&["aa", "ab", "b", "bbc"]).unwrap();
        assert_eq!(layout.sparse_start_level(), 1);
        assert!(layout.dense().has_child(0, 0, b'a'));
        assert!(layout.dense().has_child(0, 0, b'b'));
        assert_eq!(layout.dense_key_indices(), vec![2]);
        assert_eq!(layout.sparse_key_indices(), vec![0, 1, 3]);
    }

    #[test]
    fn test_sorted_prefix_keys_build_without_verification() {
        let config = FstConfig::builder().verify_sorted(false).build().unwrap();
        let layout = FstBuilder::new(config)
            .build(&["ab", "abc", "abd", "b", "bcd", "bd"])
            .unwrap();
        assert_eq!(
            layout.labels(),
            &[b"ab".to_vec(), b"bcd".to_vec(), b"cd".to_vec()]
        );
        assert_eq!(bits(&layout.louds_bits()[1], 3), vec![1, 1, 0]);
        assert_eq!(bits(&layout.child_indicator_bits()[1], 3), vec![1, 0, 0]);
        assert_eq!(layout.node_counts(), &[1, 2, 1]);
        assert_eq!(layout.num_distinct_keys(), 6);
    }

    #[test]
    fn test_terminator_marks_prefix_keys() {
        let config = FstConfig::builder()
            .terminate_prefix_keys(true)
            .sparse_dense_ratio(0)
            .build()
            .unwrap();
        let layout = FstBuilder::new(config).build(&GOLDEN_KEYS).unwrap();

        // "f" is a prefix of "far": level 1 gains a node [0xFF, 'a'].
        assert_eq!(layout.labels()[1], vec![0xFF, b'a', b'o', b'r']);
        assert_eq!(bits(&layout.louds_bits()[1], 4), vec![1, 0, 1, 0]);
        assert_eq!(bits(&layout.child_indicator_bits()[1], 4), vec![0, 1, 1, 0]);
        assert_eq!(layout.dense_key_indices(), vec![3, 0, 6, 1, 2, 4, 5]);
        assert_eq!(layout.position_at(1, 0).map(|p| p.key_index), Some(0));

        assert!(layout.dense().is_prefix_key(1, 0));
        assert!(!layout.dense().has_label(1, 0, 0xFF));
        assert!(layout.dense().has_label(1, 0, b'a'));
        assert!(!layout.dense().is_prefix_key(1, 1));
    }

    #[test]
    fn test_custom_terminator() {
        let config = FstConfig::builder()
            .terminate_prefix_keys(true)
            .terminator(b'$')
            .include_dense(false)
            .build()
            .unwrap();
        let layout = FstBuilder::new(config).build(&["a", "ab"]).unwrap();
        assert_eq!(layout.labels()[1], b"$b".to_vec());
        assert!(layout.sparse().is_terminator(1, 0, b'$'));
        assert_eq!(layout.sparse_key_indices(), vec![0, 1]);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let builder = FstBuilder::default();
        let empty: [&str; 0] = [];
        assert!(matches!(builder.build(&empty), Err(FstError::EmptyKeySet)));
        assert!(matches!(
            builder.build(&["a", "c", "b"]),
            Err(FstError::UnsortedKeys { index: 1 })
        ));
        assert!(matches!(
            builder.build(&["", "a"]),
            Err(FstError::EmptyKey { index: 0 })
        ));
    }

    #[test]
    fn test_unverified_prefix_violation_is_still_rejected() {
        let config = FstConfig::builder().verify_sorted(false).build().unwrap();
        let builder = FstBuilder::new(config);
        assert!(matches!(
            builder.build(&["far", "f"]),
            Err(FstError::UnsortedKeys { index: 0 })
        ));
    }

    #[test]
    fn test_node_counts_match_louds_bits() {
        let keys = [
            "a", "ab", "abc", "abd", "b", "ba", "bb", "bba", "c", "cab", "cac", "cb",
        ];
        let config = FstConfig::memory_preset();
        let layout = FstBuilder::new(config).build(&keys).unwrap();
        for level in 0..layout.tree_height() {
            let n = layout.sparse_item_counts()[level];
            let ones = bits(&layout.louds_bits()[level], n)
                .iter()
                .filter(|&&b| b == 1)
                .count();
            assert_eq!(ones, layout.node_counts()[level], "level {}", level);
        }
        assert_eq!(layout.num_distinct_keys(), keys.len());
    }
}
