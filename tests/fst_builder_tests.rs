//! Structural tests for the trie builder
//!
//! Every distinct key must be reachable by walking the produced vectors with
//! its own bytes, and the slot the walk ends on must carry that key's index.

use proptest::prelude::*;
use std::collections::HashMap;

use louds_fst::fst::cutoff::{dense_mem, sparse_mem};
use louds_fst::{FstBuilder, FstConfig, FstError, FstLayout};

const GOLDEN_KEYS: [&str; 7] = ["f", "far", "fast", "s", "top", "toy", "trie"];

// =============================================================================
// HELPERS
// =============================================================================

/// First index of every distinct key in a sorted list
fn first_indices(keys: &[Vec<u8>]) -> HashMap<Vec<u8>, usize> {
    let mut first = HashMap::new();
    for (i, key) in keys.iter().enumerate() {
        first.entry(key.clone()).or_insert(i);
    }
    first
}

/// Walk the sparse vectors with `key`, returning the `(level, slot)` the
/// walk ends on. `terminator` is set when prefix keys carry terminator edges.
fn walk(layout: &FstLayout, key: &[u8], terminator: Option<u8>) -> Option<(usize, usize)> {
    let sparse = layout.sparse();
    let dense = layout.dense();
    let mut node_start = 0;

    for level in 0..layout.tree_height() {
        let num_items = sparse.num_items(level);
        let mut node_end = node_start + 1;
        while node_end < num_items && !sparse.is_start_of_node(level, node_end) {
            node_end += 1;
        }
        let node = (0..=node_start)
            .filter(|&s| sparse.is_start_of_node(level, s))
            .count()
            - 1;

        if level == key.len() {
            let t = terminator?;
            let slot = (node_start..node_end).find(|&s| sparse.is_terminator(level, s, t))?;
            if level < layout.sparse_start_level() {
                assert!(dense.is_prefix_key(level, node));
            }
            return Some((level, slot));
        }

        let byte = key[level];
        let slot = (node_start..node_end).find(|&s| {
            sparse.label(level, s) == byte
                && !terminator.map_or(false, |t| sparse.is_terminator(level, s, t))
        })?;
        let has_child = sparse.has_child(level, slot);

        if level < layout.sparse_start_level() {
            assert!(dense.has_label(level, node, byte));
            assert_eq!(dense.has_child(level, node, byte), has_child);
        }

        let exhausted = level + 1 == key.len();
        if !has_child || (exhausted && terminator.is_none()) {
            return Some((level, slot));
        }

        let child_rank = (0..=slot).filter(|&s| sparse.has_child(level, s)).count();
        node_start = (0..sparse.num_items(level + 1))
            .filter(|&s| sparse.is_start_of_node(level + 1, s))
            .nth(child_rank - 1)?;
    }
    None
}

fn check_walks(layout: &FstLayout, keys: &[Vec<u8>], terminator: Option<u8>) {
    let first = first_indices(keys);
    assert_eq!(layout.num_distinct_keys(), first.len());

    for (key, &index) in &first {
        let (level, slot) = walk(layout, key, terminator)
            .unwrap_or_else(|| panic!("walk failed for {:?}", key));
        let position = layout
            .position_at(level, slot)
            .unwrap_or_else(|| panic!("no position at ({}, {}) for {:?}", level, slot, key));
        assert_eq!(position.key_index, index, "key {:?}", key);
    }

    let mut recorded = layout.dense_key_indices();
    recorded.extend(layout.sparse_key_indices());
    recorded.sort_unstable();
    let mut expected: Vec<usize> = first.values().copied().collect();
    expected.sort_unstable();
    assert_eq!(recorded, expected);
}

fn check_level_shape(layout: &FstLayout) {
    let sparse = layout.sparse();
    let height = layout.tree_height();
    for level in 0..height {
        let n = sparse.num_items(level);
        let starts = (0..n).filter(|&s| sparse.is_start_of_node(level, s)).count();
        assert_eq!(starts, layout.node_counts()[level]);
        assert!(sparse.is_start_of_node(level, 0));

        let children = (0..n).filter(|&s| sparse.has_child(level, s)).count();
        if level + 1 < height {
            assert_eq!(children, layout.node_counts()[level + 1]);
        } else {
            assert_eq!(children, 0);
        }
    }
}

/// Sorted keys over a small alphabet so prefixes are shared often
fn sorted_keys() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(b'a'..=b'd', 1..7), 1..80).prop_map(|mut keys| {
        keys.sort();
        keys
    })
}

/// Sorted keys over all byte values, duplicates allowed
fn sorted_binary_keys() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 1..5), 1..60).prop_map(|mut keys| {
        keys.sort();
        keys
    })
}

// =============================================================================
// REFERENCE DATASET
// =============================================================================

#[test]
fn test_golden_walks() {
    let keys: Vec<Vec<u8>> = GOLDEN_KEYS.iter().map(|k| k.as_bytes().to_vec()).collect();

    let sparse_only = FstConfig::builder().include_dense(false).build().unwrap();
    let layout = FstBuilder::new(sparse_only).build(&keys).unwrap();
    check_walks(&layout, &keys, None);

    let layout = FstBuilder::default().build(&keys).unwrap();
    assert_eq!(layout.sparse_start_level(), 1);
    check_walks(&layout, &keys, None);

    let with_terminator = FstConfig::builder().terminate_prefix_keys(true).build().unwrap();
    let layout = FstBuilder::new(with_terminator).build(&keys).unwrap();
    check_walks(&layout, &keys, Some(0xFF));
}

#[test]
fn test_build_is_deterministic() {
    let a = FstBuilder::default().build(&GOLDEN_KEYS).unwrap();
    let b = FstBuilder::default().build(&GOLDEN_KEYS).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_layout_serde_round_trip() {
    let layout = FstBuilder::default().build(&GOLDEN_KEYS).unwrap();
    let json = serde_json::to_string(&layout).unwrap();
    let parsed: FstLayout = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, layout);
}

#[test]
fn test_builder_accepts_owned_and_borrowed_keys() {
    let owned: Vec<String> = GOLDEN_KEYS.iter().map(|s| s.to_string()).collect();
    let bytes: Vec<&[u8]> = GOLDEN_KEYS.iter().map(|s| s.as_bytes()).collect();
    let from_owned = FstBuilder::default().build(&owned).unwrap();
    let from_bytes = FstBuilder::default().build(&bytes).unwrap();
    assert_eq!(from_owned, from_bytes);
}

#[test]
fn test_failed_build_reports_first_violation() {
    let keys = ["a", "b", "b", "a", "c", "b"];
    match FstBuilder::default().build(&keys) {
        Err(FstError::UnsortedKeys { index }) => assert_eq!(index, 2),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_prefix_key_followed_by_sibling_branch() {
    let lists: [&[&str]; 3] = [
        &["aa", "ab", "b", "bb"],
        &["aa", "ab", "b", "bbc"],
        &["ab", "abc", "abd", "b", "bcd", "bd"],
    ];
    let sparse_only = FstConfig::builder().include_dense(false).build().unwrap();

    for list in lists {
        let keys: Vec<Vec<u8>> = list.iter().map(|k| k.as_bytes().to_vec()).collect();
        for config in [sparse_only.clone(), FstConfig::default()] {
            let layout = FstBuilder::new(config).build(&keys).unwrap();
            check_level_shape(&layout);
            check_walks(&layout, &keys, None);
        }
    }
}

#[test]
fn test_wide_root_goes_dense() {
    // Every byte value appears under the root, each with two children.
    let mut keys = Vec::new();
    for b in 0..=255u8 {
        keys.push(vec![b, b'a']);
        keys.push(vec![b, b'b']);
    }
    let layout = FstBuilder::default().build(&keys).unwrap();
    assert_eq!(layout.tree_height(), 2);
    assert_eq!(layout.sparse_start_level(), 1);
    assert!(layout.dense_key_indices().is_empty());
    assert_eq!(layout.sparse_positions().len(), 512);
    check_walks(&layout, &keys, None);
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn property_every_key_walks_to_its_position(keys in sorted_keys(), ratio in 0u32..64) {
        let config = FstConfig::builder().sparse_dense_ratio(ratio).build().unwrap();
        let layout = FstBuilder::new(config).build(&keys).unwrap();
        check_level_shape(&layout);
        check_walks(&layout, &keys, None);
    }

    #[test]
    fn property_terminator_mode_walks(keys in sorted_keys(), include_dense in any::<bool>()) {
        let config = FstConfig::builder()
            .terminate_prefix_keys(true)
            .include_dense(include_dense)
            .sparse_dense_ratio(2)
            .build()
            .unwrap();
        let layout = FstBuilder::new(config).build(&keys).unwrap();
        check_level_shape(&layout);
        check_walks(&layout, &keys, Some(0xFF));
    }

    #[test]
    fn property_binary_keys_without_dense(keys in sorted_binary_keys()) {
        let config = FstConfig::builder().include_dense(false).build().unwrap();
        let layout = FstBuilder::new(config).build(&keys).unwrap();
        prop_assert_eq!(layout.sparse_start_level(), 0);
        prop_assert!(layout.dense_positions().is_empty());
        check_level_shape(&layout);
        check_walks(&layout, &keys, None);
    }

    #[test]
    fn property_cutoff_is_first_failing_level(keys in sorted_keys(), ratio in 0u32..128) {
        let config = FstConfig::builder().sparse_dense_ratio(ratio).build().unwrap();
        let layout = FstBuilder::new(config).build(&keys).unwrap();

        let node_counts = layout.node_counts();
        let item_counts = layout.sparse_item_counts();
        let height = layout.tree_height();

        for level in 0..height {
            prop_assert!(dense_mem(node_counts, level) <= dense_mem(node_counts, level + 1));
            prop_assert!(sparse_mem(&item_counts, level) >= sparse_mem(&item_counts, level + 1));
        }

        let expected = (0..height)
            .find(|&l| dense_mem(node_counts, l) * ratio as u64 >= sparse_mem(&item_counts, l))
            .unwrap_or(height);
        prop_assert_eq!(layout.sparse_start_level(), expected);
        prop_assert_eq!(layout.dense().num_levels(), expected);
    }
}
