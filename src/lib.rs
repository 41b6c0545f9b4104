//! # louds-fst: Fast Succinct Trie construction
//!
//! This crate builds the succinct encoding of an ordered key set: a trie
//! stored level by level as bit and byte vectors, navigated with rank and
//! select instead of pointers.
//!
//! ## Key Features
//!
//! - **Single-pass builder**: one forward scan over sorted keys emits the
//!   LOUDS-Sparse vectors, keeping only the bytes needed to tell each key
//!   from its successor
//! - **Dense/sparse split**: a memory cost model picks the level above which
//!   nodes are stored as 256-bit bitmaps
//! - **Sampled select**: position of the i-th set bit from a lookup table of
//!   every k-th one
//! - **Block rank**: set-bit counts from per-block cumulative totals
//! - **Shared bit storage**: rank and select indexes reference the same
//!   [`WordBitVector`] through an `Arc`
//!
//! ## Quick Start
//!
//! ```rust
//! use louds_fst::{AssembledFst, FstBuilder, FstConfig};
//!
//! let keys = ["f", "far", "fast", "s", "top", "toy", "trie"];
//! let config = FstConfig::default();
//!
//! let layout = FstBuilder::new(config.clone()).build(&keys)?;
//! assert_eq!(layout.tree_height(), 3);
//! assert_eq!(layout.sparse_start_level(), 1);
//!
//! let fst = AssembledFst::new(&layout, &config)?;
//! assert!(fst.dense().is_some());
//! assert!(fst.sparse().is_some());
//! # Ok::<(), louds_fst::FstError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod fst;
pub mod succinct;

pub use config::{BuildFlags, Config, FstConfig, FstConfigBuilder};
pub use error::{FstError, Result};
pub use fst::{
    AssembledFst, BuildStats, FstBuilder, FstLayout, KeyPosition, StatisticsProvider,
};
pub use succinct::{BitIndex, RankIndex, SelectIndex, WordBitVector, FANOUT, WORD_BITS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
///
/// Installs nothing; logging goes through the `log` facade to whatever
/// logger the application has set up.
pub fn init() {
    log::debug!("Initializing louds-fst v{}", VERSION);
}
