//! Fast Succinct Trie construction
//!
//! A trie over sorted byte-string keys is encoded level by level in one of
//! two layouts:
//!
//! - **LOUDS-Dense** for the levels near the root: every node owns a
//!   256-bit label bitmap, a 256-bit child bitmap and one prefix-key bit.
//! - **LOUDS-Sparse** for the deeper levels: every edge stores its byte
//!   label plus a child-indicator bit and a node-start bit.
//!
//! [`FstBuilder`] produces both from a single scan of the keys and picks the
//! boundary between them with a memory cost model. [`AssembledFst`] layers
//! the rank/select indexes on top of the result.

pub mod assemble;
pub mod builder;
pub mod cutoff;
pub mod layout;
pub mod levels;
pub mod stats;

pub use assemble::{AssembledFst, DenseRegion, SparseRegion};
pub use builder::FstBuilder;
pub use layout::{FstLayout, KeyPosition};
pub use levels::{DenseLevels, SparseLevels};
pub use stats::{BuildStats, StatisticsProvider};
