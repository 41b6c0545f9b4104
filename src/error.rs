//! Error handling for the louds-fst library
//!
//! Every failure in this crate is a contract violation detected up front:
//! bad input to the builder, a query outside the indexed range, or an invalid
//! configuration. Nothing is partially published when an error is returned.

use thiserror::Error;

/// Main error type for the louds-fst library
#[derive(Error, Debug)]
pub enum FstError {
    /// The key list passed to the builder was empty
    #[error("Empty key set: at least one key is required to build a trie")]
    EmptyKeySet,

    /// A key of length zero, which no trie edge can represent
    #[error("Empty key: key {index} has no bytes")]
    EmptyKey {
        /// Index of the empty key in the input list
        index: usize,
    },

    /// The key list is not sorted in ascending byte order
    #[error("Unsorted keys: key {index} is greater than key {}", .index + 1)]
    UnsortedKeys {
        /// Index of the first key that is greater than its successor
        index: usize,
    },

    /// A select query asked for a rank that does not exist
    #[error("Rank out of range: rank {rank}, valid ranks are 1..={num_ones}")]
    RankOutOfRange {
        /// The requested one-based rank
        rank: usize,
        /// Number of set bits in the indexed sequence
        num_ones: usize,
    },

    /// Select indexing requires the first bit of the sequence to be set
    #[error("First bit unset: select indexing requires the sequence to start with a 1 bit")]
    FirstBitUnset,

    /// Index out of bounds access
    #[error("Out of bounds: index {index}, size {size}")]
    OutOfBounds {
        /// The invalid index
        index: usize,
        /// The valid size/length
        size: usize,
    },

    /// A level range that does not address the per-level arrays
    #[error("Invalid level range: [{start}, {end}) over {levels} levels")]
    InvalidLevelRange {
        /// First level (inclusive)
        start: usize,
        /// Last level (exclusive)
        end: usize,
        /// Number of levels available
        levels: usize,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FstError {
    /// Create an empty key error
    pub fn empty_key(index: usize) -> Self {
        Self::EmptyKey { index }
    }

    /// Create an unsorted keys error
    pub fn unsorted_keys(index: usize) -> Self {
        Self::UnsortedKeys { index }
    }

    /// Create a rank out of range error
    pub fn rank_out_of_range(rank: usize, num_ones: usize) -> Self {
        Self::RankOutOfRange { rank, num_ones }
    }

    /// Create an out of bounds error
    pub fn out_of_bounds(index: usize, size: usize) -> Self {
        Self::OutOfBounds { index, size }
    }

    /// Create an invalid level range error
    pub fn invalid_level_range(start: usize, end: usize, levels: usize) -> Self {
        Self::InvalidLevelRange { start, end, levels }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check if this error reports a violated input or query precondition
    pub fn is_precondition_violation(&self) -> bool {
        match self {
            Self::EmptyKeySet
            | Self::EmptyKey { .. }
            | Self::UnsortedKeys { .. }
            | Self::RankOutOfRange { .. }
            | Self::FirstBitUnset
            | Self::OutOfBounds { .. }
            | Self::InvalidLevelRange { .. } => true,
            Self::Configuration { .. } | Self::Io(_) => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyKeySet | Self::EmptyKey { .. } | Self::UnsortedKeys { .. } => "input",
            Self::RankOutOfRange { .. } | Self::FirstBitUnset => "select",
            Self::OutOfBounds { .. } | Self::InvalidLevelRange { .. } => "bounds",
            Self::Configuration { .. } => "config",
            Self::Io(_) => "io",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, FstError>;

/// Assert that an index is within bounds
#[inline]
pub fn check_bounds(index: usize, size: usize) -> Result<()> {
    if index >= size {
        Err(FstError::out_of_bounds(index, size))
    } else {
        Ok(())
    }
}

/// Assert that a level range `[start, end)` addresses `levels` levels
#[inline]
pub fn check_range(start: usize, end: usize, levels: usize) -> Result<()> {
    if start > end || end > levels {
        return Err(FstError::invalid_level_range(start, end, levels));
    }
    Ok(())
}
