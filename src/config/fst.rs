//! Configuration for trie construction and index assembly.

use super::{parse_env_bool, parse_env_var, Config, ValidationError};
use crate::error::{FstError, Result};
use crate::succinct::WORD_BITS;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::path::Path;

bitflags! {
    /// Build-time switches for [`FstBuilder`](crate::fst::FstBuilder).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct BuildFlags: u32 {
        /// Search for a cutoff level and encode the levels above it densely.
        ///
        /// When cleared the cutoff is 0 and every level is sparse.
        const INCLUDE_DENSE = 0x0001;

        /// Reject key lists that are not in ascending byte order.
        const VERIFY_SORTED = 0x0002;

        /// Emit a terminator edge when a key is a proper prefix of its successor.
        const TERMINATE_PREFIX_KEYS = 0x0004;
    }
}

impl Default for BuildFlags {
    fn default() -> Self {
        Self::INCLUDE_DENSE | Self::VERIFY_SORTED
    }
}

/// Configuration for building and assembling a fast succinct trie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FstConfig {
    /// Build switches
    pub flags: BuildFlags,

    /// Cost ratio in `dense_mem(L) * ratio < sparse_mem(L)`.
    ///
    /// Larger values move the cutoff toward the root.
    pub sparse_dense_ratio: u32,

    /// Label reserved for prefix-key terminator edges
    pub terminator: u8,

    /// Sampling interval of the select lookup table
    pub select_sample_interval: usize,

    /// Basic block size in bits of the rank lookup table
    pub rank_block_size: usize,
}

impl Default for FstConfig {
    fn default() -> Self {
        Self {
            flags: BuildFlags::default(),
            sparse_dense_ratio: 16,
            terminator: 0xFF,
            select_sample_interval: 64,
            rank_block_size: 512,
        }
    }
}

impl Config for FstConfig {
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.select_sample_interval == 0 {
            errors.push(
                ValidationError::new(
                    "select_sample_interval",
                    &self.select_sample_interval.to_string(),
                    "select sample interval must be greater than zero",
                )
                .with_suggestion("typical values: 64-512"),
            );
        }

        if self.rank_block_size == 0 || self.rank_block_size % WORD_BITS != 0 {
            errors.push(
                ValidationError::new(
                    "rank_block_size",
                    &self.rank_block_size.to_string(),
                    "rank block size must be a non-zero multiple of the word width",
                )
                .with_suggestion("64, 256, 512 or 1024"),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            Err(FstError::configuration(format!(
                "Configuration validation failed: {}",
                error_messages.join("; ")
            )))
        }
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();

        let mut flags = config.flags;
        flags.set(
            BuildFlags::INCLUDE_DENSE,
            parse_env_bool(
                &format!("{}INCLUDE_DENSE", prefix),
                flags.contains(BuildFlags::INCLUDE_DENSE),
            ),
        );
        flags.set(
            BuildFlags::VERIFY_SORTED,
            parse_env_bool(
                &format!("{}VERIFY_SORTED", prefix),
                flags.contains(BuildFlags::VERIFY_SORTED),
            ),
        );
        flags.set(
            BuildFlags::TERMINATE_PREFIX_KEYS,
            parse_env_bool(
                &format!("{}TERMINATE_PREFIX_KEYS", prefix),
                flags.contains(BuildFlags::TERMINATE_PREFIX_KEYS),
            ),
        );
        config.flags = flags;

        config.sparse_dense_ratio = parse_env_var(
            &format!("{}SPARSE_DENSE_RATIO", prefix),
            config.sparse_dense_ratio,
        );
        config.terminator = parse_env_var(&format!("{}TERMINATOR", prefix), config.terminator);
        config.select_sample_interval = parse_env_var(
            &format!("{}SELECT_SAMPLE_INTERVAL", prefix),
            config.select_sample_interval,
        );
        config.rank_block_size =
            parse_env_var(&format!("{}RANK_BLOCK_SIZE", prefix), config.rank_block_size);

        config.validate()?;
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self {
            sparse_dense_ratio: 4,
            select_sample_interval: 32,
            rank_block_size: 256,
            ..Self::default()
        }
    }

    fn memory_preset() -> Self {
        Self {
            sparse_dense_ratio: 64,
            select_sample_interval: 512,
            rank_block_size: 1024,
            ..Self::default()
        }
    }

    fn realtime_preset() -> Self {
        Self {
            sparse_dense_ratio: 8,
            select_sample_interval: 64,
            rank_block_size: 64,
            ..Self::default()
        }
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)
            .map_err(|e| FstError::configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, serialized)?;
        Ok(())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| FstError::configuration(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }
}

impl FstConfig {
    /// Create a new configuration builder.
    pub fn builder() -> FstConfigBuilder {
        FstConfigBuilder::new()
    }

    /// Whether the cutoff search and dense pass run
    #[inline]
    pub fn include_dense(&self) -> bool {
        self.flags.contains(BuildFlags::INCLUDE_DENSE)
    }

    /// Whether key order is verified before building
    #[inline]
    pub fn verify_sorted(&self) -> bool {
        self.flags.contains(BuildFlags::VERIFY_SORTED)
    }

    /// Whether prefix keys receive terminator edges
    #[inline]
    pub fn terminate_prefix_keys(&self) -> bool {
        self.flags.contains(BuildFlags::TERMINATE_PREFIX_KEYS)
    }
}

/// Builder for [`FstConfig`].
#[derive(Debug, Clone)]
pub struct FstConfigBuilder {
    config: FstConfig,
}

impl FstConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: FstConfig::default(),
        }
    }

    /// Replace all build flags.
    pub fn flags(mut self, flags: BuildFlags) -> Self {
        self.config.flags = flags;
        self
    }

    /// Enable or disable the dense encoding.
    pub fn include_dense(mut self, enable: bool) -> Self {
        self.config.flags.set(BuildFlags::INCLUDE_DENSE, enable);
        self
    }

    /// Enable or disable sort verification.
    pub fn verify_sorted(mut self, enable: bool) -> Self {
        self.config.flags.set(BuildFlags::VERIFY_SORTED, enable);
        self
    }

    /// Enable or disable terminator edges for prefix keys.
    pub fn terminate_prefix_keys(mut self, enable: bool) -> Self {
        self.config.flags.set(BuildFlags::TERMINATE_PREFIX_KEYS, enable);
        self
    }

    /// Set the dense/sparse cost ratio.
    pub fn sparse_dense_ratio(mut self, ratio: u32) -> Self {
        self.config.sparse_dense_ratio = ratio;
        self
    }

    /// Set the terminator label.
    pub fn terminator(mut self, label: u8) -> Self {
        self.config.terminator = label;
        self
    }

    /// Set the select sampling interval.
    pub fn select_sample_interval(mut self, interval: usize) -> Self {
        self.config.select_sample_interval = interval;
        self
    }

    /// Set the rank basic block size in bits.
    pub fn rank_block_size(mut self, size: usize) -> Self {
        self.config.rank_block_size = size;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<FstConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for FstConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
