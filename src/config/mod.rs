//! Configuration APIs for louds-fst
//!
//! Construction of a trie is tuned by a handful of parameters: whether the
//! dense encoding is attempted at all, the dense/sparse cost ratio used to
//! pick the cutoff level, the terminator label, and the sampling rates of
//! the rank/select indexes built on top of the output.
//!
//! # Configuration Traits
//!
//! The [`Config`] trait provides validation, environment initialization,
//! presets and JSON file persistence for every configuration type.
//!
//! # Builder Pattern
//!
//! ```rust
//! use louds_fst::config::FstConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FstConfig::builder()
//!     .sparse_dense_ratio(32)
//!     .terminate_prefix_keys(true)
//!     .select_sample_interval(128)
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Initialization
//!
//! ```rust
//! use louds_fst::config::{Config, FstConfig};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads LOUDS_FST_SPARSE_DENSE_RATIO, LOUDS_FST_INCLUDE_DENSE, ...
//! let config = FstConfig::from_env()?;
//!
//! // Same variables under a custom prefix
//! let config = FstConfig::from_env_with_prefix("MYAPP_")?;
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use std::env;
use std::fmt;
use std::path::Path;

pub mod fst;


pub use fst::{BuildFlags, FstConfig, FstConfigBuilder};

/// Default prefix for environment variables
pub const ENV_PREFIX: &str = "LOUDS_FST_";

/// Common configuration trait providing validation, environment initialization,
/// and preset management functionality.
pub trait Config: Clone + fmt::Debug {
    /// Validate the configuration for correctness and consistency.
    fn validate(&self) -> Result<()>;

    /// Initialize configuration from environment variables with the
    /// [`ENV_PREFIX`] prefix.
    ///
    /// Unset or unparsable variables keep their default values.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Initialize configuration from environment variables with a custom prefix.
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Configuration favoring query speed over space.
    fn performance_preset() -> Self;

    /// Configuration favoring small output over query speed.
    fn memory_preset() -> Self;

    /// Configuration favoring predictable per-query latency.
    fn realtime_preset() -> Self;

    /// Balanced configuration, the same as the default.
    fn balanced_preset() -> Self
    where
        Self: Default,
    {
        Self::default()
    }

    /// Save configuration to a JSON file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Load and validate configuration from a JSON file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

/// Configuration validation error details.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// The invalid value
    pub value: String,
    /// Description of why the value is invalid
    pub reason: String,
    /// Suggested valid values or ranges
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: &str, value: &str, reason: &str) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
            suggestion: None,
        }
    }

    /// Add a suggestion for valid values.
    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid configuration for field '{}': value '{}' is invalid ({})",
            self.field, self.value, self.reason
        )?;

        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". Suggested values: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Parse an environment variable, falling back to `default` when it is
/// unset or does not parse.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Parse a boolean environment variable.
///
/// Accepts "true", "1", "yes", "on" (case-insensitive) as true,
/// everything else as false.
pub fn parse_env_bool(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .map(|s| {
            let s = s.trim().to_lowercase();
            matches!(s.as_str(), "true" | "1" | "yes" | "on")
        })
        .unwrap_or(default)
}
