//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::challenge::DEFAULT_CHALLENGE_LENGTH;

/// Challenge cache configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. Zero values are accepted here and rejected when the cache is
/// built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of outstanding challenges
    pub max_entries: usize,
    /// Lifetime of a challenge in seconds
    pub ttl_secs: u64,
    /// Number of characters in a challenge
    pub code_length: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum outstanding challenges (default: 300)
    /// - `ENTRY_TTL` - Challenge lifetime in seconds (default: 300)
    /// - `CHALLENGE_LENGTH` - Characters per challenge (default: 5)
    ///
    /// Missing or unparsable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            ttl_secs: env_or("ENTRY_TTL", defaults.ttl_secs),
            code_length: env_or("CHALLENGE_LENGTH", defaults.code_length),
        }
    }

    /// Returns the challenge lifetime as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 300,
            ttl_secs: 300,
            code_length: DEFAULT_CHALLENGE_LENGTH,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
