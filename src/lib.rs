//! Challenge Cache - A bounded, self-expiring in-memory cache
//!
//! Holds short-lived one-time challenge tokens with a fixed capacity, per-entry
//! TTL and a background expiry sweeper.

pub mod cache;
pub mod challenge;
pub mod config;
pub mod console;
pub mod error;
pub mod tasks;

pub use cache::TtlCache;
pub use challenge::ChallengeService;
pub use config::Config;
pub use error::{CacheError, ChallengeError, ConfigError};
