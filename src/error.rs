//! Error types for the challenge cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Outcomes of cache operations that callers are expected to branch on.
///
/// None of these are faults: they are the normal "no" answers of a bounded,
/// expiring map.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// A new key was rejected because the cache holds `max_size` entries
    #[error("Cache full")]
    Full,

    /// The key was present but past its expiry instant
    #[error("Key expired")]
    Expired,

    /// The key was never inserted, or is already gone
    #[error("Key not found")]
    NotFound,
}

// == Config Error Enum ==
/// Invalid construction parameters. Construction aborts with one of these.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_size` must be at least 1
    #[error("Cache capacity must be greater than zero")]
    ZeroCapacity,

    /// `ttl` must be a positive duration
    #[error("Entry TTL must be greater than zero")]
    ZeroTtl,

    /// Challenges need at least one character
    #[error("Challenge length must be greater than zero")]
    EmptyChallenge,
}

// == Challenge Error Enum ==
/// Failures surfaced by the challenge issuer and verifier.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeError {
    /// Too many outstanding challenges; reported like a rate limit
    #[error("Too many requests, try again later")]
    CapacityExceeded,

    /// Unknown or expired challenge id. The two cases are not distinguished.
    #[error("Invalid or expired captcha ID")]
    InvalidOrExpired,

    /// The challenge exists but the answer does not match
    #[error("Incorrect captcha")]
    Incorrect,
}

impl From<CacheError> for ChallengeError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Full => ChallengeError::CapacityExceeded,
            CacheError::Expired | CacheError::NotFound => ChallengeError::InvalidOrExpired,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
