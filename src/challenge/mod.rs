//! Challenge Module
//!
//! One-time challenge tokens (captcha-style) backed by the TTL cache.
//!
//! The issuer refuses new challenges while the cache is full. The verifier
//! reports unknown and expired ids the same way, so callers cannot learn
//! whether an id ever existed.

mod generator;
mod service;

pub use generator::{generate_id, generate_text, CHALLENGE_CHARSET, DEFAULT_CHALLENGE_LENGTH};
pub use service::{Challenge, ChallengeService, IssuedChallenge};
