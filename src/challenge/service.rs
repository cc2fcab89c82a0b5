//! Challenge Service
//!
//! Issues one-time challenges into a [`TtlCache`] and verifies answers
//! against it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::challenge::{generate_id, generate_text};
use crate::config::Config;
use crate::error::{ChallengeError, ConfigError};

/// Attempts at finding an unused challenge id.
const ID_ATTEMPTS: usize = 8;

// == Challenge ==
/// Payload stored in the cache for an outstanding challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Challenge {
    /// Expected answer
    pub text: String,
    /// When the challenge was handed out
    pub issued_at: DateTime<Utc>,
}

/// What the issuer hands back to its caller.
///
/// Rendering `text` for the end user is up to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedChallenge {
    /// Id the end user presents when answering
    pub id: String,
    /// Text to render
    pub text: String,
    /// Seconds until the challenge can no longer be answered
    pub expires_in_secs: u64,
}

// == Challenge Service ==
/// Issuer and verifier of one-time challenges.
///
/// Holds the cache explicitly, so several services (for example one per
/// test) can run side by side without sharing state.
#[derive(Clone)]
pub struct ChallengeService {
    cache: TtlCache<String, Challenge>,
    code_length: usize,
}

impl ChallengeService {
    /// Creates a service on top of an existing cache.
    pub fn new(
        cache: TtlCache<String, Challenge>,
        code_length: usize,
    ) -> Result<Self, ConfigError> {
        if code_length == 0 {
            return Err(ConfigError::EmptyChallenge);
        }
        Ok(Self { cache, code_length })
    }

    /// Creates a service and its cache from configuration.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let cache = TtlCache::new(config.max_entries, config.ttl())?;
        Self::new(cache, config.code_length)
    }

    // == Issue ==
    /// Creates a new challenge and stores it until it expires or is answered.
    ///
    /// # Errors
    /// `ChallengeError::CapacityExceeded` if too many challenges are
    /// outstanding, whether caught by the pre-flight check or by the insert
    /// itself.
    pub async fn issue(&self) -> Result<IssuedChallenge, ChallengeError> {
        if self.cache.is_full().await {
            warn!("Challenge cache full, refusing to issue");
            return Err(ChallengeError::CapacityExceeded);
        }

        let id = self.fresh_id().await;
        let text = generate_text(self.code_length);
        let challenge = Challenge {
            text: text.clone(),
            issued_at: Utc::now(),
        };

        self.cache.add(id.clone(), challenge).await?;
        info!(%id, "Issued challenge");

        Ok(IssuedChallenge {
            id,
            text,
            expires_in_secs: self.cache.ttl().await.as_secs(),
        })
    }

    // == Verify ==
    /// Checks `input` against the challenge stored under `id`.
    ///
    /// The comparison ignores ASCII case. Any attempt that finds the
    /// challenge consumes it, so a wrong answer cannot be retried and a right
    /// answer cannot be replayed.
    ///
    /// # Errors
    /// `ChallengeError::InvalidOrExpired` for unknown, expired or already
    /// used ids; `ChallengeError::Incorrect` for a wrong answer.
    pub async fn verify(&self, id: &str, input: &str) -> Result<(), ChallengeError> {
        let challenge = self.cache.take(id).await.map_err(|err| {
            debug!(%id, error = %err, "Challenge lookup failed");
            ChallengeError::from(err)
        })?;

        if challenge.text.is_empty() {
            return Err(ChallengeError::InvalidOrExpired);
        }

        if !challenge.text.eq_ignore_ascii_case(input) {
            debug!(%id, "Incorrect challenge answer");
            return Err(ChallengeError::Incorrect);
        }

        info!(%id, "Challenge verified");
        Ok(())
    }

    /// Generates an id not currently held by the cache.
    ///
    /// Two ids only collide when issued in the same millisecond with the same
    /// random suffix; after a few attempts the last candidate is used as is.
    async fn fresh_id(&self) -> String {
        let mut id = generate_id();
        for _ in 0..ID_ATTEMPTS {
            if !self.cache.contains(id.as_str()).await {
                break;
            }
            id = generate_id();
        }
        id
    }

    /// Returns the underlying cache.
    pub fn cache(&self) -> &TtlCache<String, Challenge> {
        &self.cache
    }

    /// Stops the cache's sweeper.
    pub async fn shutdown(&self) -> bool {
        self.cache.shutdown().await
    }
}
