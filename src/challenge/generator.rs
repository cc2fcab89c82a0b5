//! Challenge Generation
//!
//! Produces challenge ids and the text a user has to read back.

use rand::Rng;

/// Characters used in challenge text. Glyphs that are easy to confuse
/// (`I`, `O`, `0`, `1`) are left out.
pub const CHALLENGE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Default number of characters in a challenge.
pub const DEFAULT_CHALLENGE_LENGTH: usize = 5;

/// Returns `length` random characters from [`CHALLENGE_CHARSET`].
pub fn generate_text(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(CHALLENGE_CHARSET[rng.random_range(0..CHALLENGE_CHARSET.len())]))
        .collect()
}

/// Returns a new challenge id: the current Unix time in milliseconds
/// followed by four random digits.
pub fn generate_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u16 = rand::rng().random_range(1000..=9999);
    format!("{millis}{suffix}")
}
