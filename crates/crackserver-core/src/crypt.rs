//! Traditional DES-based Unix `crypt(3)` hashing.
//!
//! Every call builds its own hashing context inside [`pwhash`], so [`hash`] is
//! safe to call from any number of sessions and crack workers at once.

use crate::{Error, Result};
use pwhash::unix;

/// Number of significant salt characters.
pub const SALT_LEN: usize = 2;

/// Length of a traditional crypt hash (2 salt characters + 11 encoded).
pub const HASH_LEN: usize = 13;

/// Longest plaintext word the algorithm takes into account.
pub const MAX_WORD_LEN: usize = 8;

/// Returns `true` if `c` may appear in a salt: `[A-Za-z0-9./]`.
pub const fn is_salt_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '/'
}

/// Returns the salt embedded in the first two characters of `hash`.
pub fn salt_of(hash: &str) -> Option<&str> {
    hash.get(..SALT_LEN)
}

/// Hashes `word` with the first two characters of `salt`.
///
/// # Errors
///
/// Returns [`Error::Crypt`] if the salt is shorter than two characters or the
/// backend rejects the input.
pub fn hash(word: &str, salt: &str) -> Result<String> {
    let salt = salt_of(salt).ok_or_else(|| Error::Crypt {
        reason: format!("salt {salt:?} is shorter than {SALT_LEN} characters"),
    })?;
    // `unix::crypt` picks DES from the shape of a full traditional hash.
    let setting = format!("{salt:.<width$}", width = HASH_LEN);
    unix::crypt(word, &setting).map_err(|e| Error::Crypt {
        reason: e.to_string(),
    })
}
