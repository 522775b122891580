//! Cryptographically secure login nonce generation.
//!
//! Nonces bind a login attempt's redirect to its callback. They must be
//! unpredictable, URL-safe, and never repeat within a process lifetime
//! with any meaningful probability.

use base64::Engine;
use rand::Rng;

/// Default entropy in bytes. 32 bytes is 256 bits, well past the point
/// where collision or guessing is a concern.
const DEFAULT_BYTES: usize = 32;

/// Generates an opaque login nonce with the default entropy.
///
/// The result is base64url without padding: 43 characters drawn from
/// `[A-Za-z0-9_-]`, safe to place in a query string unescaped.
#[must_use]
pub fn generate() -> String {
    generate_len(DEFAULT_BYTES)
}

/// Generates a nonce from `byte_len` random bytes.
///
/// The encoded output is ~4/3 the byte length.
#[must_use]
pub fn generate_len(byte_len: usize) -> String {
    let mut rng = rand::rng();
    let mut bytes = vec![0u8; byte_len];
    rng.fill(&mut bytes[..]);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_nonce_encodes_32_bytes() {
        // 32 bytes -> ceil(32 * 4 / 3) = 43 chars without padding
        assert_eq!(generate().len(), 43);
    }

    #[test]
    fn nonce_is_url_safe() {
        let nonce = generate();
        assert!(
            nonce
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn nonces_do_not_repeat() {
        let nonces: HashSet<String> = (0..1000).map(|_| generate()).collect();
        assert_eq!(nonces.len(), 1000);
    }

    #[test]
    fn custom_length_scales_output() {
        assert_eq!(generate_len(16).len(), 22);
        assert_eq!(generate_len(48).len(), 64);
    }
}
