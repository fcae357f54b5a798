//! Request token derivation.
//!
//! Every signed request carries a `req_token` built by interleaving two
//! SHA-256 hex digests under a fixed selection pattern.

use sha2::{Digest, Sha256};

/// Hex length of a SHA-256 digest (32 bytes, two characters each).
const DIGEST_HEX_LEN: usize = 64;

/// Selects, per position, the first digest (`'0'`) or the second (`'1'`).
const HASHING_PATTERN: &[u8] = b"0001110111101110001111010101111011010001001110011000110001000110";

const _: () = assert!(HASHING_PATTERN.len() == DIGEST_HEX_LEN);
const _: () = {
    let mut index = 0;
    while index < HASHING_PATTERN.len() {
        assert!(HASHING_PATTERN[index] == b'0' || HASHING_PATTERN[index] == b'1');
        index += 1;
    }
};

/// Derive the `req_token` for a request.
///
/// `s1 = sha256(secret ++ session_token)` and `s2 = sha256(timestamp ++ secret)`
/// are rendered as lowercase hex; character `i` of the result is `s1[i]` where
/// the pattern holds `'0'` and `s2[i]` otherwise.
#[must_use]
pub fn generate_request_token(secret: &str, session_token: &str, timestamp: &str) -> String {
    let first = sha256_hex(&[secret, session_token]);
    let second = sha256_hex(&[timestamp, secret]);

    HASHING_PATTERN
        .iter()
        .zip(first.chars().zip(second.chars()))
        .map(|(selector, (from_first, from_second))| {
            if *selector == b'0' {
                from_first
            } else {
                from_second
            }
        })
        .collect()
}

fn sha256_hex(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
