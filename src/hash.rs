//! BLAKE3 integrity hashing for downloaded package payloads
//!
//! Integrity strings use the `algorithm-hexdigest` shape recorded in the
//! lockfile, e.g. `blake3-af13...`. The hash is always computed over the raw
//! downloaded bytes, never over extracted or converted content.

/// Algorithm prefix for integrity strings
pub const HASH_ALGORITHM: &str = "blake3";

/// Compute the integrity string for a raw payload
pub fn integrity(bytes: &[u8]) -> String {
    format!("{}-{}", HASH_ALGORITHM, blake3::hash(bytes).to_hex())
}

/// Verify an integrity string against a payload, tolerating a missing prefix
pub fn verify(expected: &str, bytes: &[u8]) -> bool {
    let actual = integrity(bytes);
    let normalize = |h: &str| {
        if h.contains('-') {
            h.to_string()
        } else {
            format!("{HASH_ALGORITHM}-{h}")
        }
    };
    normalize(expected) == actual
}
