//! BLAKE3-based hashing helpers for dedup keys, point ids, and user pseudonyms.

/// Computes a 64-bit id from arbitrary bytes, truncated from a BLAKE3 hash.
///
/// Used for vector point ids and ingestion dedup keys. Truncation to 64 bits
/// is fine here: a collision costs a skipped document or an overwritten point,
/// never data corruption.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes = hash.as_bytes();
    u64::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}

/// Content hash for ingestion deduplication: whitespace-normalized, lowercased.
pub fn content_hash(text: &str) -> u64 {
    let normalized: String = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    hash_to_u64(normalized.as_bytes())
}

/// Pseudonymous user hash: first 16 hex characters of a BLAKE3 digest.
///
/// Recorded in the audit trail instead of any direct user identifier.
pub fn user_hash(input: &str) -> String {
    blake3::hash(input.as_bytes()).to_hex()[..16].to_string()
}
