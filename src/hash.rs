//! Bob Jenkins' one-at-a-time hash.
//!
//! This is the mixing function behind the spine chain. It has no key and no
//! cryptographic strength; it only has to be deterministic and spread a
//! single changed input bit over the whole output.

/// Hashes `bytes` to 32 bits.
///
/// ```
/// assert_eq!(spinal::hash::one_at_a_time(b"a"), 0xca2e_9442);
/// ```
#[must_use]
pub fn one_at_a_time(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0;
    for &byte in bytes {
        hash = hash.wrapping_add(u32::from(byte));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash.wrapping_add(hash << 15)
}
