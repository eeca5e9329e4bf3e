//! The hash-chained spine.
//!
//! Each spine value summarises the message prefix up to and including its
//! chunk: `s[i] = h(s[i - 1] || m[i]) & v_mask`, starting from
//! [`ROOT_SEED`]. Both integers are fed to the hash as four little-endian
//! bytes each.

use crate::bitpack::mask;
use crate::hash::one_at_a_time;

/// Spine value preceding the first chunk.
pub const ROOT_SEED: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpineChain {
    v_mask: u32,
}

impl SpineChain {
    /// A chain keeping the low `width` bits of every hash.
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self {
            v_mask: mask(width),
        }
    }

    #[must_use]
    pub fn v_mask(&self) -> u32 {
        self.v_mask
    }

    /// Spine value following `prev` when the next chunk is `chunk`.
    #[must_use]
    pub fn next(&self, prev: u32, chunk: u32) -> u32 {
        let mut bytes = [0_u8; 8];
        bytes[..4].copy_from_slice(&prev.to_le_bytes());
        bytes[4..].copy_from_slice(&chunk.to_le_bytes());
        one_at_a_time(&bytes) & self.v_mask
    }

    /// Spine values for every chunk, starting from [`ROOT_SEED`].
    #[must_use]
    pub fn chain(&self, chunks: &[u32]) -> Vec<u32> {
        chunks
            .iter()
            .scan(ROOT_SEED, |spine, &chunk| {
                *spine = self.next(*spine, chunk);
                Some(*spine)
            })
            .collect()
    }
}
