//! Deterministic pseudorandom generation.
//!
//! Every symbol of the code is drawn from a [`SymbolRng`] seeded with a spine
//! value. The encoder and the decoder construct these generators
//! independently, so the output must be a fixed function of the seed:
//! xoshiro256** seeded with the SHA-256 digest of the big-endian seed bytes,
//! reduced to the symbol range with Lemire's unbiased multiply-and-reject
//! method (see [`Xoshiro256::next_below`]).

use bitcoin_hashes::Hash;
use rand_xoshiro::rand_core::RngCore;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone)]
pub struct Xoshiro256 {
    inner: Xoshiro256StarStar,
}

impl From<Xoshiro256StarStar> for Xoshiro256 {
    fn from(from: Xoshiro256StarStar) -> Self {
        Self { inner: from }
    }
}

impl From<&[u8]> for Xoshiro256 {
    fn from(from: &[u8]) -> Self {
        let hash = bitcoin_hashes::sha256::Hash::hash(from);
        Self::from(hash.to_byte_array())
    }
}

impl From<&str> for Xoshiro256 {
    fn from(value: &str) -> Self {
        Self::from(value.as_bytes())
    }
}

impl From<u32> for Xoshiro256 {
    fn from(seed: u32) -> Self {
        Self::from(&seed.to_be_bytes()[..])
    }
}

impl From<[u8; 32]> for Xoshiro256 {
    fn from(value: [u8; 32]) -> Self {
        // The digest is read as four big-endian words, the generator state
        // is loaded little-endian.
        let mut s = [0_u8; 32];
        for (word, out) in value.chunks_exact(8).zip(s.chunks_exact_mut(8)) {
            let mut bytes = [0_u8; 8];
            bytes.copy_from_slice(word);
            out.copy_from_slice(&u64::from_be_bytes(bytes).to_le_bytes());
        }
        Xoshiro256StarStar::from_seed(s).into()
    }
}

impl Xoshiro256 {
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Draws a value uniformly from `[0, bound)`.
    ///
    /// Takes the high word of `next() * bound`; draws whose low word falls
    /// below `2^64 mod bound` are rejected, which removes the bias of a plain
    /// modulo reduction. When `bound` is a power of two nothing is ever
    /// rejected and the result is the top `log2(bound)` bits of the draw.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is zero.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_below(&mut self, bound: u64) -> u64 {
        assert!(bound > 0, "empty range");
        let mut m = u128::from(self.next()) * u128::from(bound);
        if (m as u64) < bound {
            let threshold = bound.wrapping_neg() % bound;
            while (m as u64) < threshold {
                m = u128::from(self.next()) * u128::from(bound);
            }
        }
        (m >> 64) as u64
    }
}

/// Bounded generator for the symbols of one spine value.
///
/// Two generators built from the same `(seed, width)` produce the same
/// sequence.
#[derive(Debug, Clone)]
pub struct SymbolRng {
    xoshiro: Xoshiro256,
    scope: u32,
}

impl SymbolRng {
    #[must_use]
    pub fn new(seed: u32, width: u32) -> Self {
        Self {
            xoshiro: Xoshiro256::from(seed),
            scope: scope(width),
        }
    }

    /// Exclusive upper bound of the generated values.
    #[must_use]
    pub fn scope(&self) -> u32 {
        self.scope
    }

    #[allow(clippy::should_implement_trait)]
    #[allow(clippy::cast_possible_truncation)]
    pub fn next(&mut self) -> u32 {
        self.xoshiro.next_below(u64::from(self.scope)) as u32
    }
}

impl Iterator for SymbolRng {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        Some(SymbolRng::next(self))
    }
}

/// `2^width` for widths below 32, `i32::MAX` otherwise.
#[must_use]
pub fn scope(width: u32) -> u32 {
    if width >= 32 {
        i32::MAX.unsigned_abs()
    } else {
        1 << width
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_below_vectors() {
        let mut rng = Xoshiro256::from("Wolf");
        let drawn: Vec<u64> = (0..20).map(|_| rng.next_below(100)).collect();
        assert_eq!(
            drawn,
            [56, 43, 77, 36, 96, 48, 67, 96, 36, 84, 97, 80, 63, 63, 1, 0, 15, 86, 82, 18]
        );
    }

    #[test]
    fn test_make_message() {
        let message = test_utils::make_message("Wolf", 12);
        assert_eq!(hex::encode(&message), "916ec65cf77cadf55cd7f9cd");
        assert_eq!(test_utils::make_message("Wolf", 4), message[..4]);
    }

    #[test]
    fn test_next_below_power_of_two_takes_top_bits() {
        let mut a = Xoshiro256::from("Wolf");
        let mut b = Xoshiro256::from("Wolf");
        for width in 1..32 {
            assert_eq!(a.next_below(1 << width), b.next() >> (64 - width));
        }
    }

    #[test]
    fn test_next_below_in_range() {
        let mut rng = Xoshiro256::from("Wolf");
        for bound in [1, 3, 7, 100, u64::from(i32::MAX.unsigned_abs()), u64::MAX] {
            for _ in 0..200 {
                assert!(rng.next_below(bound) < bound);
            }
        }
    }

    #[test]
    fn test_symbol_rng_vectors() {
        let rng = SymbolRng::new(0, 6);
        let drawn: Vec<u32> = rng.take(16).collect();
        assert_eq!(drawn, SYMBOLS_SEED_0_WIDTH_6);

        let mut rng = SymbolRng::new(0xdead_beef, 31);
        for e in SYMBOLS_SEED_DEADBEEF_WIDTH_31 {
            assert_eq!(rng.next(), e);
        }
    }

    #[test]
    fn test_symbol_rng_deterministic() {
        for seed in [0, 1, 0x8000_0000, u32::MAX] {
            for width in [1, 4, 6, 16, 31, 32] {
                let a: Vec<u32> = SymbolRng::new(seed, width).take(1000).collect();
                let b: Vec<u32> = SymbolRng::new(seed, width).take(1000).collect();
                assert_eq!(a, b);
                assert!(a.iter().all(|&x| x < scope(width)));
            }
        }
    }

    #[test]
    fn test_symbol_rng_seeds_differ() {
        let a: Vec<u32> = SymbolRng::new(1, 16).take(8).collect();
        let b: Vec<u32> = SymbolRng::new(2, 16).take(8).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_scope() {
        assert_eq!(scope(1), 2);
        assert_eq!(scope(6), 64);
        assert_eq!(scope(31), 0x8000_0000);
        assert_eq!(scope(32), 0x7fff_ffff);
        assert_eq!(SymbolRng::new(7, 40).scope(), 0x7fff_ffff);
    }

    const SYMBOLS_SEED_0_WIDTH_6: [u32; 16] = [
        41, 19, 6, 46, 25, 27, 21, 14, 58, 38, 58, 50, 36, 5, 54, 26,
    ];
    const SYMBOLS_SEED_DEADBEEF_WIDTH_31: [u32; 4] =
        [1_265_299_340, 2_099_030_588, 783_312_345, 1_784_020_447];
}
