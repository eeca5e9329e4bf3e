//! Code parameters.
//!
//! | Name | Field | Meaning |
//! |------|-------|---------|
//! | k | [`Params::k`] | bits per message chunk, `1..32` |
//! | v | [`Params::v`] | bits kept of each spine value, `1..=32` |
//! | c | [`Params::c`] | bits per transmitted symbol, `1..32` |
//! | l | [`Params::passes`] | passes over the spine, at least 1 |
//! | B | [`DecoderConfig::beam_width`] | candidates kept per decoding step |
//! | d | [`DecoderConfig::depth`] | lookahead depth of the decoding tree |
//!
//! The defaults are `k = 4, v = 32, c = 6, l = 1, B = 16, d = 1`.

use std::time::Duration;

use crate::bitpack;
use crate::error::{Error, Result};

/// Parameters shared by the encoder and the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    pub k: u32,
    pub v: u32,
    pub c: u32,
    pub passes: u32,
}

impl Params {
    /// # Errors
    ///
    /// Returns an error if a width is out of range or `passes` is zero.
    pub fn new(k: u32, v: u32, c: u32, passes: u32) -> Result<Self> {
        let params = Self { k, v, c, passes };
        params.validate()?;
        Ok(params)
    }

    /// Checks the ranges listed in the [module documentation](self).
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::ZeroChunkWidth);
        }
        if self.k >= 32 {
            return Err(Error::ChunkWidth(self.k));
        }
        if self.v == 0 || self.v > 32 {
            return Err(Error::SpineWidth(self.v));
        }
        if self.c == 0 || self.c >= 32 {
            return Err(Error::SymbolWidth(self.c));
        }
        if self.passes == 0 {
            return Err(Error::ZeroPasses);
        }
        Ok(())
    }

    /// Number of chunk hypotheses per tree level, `2^k`.
    #[must_use]
    pub fn branching(&self) -> u32 {
        1 << self.k
    }

    /// Zero bytes appended to a message of `len` bytes so it splits into
    /// whole `k`-bit chunks.
    #[must_use]
    pub fn padding(&self, len: usize) -> usize {
        let k = self.k as usize;
        (0..k).find(|pad| (8 * (len + pad)) % k == 0).unwrap_or(0)
    }

    /// Chunks in a message of `len` bytes after padding.
    #[must_use]
    pub fn chunk_count(&self, len: usize) -> usize {
        8 * (len + self.padding(len)) / self.k as usize
    }

    /// Length in bytes of the encoding of a message of `len` bytes.
    #[must_use]
    pub fn encoded_len(&self, len: usize) -> usize {
        bitpack::packed_len(self.chunk_count(len) * self.passes as usize, self.c)
    }

    /// Chunks per pass carried by `len` encoded bytes.
    ///
    /// The zero bits completing the last byte of an encoding may be wide
    /// enough to read as further symbols. The count taken is the largest one
    /// that packs into exactly `len` bytes and covers whole message bytes;
    /// such counts are the multiples of `8 / gcd(k, 8)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MisalignedSymbols`] if `len` is not a whole number of
    /// passes and [`Error::MisalignedMessage`] if no fitting chunk count
    /// forms whole bytes.
    pub fn received_chunks(&self, len: usize) -> Result<usize> {
        let passes = self.passes as usize;
        let most = len * 8 / (self.c as usize * passes);
        if bitpack::packed_len(most * passes, self.c) != len {
            return Err(Error::MisalignedSymbols {
                len,
                passes: self.passes,
                width: self.c,
            });
        }
        let step = 8 >> self.k.trailing_zeros().min(3);
        let chunks = most / step * step;
        if bitpack::packed_len(chunks * passes, self.c) != len {
            return Err(Error::MisalignedMessage {
                chunks: most,
                width: self.k,
            });
        }
        Ok(chunks)
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            k: 4,
            v: 32,
            c: 6,
            passes: 1,
        }
    }
}

/// Decoder settings on top of the shared [`Params`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    pub params: Params,
    pub beam_width: usize,
    pub depth: usize,
    /// Wall-clock budget for one decode call, checked between steps.
    pub timeout: Option<Duration>,
}

impl DecoderConfig {
    /// # Errors
    ///
    /// Returns an error if `params` is invalid, `beam_width` is zero or
    /// `depth` is zero.
    pub fn new(params: Params, beam_width: usize, depth: usize) -> Result<Self> {
        let config = Self {
            params,
            beam_width,
            depth,
            timeout: None,
        };
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// # Errors
    ///
    /// Returns the first violated constraint. Whether `depth` fits the
    /// number of received chunks can only be checked when decoding.
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        if self.beam_width == 0 {
            return Err(Error::BeamWidth);
        }
        if self.depth == 0 {
            return Err(Error::ZeroDepth);
        }
        Ok(())
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            params: Params::default(),
            beam_width: 16,
            depth: 1,
            timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Params::default().validate().is_ok());
        assert!(DecoderConfig::default().validate().is_ok());
        assert_eq!(Params::new(4, 32, 6, 1).unwrap(), Params::default());
    }

    #[test]
    fn test_param_errors() {
        assert_eq!(Params::new(0, 32, 6, 1).unwrap_err(), Error::ZeroChunkWidth);
        assert_eq!(Params::new(32, 32, 6, 1).unwrap_err(), Error::ChunkWidth(32));
        assert_eq!(Params::new(4, 0, 6, 1).unwrap_err(), Error::SpineWidth(0));
        assert_eq!(Params::new(4, 33, 6, 1).unwrap_err(), Error::SpineWidth(33));
        assert_eq!(Params::new(4, 32, 0, 1).unwrap_err(), Error::SymbolWidth(0));
        assert_eq!(Params::new(4, 32, 32, 1).unwrap_err(), Error::SymbolWidth(32));
        assert_eq!(Params::new(4, 32, 6, 0).unwrap_err(), Error::ZeroPasses);
        assert!(Params::new(31, 32, 31, 9).is_ok());
    }

    #[test]
    fn test_decoder_errors() {
        let params = Params::default();
        assert_eq!(
            DecoderConfig::new(params, 0, 1).unwrap_err(),
            Error::BeamWidth
        );
        assert_eq!(
            DecoderConfig::new(params, 16, 0).unwrap_err(),
            Error::ZeroDepth
        );
        let bad = Params {
            k: 0,
            ..Params::default()
        };
        assert_eq!(
            DecoderConfig::new(bad, 16, 1).unwrap_err(),
            Error::ZeroChunkWidth
        );
        let config = DecoderConfig::new(params, 1, 3)
            .unwrap()
            .with_timeout(Duration::from_secs(1));
        assert_eq!(config.timeout, Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_padding() {
        let params = Params::default();
        assert_eq!(params.padding(0), 0);
        assert_eq!(params.padding(5), 0);
        let k3 = Params::new(3, 32, 6, 1).unwrap();
        assert_eq!(k3.padding(1), 2);
        assert_eq!(k3.padding(3), 0);
        assert_eq!(k3.chunk_count(1), 8);
        let k5 = Params::new(5, 32, 6, 1).unwrap();
        assert_eq!(k5.padding(6), 4);
        assert_eq!(k5.chunk_count(6), 16);
    }

    #[test]
    fn test_encoded_len() {
        let params = Params::default();
        assert_eq!(params.encoded_len(128), 192);
        assert_eq!(params.encoded_len(6), 9);
        let two_passes = Params::new(4, 32, 6, 2).unwrap();
        assert_eq!(two_passes.encoded_len(6), 18);
        assert_eq!(params.branching(), 16);
    }

    #[test]
    fn test_received_chunks() {
        let params = Params::default();
        assert_eq!(params.received_chunks(9), Ok(12));
        assert_eq!(params.received_chunks(0), Ok(0));
        assert_eq!(
            params.received_chunks(1),
            Err(Error::MisalignedMessage {
                chunks: 1,
                width: 4
            })
        );

        // One message byte at c = 5 is ten bits; the six zero bits after
        // them hold a third symbol that cannot start a new byte.
        let c5 = Params::new(4, 32, 5, 1).unwrap();
        assert_eq!(c5.encoded_len(1), 2);
        assert_eq!(c5.received_chunks(2), Ok(2));

        // Three message bytes at c = 3 leave room for a fourth one.
        let c3 = Params::new(4, 32, 3, 1).unwrap();
        assert_eq!(c3.encoded_len(3), 3);
        assert_eq!(c3.received_chunks(3), Ok(8));

        let k3 = Params::new(3, 32, 7, 2).unwrap();
        assert_eq!(k3.received_chunks(k3.encoded_len(2)), Ok(8));

        let two_passes = Params::new(4, 32, 6, 2).unwrap();
        assert_eq!(
            two_passes.received_chunks(4),
            Err(Error::MisalignedSymbols {
                len: 4,
                passes: 2,
                width: 6
            })
        );
    }
}
