//! Error types for encoding and decoding.
//!
//! Configuration errors are reported when an [`Encoder`](crate::Encoder) or
//! [`Decoder`](crate::Decoder) is built; alignment errors when a buffer is
//! handed to it. A decoder that returns the wrong message because the
//! received symbols were too corrupted does not produce an error: there is
//! no checksum to detect it.

use std::time::Duration;

/// Errors returned by this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The message chunk width `k` was zero.
    #[error("message chunk width must be at least 1 bit")]
    ZeroChunkWidth,

    /// The message chunk width `k` was 32 bits or more.
    #[error("message chunk width {0} is not below 32 bits")]
    ChunkWidth(u32),

    /// The spine width `v` was zero or above 32 bits.
    #[error("spine width {0} is not within 1..=32 bits")]
    SpineWidth(u32),

    /// The symbol width `c` was zero or 32 bits or more.
    #[error("symbol width {0} is not within 1..32 bits")]
    SymbolWidth(u32),

    /// The pass count `l` was zero.
    #[error("pass count must be at least 1")]
    ZeroPasses,

    /// The beam width `B` was zero.
    #[error("beam width must be at least 1")]
    BeamWidth,

    /// The lookahead depth `d` was zero.
    #[error("lookahead depth must be at least 1")]
    ZeroDepth,

    /// The received buffer is not a whole number of passes of `width`-bit symbols.
    #[error("{len} symbol bytes do not hold a whole number of {passes} passes of {width}-bit symbols")]
    MisalignedSymbols {
        /// Length of the received buffer in bytes.
        len: usize,
        /// Configured pass count.
        passes: u32,
        /// Configured symbol width.
        width: u32,
    },

    /// The number of chunks per pass does not add up to whole message bytes.
    #[error("{chunks} chunks of {width} bits do not form whole message bytes")]
    MisalignedMessage {
        /// Symbols per pass, one per message chunk.
        chunks: usize,
        /// Configured message chunk width.
        width: u32,
    },

    /// The lookahead depth is larger than the number of chunks to decode.
    #[error("lookahead depth {depth} exceeds the {chunks} chunks available")]
    DepthExceedsChunks {
        /// Configured lookahead depth.
        depth: usize,
        /// Chunks per pass in the received buffer.
        chunks: usize,
    },

    /// Decoding stopped because the caller raised the cancel flag.
    #[error("decoding cancelled at step {step}")]
    Cancelled {
        /// The step that was about to run.
        step: usize,
    },

    /// Decoding ran past the configured timeout.
    #[error("decoding timed out at step {step} after {elapsed:?}")]
    TimedOut {
        /// The step that was about to run.
        step: usize,
        /// Time spent decoding so far.
        elapsed: Duration,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
