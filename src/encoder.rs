use tracing::debug;

use crate::bitpack;
use crate::config::Params;
use crate::error::Result;
use crate::spine::SpineChain;
use crate::xoshiro::SymbolRng;

/// Encodes messages into symbol streams.
///
/// The encoder keeps no state between messages.
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    params: Params,
    chain: SpineChain,
}

/// Result of [`Encoder::encode_detailed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// Packed symbols, pass-major.
    pub symbols: Vec<u8>,
    /// Zero bytes appended to the message before chunking.
    pub padding: usize,
    /// Number of message chunks, which is also the number of symbols per pass.
    pub chunks: usize,
}

impl Encoder {
    /// # Errors
    ///
    /// Returns an error if `params` is invalid.
    pub fn new(params: Params) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            chain: SpineChain::new(params.v),
        })
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Splits `message` into `k`-bit chunks, padding it with zero bytes first.
    #[must_use]
    pub fn chunks(&self, message: &[u8]) -> Vec<u32> {
        let padding = self.params.padding(message.len());
        if padding == 0 {
            return bitpack::divide(message, self.params.k);
        }
        debug!(padding, len = message.len(), "padding message");
        let mut padded = Vec::with_capacity(message.len() + padding);
        padded.extend_from_slice(message);
        padded.resize(message.len() + padding, 0);
        bitpack::divide(&padded, self.params.k)
    }

    /// The spine values of `message`, one per chunk.
    #[must_use]
    pub fn spine(&self, message: &[u8]) -> Vec<u32> {
        self.chain.chain(&self.chunks(message))
    }

    /// An unbounded stream of passes over the spine of `message`.
    #[must_use]
    pub fn stream(&self, message: &[u8]) -> SymbolStream {
        let rngs = self
            .spine(message)
            .into_iter()
            .map(|spine| SymbolRng::new(spine, self.params.c))
            .collect();
        SymbolStream { rngs, passes: 0 }
    }

    /// Encodes `message` into `l` passes of packed `c`-bit symbols.
    #[must_use]
    pub fn encode(&self, message: &[u8]) -> Vec<u8> {
        self.encode_detailed(message).symbols
    }

    #[must_use]
    pub fn encode_detailed(&self, message: &[u8]) -> Encoded {
        let padding = self.params.padding(message.len());
        let mut stream = self.stream(message);
        let chunks = stream.chunk_count();
        let mut symbols = Vec::with_capacity(chunks * self.params.passes as usize);
        for _ in 0..self.params.passes {
            symbols.extend(stream.next_pass());
        }
        let symbols = bitpack::pack(&symbols, self.params.c);
        debug!(
            len = message.len(),
            padding,
            chunks,
            passes = self.params.passes,
            encoded_len = symbols.len(),
            "encoded message"
        );
        Encoded {
            symbols,
            padding,
            chunks,
        }
    }
}

impl Default for Encoder {
    fn default() -> Self {
        let params = Params::default();
        Self {
            params,
            chain: SpineChain::new(params.v),
        }
    }
}

/// Rateless form of the encoder output.
///
/// Every call to [`next_pass`](Self::next_pass) draws one more symbol from
/// the generator of each spine value. The first `l` passes are exactly what
/// [`Encoder::encode`] packs.
#[derive(Debug, Clone)]
pub struct SymbolStream {
    rngs: Vec<SymbolRng>,
    passes: usize,
}

impl SymbolStream {
    pub fn next_pass(&mut self) -> Vec<u32> {
        self.passes += 1;
        self.rngs.iter_mut().map(SymbolRng::next).collect()
    }

    #[must_use]
    pub fn passes_emitted(&self) -> usize {
        self.passes
    }

    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.rngs.len()
    }
}

impl Iterator for SymbolStream {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Vec<u32>> {
        Some(self.next_pass())
    }
}
