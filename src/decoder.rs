//! Bubble decoder: a windowed beam search over chunk hypotheses.
//!
//! The decoder grows a tree whose level `t` holds hypotheses for message
//! chunk `t`. Every hypothesis is scored by replaying the encoder: hash it
//! onto its parent's spine value, draw `l` symbols from the resulting
//! generator and accumulate the mean squared difference to the received
//! symbols. The tree is first expanded `d` levels deep. Each following step
//! looks at the children of every node in the beam, extends their subtrees
//! by one level, scores each child by the cheapest leaf below it, and keeps
//! the `B` best children as the next beam. Once the last chunk is covered
//! the cheapest leaf under the beam is read back as the message.
//!
//! There is no checksum: a badly corrupted stream decodes to the message
//! that best explains it, which need not be the one that was sent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::bitpack;
use crate::config::{DecoderConfig, Params};
use crate::error::{Error, Result};
use crate::spine::SpineChain;
use crate::tree::{CandidateTree, NodeId};
use crate::xoshiro::SymbolRng;

/// Decodes symbol streams produced by an [`Encoder`](crate::Encoder) with the
/// same [`Params`].
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    config: DecoderConfig,
    chain: SpineChain,
}

/// Result of [`Decoder::decode_detailed`].
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub message: Vec<u8>,
    /// Accumulated cost of the chosen path; zero for an uncorrupted stream.
    pub cost: f64,
    pub stats: DecodeStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Chunks per pass in the received stream.
    pub chunks: usize,
    /// Pruning steps run after the initial expansion.
    pub steps: usize,
    /// Tree nodes created, including the root.
    pub nodes: usize,
    pub candidates_per_step: Vec<usize>,
    pub beam_per_step: Vec<usize>,
}

/// A beam member's child and the cheapest leaf cost found below it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    node: NodeId,
    score: f64,
}

/// Received symbols laid out pass-major, `chunks` symbols per pass.
#[derive(Debug)]
struct Received {
    symbols: Vec<u32>,
    chunks: usize,
}

impl Received {
    fn symbol(&self, pass: usize, position: usize) -> u32 {
        self.symbols[pass * self.chunks + position]
    }
}

impl Decoder {
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            chain: SpineChain::new(config.params.v),
        })
    }

    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes `symbols` into message bytes.
    ///
    /// The message length follows from the symbol length, see
    /// [`Params::received_chunks`].
    ///
    /// # Errors
    ///
    /// Returns an error if `symbols` is not a whole number of passes, the
    /// chunks do not form whole bytes, the lookahead depth exceeds the
    /// number of chunks, or the configured timeout runs out.
    pub fn decode(&self, symbols: &[u8]) -> Result<Vec<u8>> {
        Ok(self.decode_detailed(symbols)?.message)
    }

    /// Like [`decode`](Self::decode), also returning the path cost and
    /// search statistics.
    ///
    /// # Errors
    ///
    /// See [`decode`](Self::decode).
    pub fn decode_detailed(&self, symbols: &[u8]) -> Result<Decoded> {
        Ok(self.search(symbols, None)?.finish())
    }

    /// Like [`decode`](Self::decode), giving up once `cancel` is set.
    ///
    /// The flag is checked before every pruning step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if the flag was observed, otherwise see
    /// [`decode`](Self::decode).
    pub fn decode_with_cancel(&self, symbols: &[u8], cancel: &AtomicBool) -> Result<Vec<u8>> {
        Ok(self.search(symbols, Some(cancel))?.finish().message)
    }

    fn received(&self, symbols: &[u8]) -> Result<Received> {
        let Params { c, passes, .. } = self.config.params;
        let chunks = self.config.params.received_chunks(symbols.len())?;
        if self.config.depth > chunks {
            return Err(Error::DepthExceedsChunks {
                depth: self.config.depth,
                chunks,
            });
        }
        let mut values = bitpack::divide(symbols, c);
        values.truncate(chunks * passes as usize);
        Ok(Received {
            symbols: values,
            chunks,
        })
    }

    fn search(&self, symbols: &[u8], cancel: Option<&AtomicBool>) -> Result<Search<'_>> {
        let received = self.received(symbols)?;
        let started = Instant::now();
        let steps = received.chunks - self.config.depth;
        let mut search = Search::new(self, received);
        search.init();
        for step in 1..=steps {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                warn!(step, steps, "decoding cancelled");
                return Err(Error::Cancelled { step });
            }
            if let Some(timeout) = self.config.timeout {
                let elapsed = started.elapsed();
                if elapsed >= timeout {
                    warn!(step, steps, ?elapsed, "decoding timed out");
                    return Err(Error::TimedOut { step, elapsed });
                }
            }
            search.step(step);
        }
        Ok(search)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        let config = DecoderConfig::default();
        Self {
            config,
            chain: SpineChain::new(config.params.v),
        }
    }
}

/// State of one decode call. Dropping it frees the whole tree.
struct Search<'a> {
    decoder: &'a Decoder,
    received: Received,
    tree: CandidateTree,
    beam: Vec<NodeId>,
    stats: DecodeStats,
}

impl<'a> Search<'a> {
    fn new(decoder: &'a Decoder, received: Received) -> Self {
        let tree = CandidateTree::new();
        let beam = vec![tree.root()];
        let stats = DecodeStats {
            chunks: received.chunks,
            ..DecodeStats::default()
        };
        Self {
            decoder,
            received,
            tree,
            beam,
            stats,
        }
    }

    /// Expands the root `d` levels deep.
    fn init(&mut self) {
        let mut frontier = vec![self.tree.root()];
        for _ in 0..self.decoder.config.depth {
            let mut next = Vec::with_capacity(frontier.len() << self.decoder.config.params.k);
            for node in frontier {
                self.expand(node);
                next.extend_from_slice(self.tree.children(node));
            }
            frontier = next;
        }
    }

    /// One EXPAND/SCORE/PRUNE round. Beam members sit at depth `step - 1`,
    /// new leaves land at depth `step + d - 1`.
    fn step(&mut self, step: usize) {
        let depth = self.decoder.config.depth;
        let mut candidates = Vec::with_capacity(self.beam.len() << self.decoder.config.params.k);
        for member in std::mem::take(&mut self.beam) {
            for child in self.tree.children(member).to_vec() {
                let score = self
                    .tree
                    .descendants(child, depth - 1)
                    .into_iter()
                    .map(|leaf| self.expand(leaf))
                    .fold(f64::INFINITY, f64::min);
                candidates.push(Candidate { node: child, score });
            }
        }
        let count = candidates.len();
        let best = candidates
            .iter()
            .map(|candidate| candidate.score)
            .fold(f64::INFINITY, f64::min);
        self.beam = prune(candidates, self.decoder.config.beam_width);
        trace!(step, candidates = count, beam = self.beam.len(), best, "pruned");
        self.stats.steps = step;
        self.stats.candidates_per_step.push(count);
        self.stats.beam_per_step.push(self.beam.len());
    }

    /// Adds all `2^k` children of `parent` and returns the lowest child cost.
    #[allow(clippy::cast_precision_loss)]
    fn expand(&mut self, parent: NodeId) -> f64 {
        let Params { c, passes, .. } = self.decoder.config.params;
        let (spine, cost, position) = {
            let node = self.tree.get(parent);
            (node.spine_value, node.cost, node.depth)
        };
        let mut best = f64::INFINITY;
        for value in 0..self.decoder.config.params.branching() {
            let spine_value = self.decoder.chain.next(spine, value);
            let mut rng = SymbolRng::new(spine_value, c);
            let error: f64 = (0..passes as usize)
                .map(|pass| {
                    let diff =
                        i64::from(self.received.symbol(pass, position)) - i64::from(rng.next());
                    (diff * diff) as f64
                })
                .sum();
            let child_cost = cost + error / f64::from(passes);
            self.tree.add_child(parent, value, spine_value, child_cost);
            best = best.min(child_cost);
        }
        best
    }

    /// The cheapest leaf under the beam, read back into message bytes.
    fn finish(mut self) -> Decoded {
        let depth = self.decoder.config.depth;
        let mut best = (self.tree.root(), f64::INFINITY);
        for &member in &self.beam {
            for leaf in self.tree.descendants(member, depth) {
                let cost = self.tree.get(leaf).cost;
                if cost < best.1 {
                    best = (leaf, cost);
                }
            }
        }
        let (leaf, cost) = best;
        let message = bitpack::pack(&self.tree.path(leaf), self.decoder.config.params.k);
        self.stats.nodes = self.tree.len();
        debug!(
            chunks = self.stats.chunks,
            steps = self.stats.steps,
            nodes = self.stats.nodes,
            cost,
            len = message.len(),
            "decoded message"
        );
        Decoded {
            message,
            cost,
            stats: self.stats,
        }
    }
}

/// Keeps the `width` lowest-scoring candidates. The sort is stable, so equal
/// scores stay in discovery order.
fn prune(mut candidates: Vec<Candidate>, width: usize) -> Vec<NodeId> {
    candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
    candidates.truncate(width);
    candidates.into_iter().map(|candidate| candidate.node).collect()
}
