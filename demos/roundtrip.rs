//! Encodes a message, optionally damages some symbol bytes, decodes it and
//! prints both side by side with the time each half took.
//!
//! ```text
//! cargo run --example roundtrip -- "some message" 3 17
//! ```
//!
//! Every argument after the message is the index of a symbol byte to flip.
//! `RUST_LOG=spinal=trace` shows every pruning step.

use std::time::Instant;

use anyhow::Context;
use spinal::{Decoder, DecoderConfig, Encoder, Params};
use tracing_subscriber::EnvFilter;

const DEFAULT_MESSAGE: &str = "01234567890123456789012345678901234567890123456789012345678901234567890123456789012345678901234567890123456789012345678901234567";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let message = args.next().unwrap_or_else(|| DEFAULT_MESSAGE.into());
    let flips = args
        .map(|arg| arg.parse::<usize>().with_context(|| format!("bad byte index {arg:?}")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let params = Params::new(4, 32, 6, 1)?;
    let encoder = Encoder::new(params)?;
    let decoder = Decoder::new(DecoderConfig::new(params, 16, 1)?)?;

    let started = Instant::now();
    let encoded = encoder.encode_detailed(message.as_bytes());
    let encoding_time = started.elapsed();
    if encoded.padding > 0 {
        println!("Added {} zero bytes for encoding.", encoded.padding);
    }

    let mut symbols = encoded.symbols;
    for index in flips {
        let len = params.encoded_len(message.len());
        let byte = symbols
            .get_mut(index)
            .with_context(|| format!("byte index {index} is past the {len} symbol bytes"))?;
        *byte ^= 0xff;
    }

    let started = Instant::now();
    let decoded = decoder.decode_detailed(&symbols)?;
    let decoding_time = started.elapsed();

    println!("Message\tDecoded");
    for (sent, received) in message.bytes().zip(&decoded.message) {
        let marker = if sent == *received { "" } else { "\t<-" };
        println!("{sent}\t{received}{marker}");
    }
    println!(
        "{} symbol bytes, path cost {}, {} tree nodes",
        symbols.len(),
        decoded.cost,
        decoded.stats.nodes
    );
    println!("Encoding took {encoding_time:?}");
    println!("Decoding took {decoding_time:?}");
    Ok(())
}
