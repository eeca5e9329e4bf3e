//! `spinal` is a crate for Spinal-style rateless codes.
//!
//! A message is cut into `k`-bit chunks which are hash-chained into a
//! *spine*. Every spine value seeds a pseudorandom generator, and each pass
//! over the spine draws one `c`-bit symbol per chunk. The decoder replays the
//! encoder over a tree of chunk hypotheses and keeps the `B` paths whose
//! predicted symbols lie closest to the received ones.
//!
//! # Encode and decode
//! ```
//! use spinal::{Decoder, Encoder};
//! let symbols = Encoder::default().encode(b"Spinal");
//! assert_eq!(symbols.len(), 9);
//! assert_eq!(Decoder::default().decode(&symbols).unwrap(), b"Spinal");
//! ```
//!
//! # Choose parameters
//!
//! More passes make the stream longer and the decoder harder to fool.
//! ```
//! use spinal::{Decoder, DecoderConfig, Encoder, Params};
//! let params = Params::new(4, 32, 6, 2).unwrap();
//! let mut symbols = Encoder::new(params).unwrap().encode(b"Spinal codes FEC");
//! assert_eq!(symbols.len(), 48);
//!
//! // Damage one symbol byte on the way
//! symbols[10] ^= 0x24;
//!
//! let decoder = Decoder::new(DecoderConfig::new(params, 16, 1).unwrap()).unwrap();
//! assert_eq!(decoder.decode(&symbols).unwrap(), b"Spinal codes FEC");
//! ```
//!
//! # Keep emitting symbols
//!
//! The code is rateless: the encoder can keep producing passes for as long
//! as the receiver needs them.
//! ```
//! let encoder = spinal::Encoder::default();
//! let mut stream = encoder.stream(b"Spinal");
//! let first = stream.next_pass();
//! let second = stream.next_pass();
//! assert_eq!(first.len(), 12);
//! assert_ne!(first, second);
//! ```

pub mod bitpack;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod hash;
pub mod spine;
pub mod tree;
pub mod xoshiro;

pub use self::config::{DecoderConfig, Params};
pub use self::decoder::{DecodeStats, Decoded, Decoder};
pub use self::encoder::{Encoded, Encoder, SymbolStream};
pub use self::error::{Error, Result};
