use honggfuzz::fuzz;

use spinal::{Decoder, DecoderConfig, Params};

fn main() {
    let config = DecoderConfig::new(Params::new(4, 32, 6, 2).unwrap(), 4, 1).unwrap();
    let decoder = Decoder::new(config).unwrap();
    loop {
        fuzz!(|data: &[u8]| {
            if let Ok(message) = decoder.decode(data) {
                assert_eq!(message.len(), data.len() * 4 / (2 * 6));
            }
        });
    }
}
