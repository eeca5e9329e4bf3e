use honggfuzz::fuzz;

use spinal::{Decoder, DecoderConfig, Encoder, Params};

fn main() {
    let params = Params::new(4, 32, 6, 1).unwrap();
    let encoder = Encoder::new(params).unwrap();
    let decoder = Decoder::new(DecoderConfig::new(params, 16, 1).unwrap()).unwrap();
    loop {
        fuzz!(|data: &[u8]| {
            if data.is_empty() || data.len() > 64 {
                return;
            }
            let symbols = encoder.encode(data);
            assert_eq!(symbols.len(), params.encoded_len(data.len()));
            assert_eq!(encoder.encode(data), symbols);
            let message = decoder.decode(&symbols).unwrap();
            assert_eq!(message.len(), data.len());
        });
    }
}
