use honggfuzz::fuzz;

use spinal::bitpack::{divide, pack};

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            for width in 1..=32 {
                let values = divide(data, width);
                let packed = pack(&values, width);
                assert_eq!(divide(&packed, width), values);
                assert!(data.starts_with(&packed[..packed.len().saturating_sub(1)]));
            }
        });
    }
}
