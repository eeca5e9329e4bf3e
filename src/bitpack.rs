//! Conversion between byte buffers and sequences of fixed-width integers.
//!
//! Both directions read and write bits MSB first: with a width of 6 the
//! bytes `[b0, b1, b2]` are read as `b0[7..2] | b0[1..0] b1[7..4] | ...`.
//!
//! ```
//! use spinal::bitpack::{divide, pack};
//! let values = divide(&[0b1010_0111, 0b0011_1100, 0b1111_0000], 6);
//! assert_eq!(values, vec![0b101001, 0b110011, 0b110011, 0b110000]);
//! assert_eq!(pack(&values, 6), vec![0b1010_0111, 0b0011_1100, 0b1111_0000]);
//! ```

/// Splits `bytes` into `width`-bit values.
///
/// Emits `8 * bytes.len() / width` values; trailing bits that do not make up
/// a whole value are ignored.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn divide(bytes: &[u8], width: u32) -> Vec<u32> {
    debug_assert!((1..=32).contains(&width));
    let count = bytes.len() * 8 / width as usize;
    let mut values = Vec::with_capacity(count);
    let mut acc: u64 = 0;
    let mut bits = 0;
    for &byte in bytes {
        acc = (acc << 8) | u64::from(byte);
        bits += 8;
        while bits >= width {
            bits -= width;
            values.push((acc >> bits) as u32 & mask(width));
        }
        acc &= (1 << bits) - 1;
    }
    values
}

/// Packs the low `width` bits of every value into bytes.
///
/// The last byte is filled up with zero bits when `values.len() * width`
/// is not a multiple of 8.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn pack(values: &[u32], width: u32) -> Vec<u8> {
    debug_assert!((1..=32).contains(&width));
    let mut bytes = Vec::with_capacity(packed_len(values.len(), width));
    let mut acc: u64 = 0;
    let mut bits = 0;
    for &value in values {
        acc = (acc << width) | u64::from(value & mask(width));
        bits += width;
        while bits >= 8 {
            bits -= 8;
            bytes.push((acc >> bits) as u8);
        }
        acc &= (1 << bits) - 1;
    }
    if bits > 0 {
        bytes.push((acc << (8 - bits)) as u8);
    }
    bytes
}

/// Number of bytes [`pack`] produces for `count` values of `width` bits.
#[must_use]
pub fn packed_len(count: usize, width: u32) -> usize {
    (count * width as usize).div_ceil(8)
}

pub(crate) fn mask(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1 << width) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divide_nibbles() {
        assert_eq!(divide(b"01", 4), vec![3, 0, 3, 1]);
        assert_eq!(divide(&[0xab, 0xcd], 4), vec![0xa, 0xb, 0xc, 0xd]);
    }

    #[test]
    fn test_divide_ignores_trailing_bits() {
        // 16 bits hold two 6-bit values and 4 spare bits.
        assert_eq!(divide(&[0xff, 0xff], 6), vec![0x3f, 0x3f]);
        assert!(divide(&[0xff], 9).is_empty());
    }

    #[test]
    fn test_pack_pads_last_byte() {
        assert_eq!(pack(&[0x3f], 6), vec![0xfc]);
        assert_eq!(pack(&[1, 1, 1], 3), vec![0b0010_0100, 0b1000_0000]);
        assert_eq!(packed_len(3, 3), 2);
    }

    #[test]
    fn test_pack_masks_high_bits() {
        assert_eq!(pack(&[0xff, 0xf0], 4), vec![0xf0]);
    }

    #[test]
    fn test_wide_values() {
        let values = vec![0xdead_beef, 0x0123_4567, u32::MAX];
        let packed = pack(&values, 32);
        assert_eq!(hex::encode(&packed), "deadbeef01234567ffffffff");
        assert_eq!(divide(&packed, 32), values);

        let values = vec![0x7fff_ffff, 0, 0x1234_5678, 1, 0x4000_0000, 2, 3, 4];
        assert_eq!(divide(&pack(&values, 31), 31), values);
    }

    #[test]
    fn test_round_trip_all_widths() {
        let mut xoshiro = crate::xoshiro::Xoshiro256::from("Wolf");
        for width in 1..=32 {
            // 8 values always fill whole bytes.
            let values: Vec<u32> = (0..64)
                .map(|_| (xoshiro.next() as u32) & mask(width))
                .collect();
            let packed = pack(&values, width);
            assert_eq!(packed.len(), packed_len(values.len(), width));
            assert_eq!(divide(&packed, width), values, "width {width}");
        }
    }

    #[test]
    fn test_round_trip_partial_byte() {
        let values = vec![5, 2, 7];
        let packed = pack(&values, 3);
        assert_eq!(&divide(&packed, 3)[..values.len()], &values[..]);
    }
}
