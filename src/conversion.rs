//! Fixed-width little-endian integer codecs used by the container prefix.

use byteorder::{ByteOrder, LittleEndian};

/// Encode a `u32` as 4 little-endian bytes.
pub fn int_to_bytes(n: u32) -> [u8; 4] {
    let mut buf = [0u8; 4];
    LittleEndian::write_u32(&mut buf, n);
    buf
}

/// Decode 4 little-endian bytes into a `u32`.
pub fn bytes_to_int(bytes: [u8; 4]) -> u32 {
    LittleEndian::read_u32(&bytes)
}

/// Encode a `u64` as 8 little-endian bytes.
pub fn int64_to_bytes(n: u64) -> [u8; 8] {
    let mut buf = [0u8; 8];
    LittleEndian::write_u64(&mut buf, n);
    buf
}

/// Decode 8 little-endian bytes into a `u64`.
pub fn bytes_to_int64(bytes: [u8; 8]) -> u64 {
    LittleEndian::read_u64(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_layouts() {
        assert_eq!(int_to_bytes(3), [3, 0, 0, 0]);
        assert_eq!(int_to_bytes(0x0102_0304), [4, 3, 2, 1]);
        assert_eq!(int64_to_bytes(5_000_001), [0x41, 0x4b, 0x4c, 0, 0, 0, 0, 0]);
        assert_eq!(bytes_to_int([0xff, 0xff, 0xff, 0xff]), u32::MAX);
    }

    proptest! {
        #[test]
        fn int_roundtrip(n in any::<u32>()) {
            prop_assert_eq!(bytes_to_int(int_to_bytes(n)), n);
        }

        #[test]
        fn int64_roundtrip(n in any::<u64>()) {
            prop_assert_eq!(bytes_to_int64(int64_to_bytes(n)), n);
        }
    }
}
