use crate::constants::{CARRIER_BYTES_PER_BYTE, CARRIER_BYTES_PER_INT};

/// 将 `bit` 的最低位写入 `carrier` 的最低有效位，其余 7 位保持不变。
pub fn encode_bit(bit: u8, carrier: u8) -> u8 {
    (carrier & 0xFE) | (bit & 0x1)
}

pub fn decode_bit(carrier: u8) -> u8 {
    carrier & 0x1
}

/// 按照从高位到低位的顺序，把 `value` 的第 7..0 位依次写入 `carrier[0..8]`。
pub fn encode_byte(value: u8, carrier: &mut [u8; CARRIER_BYTES_PER_BYTE]) {
    for (i, byte) in carrier.iter_mut().enumerate() {
        let shift = CARRIER_BYTES_PER_BYTE - 1 - i;
        *byte = encode_bit(value >> shift, *byte);
    }
}

pub fn decode_byte(carrier: &[u8; CARRIER_BYTES_PER_BYTE]) -> u8 {
    carrier
        .iter()
        .fold(0u8, |acc, &byte| (acc << 1) | decode_bit(byte))
}

/// 与 [`encode_byte`] 相同的映射，扩展到 32 位：第 31 位进入 `carrier[0]`。
///
/// 数值按补码处理，负数也能原样恢复。
pub fn encode_int32(value: i32, carrier: &mut [u8; CARRIER_BYTES_PER_INT]) {
    let bits = value as u32;
    for (i, byte) in carrier.iter_mut().enumerate() {
        let shift = CARRIER_BYTES_PER_INT - 1 - i;
        *byte = encode_bit((bits >> shift) as u8, *byte);
    }
}

pub fn decode_int32(carrier: &[u8; CARRIER_BYTES_PER_INT]) -> i32 {
    carrier
        .iter()
        .fold(0u32, |acc, &byte| (acc << 1) | u32::from(decode_bit(byte))) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_bit_only_touches_the_lowest_bit() {
        assert_eq!(encode_bit(1, 0b1010_1010), 0b1010_1011);
        assert_eq!(encode_bit(0, 0b1010_1011), 0b1010_1010);
        assert_eq!(encode_bit(0b1111_1110, 0xFF), 0xFE);
        assert_eq!(decode_bit(0x81), 1);
        assert_eq!(decode_bit(0x80), 0);
    }

    #[test]
    fn encode_byte_is_msb_first() {
        let mut carrier = [0u8; 8];
        encode_byte(0b1000_0001, &mut carrier);
        assert_eq!(carrier, [1, 0, 0, 0, 0, 0, 0, 1]);

        let mut carrier = [0xFFu8; 8];
        encode_byte(b'A', &mut carrier);
        // 'A' = 0100_0001
        assert_eq!(carrier, [0xFE, 0xFF, 0xFE, 0xFE, 0xFE, 0xFE, 0xFE, 0xFF]);
        assert_eq!(decode_byte(&carrier), b'A');
    }

    #[test]
    fn encode_byte_changes_each_carrier_byte_by_at_most_one() {
        let original: [u8; 8] = [0, 1, 127, 128, 200, 254, 255, 77];
        for value in [0x00, 0x5A, 0xA5, 0xFF] {
            let mut carrier = original;
            encode_byte(value, &mut carrier);
            for (before, after) in original.iter().zip(carrier.iter()) {
                assert!(before.abs_diff(*after) <= 1);
                assert_eq!(before & 0xFE, after & 0xFE);
            }
            assert_eq!(decode_byte(&carrier), value);
        }
    }

    #[test]
    fn encode_int32_uses_explicit_bit_order() {
        let mut carrier = [0u8; 32];
        encode_int32(2, &mut carrier);
        let mut expected = [0u8; 32];
        expected[30] = 1;
        assert_eq!(carrier, expected);

        let mut carrier = [0u8; 32];
        encode_int32(i32::MIN, &mut carrier);
        assert_eq!(carrier[0], 1);
        assert!(carrier[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn decode_int32_recovers_signed_values() {
        for value in [0, 1, 3, 255, 65_536, i32::MAX, -1, i32::MIN] {
            let mut carrier = [0x5Cu8; 32];
            encode_int32(value, &mut carrier);
            assert_eq!(decode_int32(&carrier), value);
        }
    }
}
