//! # 容量检查模块
//!
//! 在写入任何字节之前，计算一条隐藏记录需要占用的载体字节数，
//! 并拒绝超出载体像素数据区的嵌入请求。

use crate::carrier::BmpHeader;
use crate::constants::{BMP_HEADER_SIZE, CARRIER_BYTES_PER_BYTE, INT_FIELD_SIZE, MAGIC_MARKER};
use crate::error::StegoError;

/// 记录所需的载体字节总数 (含 54 字节头部)。
///
/// 所有字段先按逻辑字节计数 (两个长度字段各 4 字节)，再整体乘以 8：
/// `54 + 8 × (len(magic) + 4 + len(extension) + 4 + payload_len)`。
pub fn required_bytes(extension_len: usize, payload_len: u64) -> u64 {
    let logical = MAGIC_MARKER.len() as u64
        + INT_FIELD_SIZE
        + extension_len as u64
        + INT_FIELD_SIZE
        + payload_len;
    BMP_HEADER_SIZE as u64 + logical.saturating_mul(CARRIER_BYTES_PER_BYTE as u64)
}

/// 检查载体能否容纳记录，成功时返回所需字节数。
///
/// 必须严格小于容量：恰好填满也会被拒绝，至少保留一个未使用的载体字节。
///
/// # Errors
///
/// 容量不足时返回 [`StegoError::InsufficientCapacity`]。
pub fn check_capacity(
    header: &BmpHeader,
    extension_len: usize,
    payload_len: u64,
) -> Result<u64, StegoError> {
    let required = required_bytes(extension_len, payload_len);
    let available = header.capacity();

    if required < available {
        Ok(required)
    } else {
        Err(StegoError::InsufficientCapacity {
            required,
            available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{HEIGHT_OFFSET, WIDTH_OFFSET};

    fn header(width: u32, height: u32) -> BmpHeader {
        let mut bytes = [0u8; BMP_HEADER_SIZE];
        bytes[WIDTH_OFFSET..WIDTH_OFFSET + 4].copy_from_slice(&width.to_le_bytes());
        bytes[HEIGHT_OFFSET..HEIGHT_OFFSET + 4].copy_from_slice(&height.to_le_bytes());
        BmpHeader::from_bytes(bytes)
    }

    #[test]
    fn required_bytes_matches_field_layout() {
        // 54 + 16 (marker) + 32 + 16 (".c") + 32 + 24 ("ABC")
        assert_eq!(required_bytes(2, 3), 54 + 16 + 32 + 16 + 32 + 24);
        assert_eq!(required_bytes(0, 0), 54 + 16 + 32 + 32);
    }

    #[test]
    fn tiny_carrier_is_rejected() {
        let err = check_capacity(&header(4, 4), 2, 3).unwrap_err();
        match err {
            StegoError::InsufficientCapacity {
                required,
                available,
            } => {
                assert_eq!(required, 174);
                assert_eq!(available, 48);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn exact_fit_is_rejected() {
        // required(2, 0) = 150 = 10 × 5 × 3
        assert_eq!(required_bytes(2, 0), 150);
        assert!(check_capacity(&header(10, 5), 2, 0).is_err());
    }

    #[test]
    fn one_spare_byte_is_accepted() {
        // required(2, 1) = 158, capacity = 53 × 1 × 3 = 159
        assert_eq!(check_capacity(&header(53, 1), 2, 1).unwrap(), 158);
    }
}
