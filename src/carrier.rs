//! # 载体透传模块
//!
//! 负责 BMP 头部的读取与原样复制，以及隐藏记录之后剩余载体字节的复制。
//! 头部内容对隐写过程是不透明的，这里只读取宽、高与色深用于容量计算。

use crate::constants::{
    BITS_PER_PIXEL_OFFSET, BMP_HEADER_SIZE, BYTES_PER_PIXEL, HEIGHT_OFFSET, WIDTH_OFFSET,
};
use crate::error::StegoError;
use std::io::{self, Read, Write};

/// 载体图像的 54 字节头部。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmpHeader {
    bytes: [u8; BMP_HEADER_SIZE],
}

impl BmpHeader {
    /// 从流中读取恰好 54 个字节作为头部。
    ///
    /// # Errors
    ///
    /// 流不足 54 字节时返回 [`StegoError::Truncated`]。
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, StegoError> {
        let mut bytes = [0u8; BMP_HEADER_SIZE];
        reader
            .read_exact(&mut bytes)
            .map_err(|e| StegoError::from_read(e, "BMP header"))?;
        Ok(Self { bytes })
    }

    pub fn from_bytes(bytes: [u8; BMP_HEADER_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; BMP_HEADER_SIZE] {
        &self.bytes
    }

    fn i32_at(&self, offset: usize) -> i32 {
        let mut field = [0u8; 4];
        field.copy_from_slice(&self.bytes[offset..offset + 4]);
        i32::from_le_bytes(field)
    }

    pub fn width(&self) -> u32 {
        self.i32_at(WIDTH_OFFSET).unsigned_abs()
    }

    /// 图像高度。自上而下存储的 BMP 高度为负数，这里取其绝对值。
    pub fn height(&self) -> u32 {
        self.i32_at(HEIGHT_OFFSET).unsigned_abs()
    }

    pub fn bits_per_pixel(&self) -> u16 {
        u16::from_le_bytes([
            self.bytes[BITS_PER_PIXEL_OFFSET],
            self.bytes[BITS_PER_PIXEL_OFFSET + 1],
        ])
    }

    /// 像素数据区的字节数：`width × height × 3`。
    pub fn capacity(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height()) * BYTES_PER_PIXEL
    }
}

/// 将头部原样写入目标流。
pub fn copy_header<W: Write>(header: &BmpHeader, writer: &mut W) -> io::Result<()> {
    writer.write_all(header.as_bytes())
}

/// 将载体中剩余的所有字节原样复制到目标流，返回复制的字节数。
pub fn copy_remaining<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<u64> {
    io::copy(reader, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header_with(width: i32, height: i32, bpp: u16) -> [u8; BMP_HEADER_SIZE] {
        let mut bytes = [0u8; BMP_HEADER_SIZE];
        bytes[0..2].copy_from_slice(b"BM");
        bytes[WIDTH_OFFSET..WIDTH_OFFSET + 4].copy_from_slice(&width.to_le_bytes());
        bytes[HEIGHT_OFFSET..HEIGHT_OFFSET + 4].copy_from_slice(&height.to_le_bytes());
        bytes[BITS_PER_PIXEL_OFFSET..BITS_PER_PIXEL_OFFSET + 2].copy_from_slice(&bpp.to_le_bytes());
        bytes
    }

    #[test]
    fn reads_dimensions_and_capacity() {
        let header = BmpHeader::from_bytes(header_with(100, 100, 24));
        assert_eq!(header.width(), 100);
        assert_eq!(header.height(), 100);
        assert_eq!(header.bits_per_pixel(), 24);
        assert_eq!(header.capacity(), 30_000);
    }

    #[test]
    fn top_down_height_counts_by_magnitude() {
        let header = BmpHeader::from_bytes(header_with(4, -4, 24));
        assert_eq!(header.height(), 4);
        assert_eq!(header.capacity(), 48);
    }

    #[test]
    fn short_header_is_truncated() {
        let mut reader = Cursor::new(vec![0u8; 20]);
        let err = BmpHeader::read_from(&mut reader).unwrap_err();
        assert!(matches!(err, StegoError::Truncated { field: "BMP header" }));
    }

    #[test]
    fn header_and_tail_are_copied_verbatim() {
        let mut data = header_with(2, 2, 24).to_vec();
        data.extend_from_slice(&[9, 8, 7, 6, 5]);
        let mut reader = Cursor::new(data.clone());

        let header = BmpHeader::read_from(&mut reader).unwrap();
        let mut out = Vec::new();
        copy_header(&header, &mut out).unwrap();
        let copied = copy_remaining(&mut reader, &mut out).unwrap();

        assert_eq!(copied, 5);
        assert_eq!(out, data);
    }
}
