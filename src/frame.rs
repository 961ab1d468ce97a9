//! # 记录读写模块
//!
//! 隐藏记录按固定顺序写在像素数据的开头：
//!
//! | 字段 | 载体字节数 |
//! |---|---|
//! | 魔数标记 (2 字符) | 16 |
//! | 扩展名长度 (32 位整数) | 32 |
//! | 扩展名 (N 字符) | 8 × N |
//! | 文件长度 (32 位整数) | 32 |
//! | 文件内容 (M 字节) | 8 × M |
//!
//! [`FrameWriter`] 与 [`FrameReader`] 是一次编码/解码会话，独占各自的流；
//! [`embed`] 与 [`extract`] 按顺序执行每个步骤，任一步失败即终止整个会话。

use crate::capacity::check_capacity;
use crate::carrier::{BmpHeader, copy_header, copy_remaining};
use crate::constants::{
    BMP_HEADER_SIZE, CARRIER_BYTES_PER_BYTE, CARRIER_BYTES_PER_INT, MAGIC_MARKER,
    MAX_EXTENSION_LEN, SUPPORTED_BIT_DEPTH,
};
use crate::error::StegoError;
use crate::steganography::{decode_byte, decode_int32, encode_byte, encode_int32};
use std::io::{self, Read, Write};

const CHUNK_SIZE: usize = 4096;

/// 检查扩展名是否可以写入记录，以及解码后能否安全地拼接到输出文件名上。
pub fn validate_extension(extension: &str) -> Result<(), StegoError> {
    if extension.len() > MAX_EXTENSION_LEN {
        return Err(StegoError::ExtensionTooLong(extension.len()));
    }
    if extension.contains(['/', '\\', '\0']) {
        return Err(StegoError::InvalidExtension(extension.to_string()));
    }
    Ok(())
}

/// 从载体流中读取恰好 `N` 个字节，提前结束时报告正在读取的字段。
fn read_carrier<const N: usize, R: Read>(
    reader: &mut R,
    field: &'static str,
) -> Result<[u8; N], StegoError> {
    let mut carrier = [0u8; N];
    reader
        .read_exact(&mut carrier)
        .map_err(|e| StegoError::from_read(e, field))?;
    Ok(carrier)
}

/// 编码会话：从载体源读取字节，修改最低有效位后写入目标流。
///
/// 源与目标始终同步前进，每读取一个载体字节就写出一个字节。
pub struct FrameWriter<R: Read, W: Write> {
    source: R,
    dest: W,
}

impl<R: Read, W: Write> FrameWriter<R, W> {
    pub fn new(source: R, dest: W) -> Self {
        Self { source, dest }
    }

    /// 原样写出已经读取的头部。
    pub fn write_header(&mut self, header: &BmpHeader) -> Result<(), StegoError> {
        copy_header(header, &mut self.dest)?;
        Ok(())
    }

    pub fn write_bytes(&mut self, data: &[u8], field: &'static str) -> Result<(), StegoError> {
        data.iter().try_for_each(|&value| {
            let mut carrier = read_carrier::<CARRIER_BYTES_PER_BYTE, _>(&mut self.source, field)?;
            encode_byte(value, &mut carrier);
            self.dest.write_all(&carrier)?;
            Ok(())
        })
    }

    pub fn write_marker(&mut self) -> Result<(), StegoError> {
        self.write_bytes(MAGIC_MARKER, "magic marker")
    }

    pub fn write_int(&mut self, value: i32, field: &'static str) -> Result<(), StegoError> {
        let mut carrier = read_carrier::<CARRIER_BYTES_PER_INT, _>(&mut self.source, field)?;
        encode_int32(value, &mut carrier);
        self.dest.write_all(&carrier)?;
        Ok(())
    }

    /// 从 `payload` 中读取恰好 `len` 个字节并逐字节嵌入。
    ///
    /// # Errors
    ///
    /// `payload` 提前结束时返回 [`StegoError::Truncated`]。
    pub fn write_payload<P: Read>(&mut self, mut payload: P, len: u64) -> Result<(), StegoError> {
        let mut buffer = [0u8; CHUNK_SIZE];
        let mut remaining = len;

        while remaining > 0 {
            let chunk = remaining.min(CHUNK_SIZE as u64) as usize;
            payload
                .read_exact(&mut buffer[..chunk])
                .map_err(|e| StegoError::from_read(e, "payload"))?;
            self.write_bytes(&buffer[..chunk], "carrier pixel data")?;
            remaining -= chunk as u64;
        }

        Ok(())
    }

    /// 复制剩余的载体字节并刷新目标流，返回目标流与复制的字节数。
    pub fn finish(mut self) -> Result<(W, u64), StegoError> {
        let tail = copy_remaining(&mut self.source, &mut self.dest)?;
        self.dest.flush()?;
        Ok((self.dest, tail))
    }
}

/// 解码会话：顺序读取隐写图像中的记录。
pub struct FrameReader<R: Read> {
    source: R,
}

impl<R: Read> FrameReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// 跳过 54 字节头部，不检查其内容。
    pub fn skip_header(&mut self) -> Result<(), StegoError> {
        let skipped = io::copy(
            &mut (&mut self.source).take(BMP_HEADER_SIZE as u64),
            &mut io::sink(),
        )?;
        if skipped < BMP_HEADER_SIZE as u64 {
            return Err(StegoError::Truncated {
                field: "BMP header",
            });
        }
        Ok(())
    }

    fn read_bytes(&mut self, len: usize, field: &'static str) -> Result<Vec<u8>, StegoError> {
        (0..len)
            .map(|_| {
                read_carrier::<CARRIER_BYTES_PER_BYTE, _>(&mut self.source, field)
                    .map(|carrier| decode_byte(&carrier))
            })
            .collect()
    }

    fn read_int(&mut self, field: &'static str) -> Result<i32, StegoError> {
        let carrier = read_carrier::<CARRIER_BYTES_PER_INT, _>(&mut self.source, field)?;
        Ok(decode_int32(&carrier))
    }

    /// 读取并校验魔数标记。
    ///
    /// # Errors
    ///
    /// 标记不匹配时返回 [`StegoError::MagicMismatch`]，与流被截断的情况区分开。
    pub fn read_marker(&mut self) -> Result<(), StegoError> {
        let found = self.read_bytes(MAGIC_MARKER.len(), "magic marker")?;
        if found != MAGIC_MARKER {
            return Err(StegoError::MagicMismatch {
                found: String::from_utf8_lossy(&found).into_owned(),
            });
        }
        Ok(())
    }

    /// 读取扩展名长度与扩展名文本 (包含前导的 `.`)。
    pub fn read_extension(&mut self) -> Result<String, StegoError> {
        let value = self.read_int("extension length")?;
        let len = usize::try_from(value).map_err(|_| StegoError::InvalidLength {
            field: "extension",
            value,
        })?;
        if len > MAX_EXTENSION_LEN {
            return Err(StegoError::ExtensionTooLong(len));
        }

        let bytes = self.read_bytes(len, "extension")?;
        let extension = String::from_utf8(bytes).map_err(|e| {
            StegoError::InvalidExtension(String::from_utf8_lossy(e.as_bytes()).into_owned())
        })?;
        validate_extension(&extension)?;
        Ok(extension)
    }

    pub fn read_payload_len(&mut self) -> Result<u64, StegoError> {
        let value = self.read_int("payload length")?;
        u64::try_from(value).map_err(|_| StegoError::InvalidLength {
            field: "payload",
            value,
        })
    }

    /// 解码 `len` 个字节，按顺序写入 `output`。
    pub fn read_payload<W: Write>(&mut self, len: u64, output: &mut W) -> Result<(), StegoError> {
        let mut buffer = Vec::with_capacity(CHUNK_SIZE);
        let mut remaining = len;

        while remaining > 0 {
            let chunk = remaining.min(CHUNK_SIZE as u64) as usize;
            buffer.clear();
            for _ in 0..chunk {
                let carrier = read_carrier::<CARRIER_BYTES_PER_BYTE, _>(&mut self.source, "payload")?;
                buffer.push(decode_byte(&carrier));
            }
            output.write_all(&buffer)?;
            remaining -= chunk as u64;
        }

        Ok(())
    }
}

/// 一次成功嵌入的结果。
#[derive(Debug)]
pub struct EmbedReport<W> {
    /// 记录 (含头部) 所需的载体字节数。
    pub required: u64,
    /// 载体像素数据区的字节数。
    pub capacity: u64,
    /// 记录之后原样复制的载体字节数。
    pub tail_bytes: u64,
    /// 写入目标流的字节总数 (头部、记录与剩余载体字节)。
    pub written: u64,
    pub output: W,
}

/// 一次成功提取的结果。
#[derive(Debug)]
pub struct Extracted<W> {
    pub extension: String,
    pub payload_len: u64,
    pub output: W,
}

/// 将 `payload` (长度为 `payload_len`，扩展名为 `extension`) 嵌入 `carrier`。
///
/// 只有在头部读取成功且容量检查通过后才会调用 `open_dest` 创建目标流，
/// 因此容量不足时不会产生任何写入。
///
/// # Errors
///
/// 载体或文件内容读取不足、目标写入失败、容量不足、色深不受支持时返回错误。
pub fn embed<R, P, W, F>(
    mut carrier: R,
    payload: P,
    payload_len: u64,
    extension: &str,
    open_dest: F,
) -> Result<EmbedReport<W>, StegoError>
where
    R: Read,
    P: Read,
    W: Write,
    F: FnOnce() -> io::Result<W>,
{
    validate_extension(extension)?;
    let payload_field =
        i32::try_from(payload_len).map_err(|_| StegoError::PayloadTooLarge(payload_len))?;

    let header = BmpHeader::read_from(&mut carrier)?;
    if header.bits_per_pixel() != SUPPORTED_BIT_DEPTH {
        return Err(StegoError::UnsupportedBitDepth(header.bits_per_pixel()));
    }
    let required = check_capacity(&header, extension.len(), payload_len)?;

    let mut writer = FrameWriter::new(carrier, open_dest()?);
    writer.write_header(&header)?;
    writer.write_marker()?;
    // 扩展名长度已被限制在 255 以内
    writer.write_int(extension.len() as i32, "extension length")?;
    writer.write_bytes(extension.as_bytes(), "extension")?;
    writer.write_int(payload_field, "payload length")?;
    writer.write_payload(payload, payload_len)?;
    let (output, tail_bytes) = writer.finish()?;

    Ok(EmbedReport {
        required,
        capacity: header.capacity(),
        tail_bytes,
        written: required + tail_bytes,
        output,
    })
}

/// 从隐写图像中提取隐藏的文件。
///
/// 魔数标记与扩展名都读取成功后才会以扩展名调用 `open_output`，
/// 因此不是隐写图像的输入不会产生输出文件。
///
/// # Errors
///
/// 流被截断、魔数标记不匹配、长度字段非法或写入失败时返回错误。
pub fn extract<R, W, F>(stego: R, open_output: F) -> Result<Extracted<W>, StegoError>
where
    R: Read,
    W: Write,
    F: FnOnce(&str) -> io::Result<W>,
{
    let mut reader = FrameReader::new(stego);
    reader.skip_header()?;
    reader.read_marker()?;
    let extension = reader.read_extension()?;

    let mut output = open_output(&extension)?;
    let payload_len = reader.read_payload_len()?;
    reader.read_payload(payload_len, &mut output)?;
    output.flush()?;

    Ok(Extracted {
        extension,
        payload_len,
        output,
    })
}
