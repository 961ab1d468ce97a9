//! # 错误类型模块
//!
//! 定义隐写核心 (编解码记录、容量检查) 可能返回的所有错误。
//! 命令处理层使用 `anyhow` 为这些错误附加上下文。

use crate::constants::MAX_EXTENSION_LEN;
use std::io;
use thiserror::Error;

/// 嵌入或提取隐藏记录时可能发生的错误。
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 流在读取某个字段时提前结束 (图像被截断或损坏)。
    #[error("Unexpected end of data while reading the {field}")]
    Truncated { field: &'static str },

    #[error("Not enough space in the image. Required: {required}, Available: {available}")]
    InsufficientCapacity { required: u64, available: u64 },

    #[error("Unsupported BMP color depth: {0} bits per pixel (only 24-bit images are supported)")]
    UnsupportedBitDepth(u16),

    /// 魔数标记不匹配：输入不是本工具生成的隐写图像，或已损坏。
    #[error("Magic marker mismatch (found {found:?}); the image does not contain a hidden file")]
    MagicMismatch { found: String },

    #[error("Extension length {0} exceeds the maximum of {max} bytes", max = MAX_EXTENSION_LEN)]
    ExtensionTooLong(usize),

    #[error("Invalid file extension: {0:?}")]
    InvalidExtension(String),

    #[error("Invalid {field} length: {value}")]
    InvalidLength { field: &'static str, value: i32 },

    #[error("Payload of {0} bytes is too large to be described by a 32-bit length")]
    PayloadTooLarge(u64),
}

impl StegoError {
    /// 将读取错误归类：提前结束视为截断，其余保持为 I/O 错误。
    pub(crate) fn from_read(error: io::Error, field: &'static str) -> Self {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated { field }
        } else {
            Self::Io(error)
        }
    }
}
