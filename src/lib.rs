//! # bmp_hide 库
//!
//! 本库包含 BMP 文件隐写工具的核心逻辑：位级编解码、隐藏记录的读写、
//! 容量检查，以及 BMP 头部与剩余像素数据的原样透传。

// 声明库包含的所有模块。

pub mod capacity;
pub mod carrier;
pub mod cli;
pub mod constants;
pub mod error;
pub mod frame;
pub mod handler;
pub mod steganography;

pub use error::StegoError;
pub use frame::{EmbedReport, Extracted, embed, extract};
