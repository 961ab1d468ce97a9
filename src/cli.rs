//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::Parser;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在 24 位 BMP 图像中隐藏或恢复任意小文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在 24 位 BMP 图像中隐藏或恢复任意小文件，并保留其原始扩展名。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：encode (隐藏) 和 decode (恢复)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 将文件隐藏到 24 位 BMP 图像中。
    Encode(EncodeArgs),

    /// 从隐写图像中恢复隐藏的文件。
    Decode(DecodeArgs),
}

/// 'encode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// 用作载体的 24 位 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文件路径，其扩展名会一并写入图像。
    #[arg(short, long)]
    pub secret: PathBuf,

    /// 隐写图像的输出路径 (必须是 .bmp)。
    /// 未指定时在载体图像所在目录生成 `stego.bmp`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'decode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// 含有隐藏文件的隐写图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文件的基础路径，隐藏记录中的扩展名会被追加到它后面。
    /// 未指定时在隐写图像所在目录使用 `secret_op`。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}
