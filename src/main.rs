use clap::Parser;

use bmp_hide::{
    cli::{Cli, Commands},
    handler::{handle_decode, handle_encode},
};

/// 程序的主入口点
///
/// 负责解析命令行参数，并根据指定的子命令（`encode` 或 `decode`）
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Encode(args) => handle_encode(args).map(|_| ()),
        Commands::Decode(args) => handle_decode(args).map(|_| ()),
    }
}
