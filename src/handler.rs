//! # 命令处理逻辑模块
//!
//! 包含处理 `encode` 和 `decode` 子命令的高级业务逻辑。
//! 本模块负责参数校验、文件 I/O、调用核心隐写流程以及向用户报告结果。

use crate::cli::{DecodeArgs, EncodeArgs};
use crate::constants::{DEFAULT_SECRET_STEM, DEFAULT_STEGO_NAME};
use crate::frame::{embed, extract};
use anyhow::{Context, Result};
use colored::Colorize;
use image::ImageFormat;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

fn info(message: impl AsRef<str>) {
    println!("{} {}", "INFO:".cyan().bold(), message.as_ref());
}

fn is_bmp(path: &Path) -> bool {
    matches!(ImageFormat::from_path(path), Ok(ImageFormat::Bmp))
}

/// 失败时删除已经创建的不完整输出文件。
fn discard_partial(path: Option<&Path>) {
    if let Some(path) = path {
        let _ = fs::remove_file(path);
    }
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 在文件名后追加扩展名 (扩展名本身包含前导的 `.`)。
fn append_extension(base: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(extension);
    PathBuf::from(name)
}

/// 处理 'Encode' 命令的执行逻辑。
///
/// 负责校验路径、打开载体图像与待隐藏文件、检查隐写空间是否足够，
/// 然后写出包含隐藏记录的新图像。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `EncodeArgs` 结构体。
///
/// # Returns
///
/// 生成的隐写图像路径。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 载体或输出路径不是 BMP 文件，或待隐藏文件没有扩展名。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取载体图像或待隐藏文件。
/// * 图像不是 24 位 BMP，或没有足够的空间来隐藏文件。
/// * 无法写入目标图像文件 (此时不完整的文件会被删除)。
pub fn handle_encode(args: EncodeArgs) -> Result<PathBuf> {
    anyhow::ensure!(
        is_bmp(&args.image),
        "{} is not a bmp file",
        args.image.to_string_lossy().red().bold()
    );

    let extension = args
        .secret
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .with_context(|| {
            format!(
                "The secret file has no extension: {}",
                args.secret.to_string_lossy().red().bold()
            )
        })?;

    let dest = match args.dest {
        Some(dest) => {
            anyhow::ensure!(
                is_bmp(&dest),
                "{} is not a bmp file",
                dest.to_string_lossy().red().bold()
            );
            dest
        }
        None => {
            let dest = args
                .image
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(DEFAULT_STEGO_NAME);
            info(format!(
                "Output file not mentioned, creating {} as default",
                dest.to_string_lossy().green()
            ));
            dest
        }
    };

    ensure_writable(&dest, args.force)?;
    if dest.exists() {
        let same_file = fs::canonicalize(&dest)? == fs::canonicalize(&args.image)?;
        anyhow::ensure!(
            !same_file,
            "The output image must differ from the carrier image: {}",
            dest.to_string_lossy().red().bold()
        );
    }

    let carrier = File::open(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let secret = File::open(&args.secret).with_context(|| {
        format!(
            "Unable to read secret file: {}",
            args.secret.to_string_lossy().red().bold()
        )
    })?;
    let secret_len = secret.metadata()?.len();

    info(format!(
        "Checking {} capacity to handle {} ({} bytes)",
        args.image.to_string_lossy().green(),
        args.secret.to_string_lossy().green(),
        secret_len
    ));

    let mut created = None;
    let result = embed(
        BufReader::new(carrier),
        BufReader::new(secret),
        secret_len,
        &extension,
        || {
            let file = File::create(&dest)?;
            created = Some(dest.clone());
            Ok(BufWriter::new(file))
        },
    );

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            discard_partial(created.as_deref());
            return Err(e).with_context(|| {
                format!(
                    "Failed to hide {} in {}",
                    args.secret.to_string_lossy().red().bold(),
                    args.image.to_string_lossy().red().bold()
                )
            });
        }
    };

    info(format!(
        "Embedded record uses {} of {} carrier bytes, {} bytes copied unchanged",
        report.required.to_string().green(),
        report.capacity.to_string().green(),
        report.tail_bytes
    ));
    println!(
        "The file has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(dest)
}

/// 处理 'Decode' 命令的执行逻辑。
///
/// 负责读取隐写图像、校验魔数标记、恢复扩展名与文件内容，
/// 并将内容写入 `基础路径 + 扩展名`。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `DecodeArgs` 结构体。
///
/// # Returns
///
/// 恢复出的文件路径。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输入路径不是 BMP 文件，或无法读取。
/// * 图像不含隐藏记录 (魔数标记不匹配)，此时不会创建输出文件。
/// * 隐藏记录被截断或损坏。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
/// * 恢复出的文件路径就是隐写图像本身 (即使指定了 `--force`)。
pub fn handle_decode(args: DecodeArgs) -> Result<PathBuf> {
    anyhow::ensure!(
        is_bmp(&args.image),
        "{} is not a bmp file",
        args.image.to_string_lossy().red().bold()
    );

    let base = args.output.unwrap_or_else(|| {
        let base = args
            .image
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(DEFAULT_SECRET_STEM);
        info(format!(
            "Output file not mentioned, using {} as default base name",
            base.to_string_lossy().green()
        ));
        base
    });

    let stego = File::open(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let force = args.force;
    let mut created = None;
    let result = extract(BufReader::new(stego), |extension| {
        let path = append_extension(&base, extension);
        if path.exists() && fs::canonicalize(&path)? == fs::canonicalize(&args.image)? {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "The recovered file would overwrite the stego image itself: {}",
                    path.to_string_lossy()
                ),
            ));
        }
        if !force && path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!(
                    "Output file already exists: {}. Use --force to overwrite it.",
                    path.to_string_lossy()
                ),
            ));
        }
        let file = File::create(&path)?;
        created = Some(path);
        Ok(BufWriter::new(file))
    });

    let extracted = match result {
        Ok(extracted) => extracted,
        Err(e) => {
            discard_partial(created.as_deref());
            return Err(e).with_context(|| {
                format!(
                    "Failed to recover the hidden file from '{}'. \nThe image may not contain a hidden file or is corrupted.",
                    args.image.to_string_lossy().red().bold()
                )
            });
        }
    };

    let path = append_extension(&base, &extracted.extension);
    info(format!(
        "Recovered {} bytes with extension {}",
        extracted.payload_len,
        extracted.extension.green()
    ));
    println!(
        "The file has been successfully recovered and saved: {}",
        path.to_string_lossy().green().bold()
    );

    Ok(path)
}
