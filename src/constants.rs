/// BMP 文件的标准头部大小 (字节)。
/// 隐写操作将跳过这个头部，从像素数据开始。
pub const BMP_HEADER_SIZE: usize = 54;

/// 图像宽度在 BMP 头部中的偏移量 (小端 32 位)。
pub const WIDTH_OFFSET: usize = 18;

/// 图像高度在 BMP 头部中的偏移量 (小端 32 位)。
pub const HEIGHT_OFFSET: usize = 22;

/// 每像素位数在 BMP 头部中的偏移量 (小端 16 位)。
pub const BITS_PER_PIXEL_OFFSET: usize = 28;

/// 唯一支持的色深。
pub const SUPPORTED_BIT_DEPTH: u16 = 24;

/// 24 位 BMP 中每个像素占用的字节数。
pub const BYTES_PER_PIXEL: u64 = 3;

/// 写在像素数据最前面的魔数标记，解码时用来确认图像确实含有隐藏记录。
pub const MAGIC_MARKER: &[u8; 2] = b"#*";

/// 隐写单个字节所需的载体字节数。
/// 每个载体字节只存储 1 bit (最低有效位)，因此需要 8 个。
pub const CARRIER_BYTES_PER_BYTE: usize = 8;

/// 长度字段按 32 位整数存储，占用 4 个逻辑字节。
pub const INT_FIELD_SIZE: u64 = 4;

/// 隐写一个 32 位整数所需的载体字节数 (32 bits → 32 个载体字节)。
pub const CARRIER_BYTES_PER_INT: usize = 32;

/// 扩展名的最大长度。
/// 记录格式本身没有上限，这里限制它以免畸形图像导致无界分配。
pub const MAX_EXTENSION_LEN: usize = 255;

/// 未指定输出路径时生成的隐写图像文件名。
pub const DEFAULT_STEGO_NAME: &str = "stego.bmp";

/// 未指定输出路径时恢复文件使用的基础文件名 (扩展名由记录决定)。
pub const DEFAULT_SECRET_STEM: &str = "secret_op";
