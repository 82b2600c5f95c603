//! 模块映像文件头
//!
//! 部署目录中的模块映像以固定的文件头开始：
//!
//! | 偏移 | 长度 | 内容 |
//! |------|------|------|
//! | 0 | 4 | 魔数 `IOCM` |
//! | 4 | 1 | 格式版本，当前为 1 |
//! | 5 | 2 | 身份名称长度，小端 `u16` |
//! | 7 | n | UTF-8 身份名称（模块完整名称） |
//!
//! 读取身份时只读文件头，不加载模块。

use ioc_common::{DiscoveryError, DiscoveryResult};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// 文件头魔数
pub const MAGIC: &[u8; 4] = b"IOCM";

/// 当前格式版本
pub const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = 7;

/// 模块映像
pub struct ModuleImage;

impl ModuleImage {
    /// 读取映像的身份名称
    ///
    /// 文件不可读时返回 [`DiscoveryError::Io`]，文件头损坏时返回
    /// [`DiscoveryError::BadImageFormat`]。
    pub fn read_identity(path: &Path) -> DiscoveryResult<String> {
        let io_error = |source: io::Error| DiscoveryError::Io {
            path: path.to_path_buf(),
            source,
        };
        let bad_format = |reason: &str| DiscoveryError::BadImageFormat {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let mut file = File::open(path).map_err(io_error)?;

        let mut header = [0_u8; HEADER_LEN];
        read_exact_or(&mut file, &mut header, || bad_format("文件头不完整"))
            .map_err(|e| e.into_discovery(io_error))?;

        if &header[..4] != MAGIC {
            return Err(bad_format("魔数不匹配"));
        }
        if header[4] != FORMAT_VERSION {
            return Err(bad_format(&format!("不支持的格式版本 {}", header[4])));
        }

        let length = usize::from(u16::from_le_bytes([header[5], header[6]]));
        if length == 0 {
            return Err(bad_format("身份名称为空"));
        }

        let mut identity = vec![0_u8; length];
        read_exact_or(&mut file, &mut identity, || bad_format("身份名称被截断"))
            .map_err(|e| e.into_discovery(io_error))?;

        String::from_utf8(identity).map_err(|_| bad_format("身份名称不是有效的 UTF-8"))
    }

    /// 写出只含文件头的映像，供打包工具与测试使用
    pub fn write(path: &Path, identity: &str) -> DiscoveryResult<()> {
        let io_error = |source: io::Error| DiscoveryError::Io {
            path: path.to_path_buf(),
            source,
        };

        let length = u16::try_from(identity.len()).map_err(|_| DiscoveryError::BadImageFormat {
            path: path.to_path_buf(),
            reason: format!("身份名称过长: {} 字节", identity.len()),
        })?;

        let mut file = File::create(path).map_err(io_error)?;
        file.write_all(MAGIC).map_err(io_error)?;
        file.write_all(&[FORMAT_VERSION]).map_err(io_error)?;
        file.write_all(&length.to_le_bytes()).map_err(io_error)?;
        file.write_all(identity.as_bytes()).map_err(io_error)?;
        file.flush().map_err(io_error)
    }
}

enum ReadFailure {
    Truncated(DiscoveryError),
    Io(io::Error),
}

impl ReadFailure {
    fn into_discovery(self, io_error: impl FnOnce(io::Error) -> DiscoveryError) -> DiscoveryError {
        match self {
            Self::Truncated(error) => error,
            Self::Io(source) => io_error(source),
        }
    }
}

fn read_exact_or(
    reader: &mut impl Read,
    buffer: &mut [u8],
    truncated: impl FnOnce() -> DiscoveryError,
) -> Result<(), ReadFailure> {
    match reader.read_exact(buffer) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(ReadFailure::Truncated(truncated())),
        Err(e) => Err(ReadFailure::Io(e)),
    }
}
