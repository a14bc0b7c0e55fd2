//! 临时文档 - 基础设施层
//!
//! 渲染得到的原始 PDF 先写入临时文件，提取完成后立即删除。
//! 离开作用域时无论成功失败都会被删除。

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

const TEMP_PREFIX: &str = "examtopics_";
const TEMP_SUFFIX: &str = ".pdf";

/// 临时 PDF 文件
pub struct TempDocument {
    file: NamedTempFile,
}

impl TempDocument {
    /// 在指定目录下创建临时文件并写入内容
    pub fn create_in(dir: &Path, bytes: &[u8]) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        debug!("创建临时文件: {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// 主动删除临时文件，删除失败只记录警告
    pub fn discard(self) {
        let path = self.file.path().to_path_buf();
        match self.file.close() {
            Ok(()) => debug!("已删除临时文件: {}", path.display()),
            Err(e) => warn!("删除临时文件失败 {}: {}", path.display(), e),
        }
    }
}
