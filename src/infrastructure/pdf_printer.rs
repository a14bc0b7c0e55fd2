//! PDF 打印器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"把网页打印成 PDF"的能力

use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use tracing::debug;

/// PDF 打印器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 print() 能力
/// - 不认识题目 / 考试
/// - 不处理业务流程
pub struct PdfPrinter {
    page: Page,
}

impl PdfPrinter {
    /// 创建新的打印器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 打开 URL 并打印为 PDF
    ///
    /// # 参数
    /// - `url`: 要打印的网页地址
    ///
    /// # 返回
    /// 返回 PDF 文件内容
    pub async fn print(&self, url: &str) -> Result<Vec<u8>, CdpError> {
        debug!("正在打开页面: {}", url);
        self.page.goto(url).await?;
        self.page.wait_for_navigation().await?;

        let params = PrintToPdfParams {
            print_background: Some(true),
            ..Default::default()
        };
        let bytes = self.page.pdf(params).await?;
        debug!("页面打印完成: {} ({} 字节)", url, bytes.len());
        Ok(bytes)
    }

    /// 关闭页面
    pub async fn close(self) -> Result<(), CdpError> {
        self.page.close().await
    }
}
