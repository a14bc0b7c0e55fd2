//! 网页渲染 - 业务能力层
//!
//! 把 URL 渲染成 PDF，所有失败都转换成 [`RenderError`]

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, info, warn, Instrument, Span};
use url::Url;

use crate::browser::BrowserSession;
use crate::error::RenderError;
use crate::infrastructure::PdfPrinter;

/// 渲染器
#[async_trait]
pub trait Renderer: Send + Sync {
    /// 渲染 URL，返回 PDF 文件内容
    async fn render(&self, url: &str) -> Result<Vec<u8>, RenderError>;
}

/// 基于 Chromium 的渲染器
///
/// 持有浏览器会话，结束时需要调用 [`BrowserRenderer::shutdown`]
pub struct BrowserRenderer {
    browser: chromiumoxide::Browser,
    printer: PdfPrinter,
    launched: bool,
    render_timeout: Duration,
    span: Span,
}

impl BrowserRenderer {
    pub fn new(session: BrowserSession, render_timeout: Duration, span: Span) -> Self {
        Self {
            browser: session.browser,
            printer: PdfPrinter::new(session.page),
            launched: session.launched,
            render_timeout,
            span,
        }
    }

    /// 关闭页面；浏览器由本程序启动时一并关闭
    pub async fn shutdown(self) {
        let BrowserRenderer {
            mut browser,
            printer,
            launched,
            ..
        } = self;

        if let Err(e) = printer.close().await {
            warn!("关闭页面失败: {}", e);
        }
        if launched {
            if let Err(e) = browser.close().await {
                warn!("关闭浏览器失败: {}", e);
            }
            if let Err(e) = browser.wait().await {
                warn!("等待浏览器退出失败: {}", e);
            }
            info!("浏览器已关闭");
        }
    }

    async fn render_inner(&self, url: &str) -> Result<Vec<u8>, RenderError> {
        if !is_absolute_url(url) {
            return Err(RenderError::InvalidUrl(url.to_string()));
        }

        info!("正在渲染: {}", url);
        let bytes = timeout(self.render_timeout, self.printer.print(url))
            .await
            .map_err(|_| RenderError::Timeout {
                url: url.to_string(),
                secs: self.render_timeout.as_secs(),
            })?
            .map_err(|source| RenderError::Browser {
                url: url.to_string(),
                source,
            })?;

        if bytes.is_empty() {
            return Err(RenderError::EmptyOutput {
                url: url.to_string(),
            });
        }

        debug!("渲染完成: {} 字节", bytes.len());
        Ok(bytes)
    }
}

#[async_trait]
impl Renderer for BrowserRenderer {
    async fn render(&self, url: &str) -> Result<Vec<u8>, RenderError> {
        self.render_inner(url).instrument(self.span.clone()).await
    }
}

fn is_absolute_url(url: &str) -> bool {
    Url::parse(url)
        .map(|u| !u.scheme().is_empty() && u.host_str().map_or(false, |h| !h.is_empty()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("https://www.examtopics.com/discussions/1"));
        assert!(!is_absolute_url("www.examtopics.com/discussions/1"));
        assert!(!is_absolute_url("file:///tmp/page.html"));
        assert!(!is_absolute_url(""));
    }

    #[tokio::test]
    #[ignore] // 需要本机安装 Chrome / Chromium：cargo test -- --ignored
    async fn test_render_real_page() {
        let session = crate::browser::acquire(&crate::config::BrowserSettings::default())
            .await
            .expect("启动浏览器失败");
        let renderer = BrowserRenderer::new(session, Duration::from_secs(60), Span::none());

        let bytes = renderer.render("https://example.com/").await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        renderer.shutdown().await;
    }
}
