pub mod connection;
pub mod headless;

pub use connection::connect_to_browser;
pub use headless::launch_headless_browser;

use anyhow::Result;
use chromiumoxide::{Browser, Page};

use crate::config::BrowserSettings;

/// 浏览器会话
///
/// `launched` 为 true 表示浏览器由本程序启动，结束时需要关闭。
pub struct BrowserSession {
    pub browser: Browser,
    pub page: Page,
    pub launched: bool,
}

/// 按配置获取浏览器：设置了调试端口则连接，否则启动无头浏览器
pub async fn acquire(settings: &BrowserSettings) -> Result<BrowserSession> {
    match settings.debug_port {
        Some(port) => {
            let (browser, page) = connect_to_browser(port).await?;
            Ok(BrowserSession {
                browser,
                page,
                launched: false,
            })
        }
        None => {
            let (browser, page) =
                launch_headless_browser(settings.chrome_executable.as_deref()).await?;
            Ok(BrowserSession {
                browser,
                page,
                launched: true,
            })
        }
    }
}
