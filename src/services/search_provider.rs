//! 搜索引擎 - 业务能力层
//!
//! 只负责"发出一次搜索"的能力，重试与结果校验由 [`Resolver`](super::Resolver) 负责

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::error::ProviderError;
use crate::models::SearchResult;

const DUCKDUCKGO_HTML_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// 搜索引擎
///
/// 一次调用对应一次网络请求，失败即返回 [`ProviderError`]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(
        &self,
        text: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, ProviderError>;
}

/// DuckDuckGo HTML 搜索
pub struct DuckDuckGoProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl DuckDuckGoProvider {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_endpoint(DUCKDUCKGO_HTML_ENDPOINT)
    }

    /// 使用自定义地址创建
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(
        &self,
        text: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .form(&[("q", text)])
            .header("Accept", "text/html")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::BadStatus {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        if let Some(reason) = detect_challenge(&body) {
            return Err(ProviderError::Blocked(reason.to_string()));
        }

        let results = parse_results(&body, max_results);
        debug!("搜索引擎返回 {} 条结果", results.len());
        Ok(results)
    }
}

/// 解析 DuckDuckGo HTML 结果页
///
/// `Html` 不是 `Send`，所以只在同步函数内使用
pub(crate) fn parse_results(html: &str, max_results: usize) -> Vec<SearchResult> {
    let doc = Html::parse_document(html);
    let (Ok(result_sel), Ok(link_sel)) = (Selector::parse(".result"), Selector::parse("a.result__a"))
    else {
        return Vec::new();
    };

    doc.select(&result_sel)
        .filter_map(|result| {
            let link = result.select(&link_sel).next()?;
            let href = link.value().attr("href")?;
            let title = link.text().collect::<String>().trim().to_string();
            Some(SearchResult::with_title(decode_redirect(href), title))
        })
        .take(max_results)
        .collect()
}

/// DuckDuckGo 会把结果包在跳转链接里：
/// `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`
fn decode_redirect(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    let Ok(parsed) = Url::parse(&absolute) else {
        return href.to_string();
    };
    if !parsed
        .host_str()
        .map_or(false, |h| h.ends_with("duckduckgo.com"))
    {
        return absolute;
    }

    parsed
        .query_pairs()
        .find(|(k, _)| k == "uddg")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(absolute)
}

fn detect_challenge(body: &str) -> Option<&'static str> {
    let lower = body.to_ascii_lowercase();
    if lower.contains("anomaly-modal") || lower.contains("bots use duckduckgo too") {
        return Some("触发了机器人验证");
    }
    if lower.contains("challenge-form") {
        return Some("需要完成验证挑战");
    }
    None
}
