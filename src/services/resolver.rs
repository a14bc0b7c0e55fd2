//! URL 解析 - 业务能力层
//!
//! 把一次搜索请求变成零或一个经过校验的 URL

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn, Instrument, Span};
use url::Url;

use crate::config::SearchSettings;
use crate::error::{ProviderError, SearchError};
use crate::models::{SearchQuery, SearchResult};
use crate::services::SearchProvider;

/// URL 解析器
///
/// 职责：
/// - 调用搜索引擎，临时失败时以固定间隔重试
/// - 按搜索引擎返回的顺序挑出第一个合格的 URL
/// - 只处理单个查询，不关心题号和流程
pub struct Resolver {
    provider: Arc<dyn SearchProvider>,
    max_results: usize,
    max_attempts: usize,
    retry_delay: Duration,
    span: Span,
}

impl Resolver {
    /// 创建解析器
    ///
    /// # 参数
    /// - `provider`: 搜索引擎
    /// - `settings`: 结果数上限、重试次数和间隔
    /// - `span`: 日志上下文
    pub fn new(provider: Arc<dyn SearchProvider>, settings: &SearchSettings, span: Span) -> Self {
        Self {
            provider,
            max_results: settings.max_results,
            max_attempts: settings.retry_attempts.max(1),
            retry_delay: settings.retry_delay(),
            span,
        }
    }

    /// 解析查询
    ///
    /// # 返回
    /// - `Ok(Some(url))`: 找到合格的 URL
    /// - `Ok(None)`: 搜索成功但没有合格结果
    /// - `Err(ProviderExhausted)`: 所有尝试均失败
    pub async fn resolve(&self, query: &SearchQuery) -> Result<Option<String>, SearchError> {
        self.resolve_inner(query)
            .instrument(self.span.clone())
            .await
    }

    async fn resolve_inner(&self, query: &SearchQuery) -> Result<Option<String>, SearchError> {
        debug!("搜索语句: {}", query.text);

        let results = self.search_with_retry(&query.text).await?;
        if results.is_empty() {
            warn!("没有搜索结果: {}", query.text);
            return Ok(None);
        }

        let url = first_valid_url(&results, &query.required_substring);
        match &url {
            Some(u) => debug!("找到有效 URL: {}", u),
            None => warn!("没有符合条件的 URL: {}", query.text),
        }
        Ok(url)
    }

    /// 带重试的搜索，只要有一次成功就不再重试
    async fn search_with_retry(&self, text: &str) -> Result<Vec<SearchResult>, SearchError> {
        let mut last_error: Option<ProviderError> = None;

        for attempt in 1..=self.max_attempts {
            debug!("第 {}/{} 次搜索", attempt, self.max_attempts);

            match self.provider.search(text, self.max_results).await {
                Ok(results) => {
                    debug!("获取到 {} 条搜索结果", results.len());
                    return Ok(results);
                }
                Err(e) => {
                    warn!("第 {}/{} 次搜索失败: {}", attempt, self.max_attempts, e);
                    last_error = Some(e);

                    if attempt < self.max_attempts {
                        debug!("{:?} 后重试...", self.retry_delay);
                        sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(SearchError::ProviderExhausted {
            attempts: self.max_attempts,
            last_error: last_error
                .unwrap_or_else(|| ProviderError::Request("没有进行任何搜索".to_string())),
        })
    }
}

/// 按顺序返回第一个合格的 URL，不做任何排序
pub fn first_valid_url(results: &[SearchResult], required_substring: &str) -> Option<String> {
    results
        .iter()
        .map(|r| r.url.as_str())
        .find(|url| is_valid_url(url, required_substring))
        .map(str::to_string)
}

/// URL 必须带有协议和主机，并且包含指定子串（不区分大小写）
pub fn is_valid_url(url: &str, required_substring: &str) -> bool {
    if url.is_empty() || required_substring.is_empty() {
        return false;
    }

    let Ok(parsed) = Url::parse(url) else {
        debug!("URL 无法解析: {}", url);
        return false;
    };
    if parsed.scheme().is_empty() || parsed.host_str().map_or(true, str::is_empty) {
        return false;
    }

    if url
        .to_lowercase()
        .contains(&required_substring.to_lowercase())
    {
        true
    } else {
        debug!("URL 不包含 '{}': {}", required_substring, url);
        false
    }
}
