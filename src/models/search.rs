/// 一次搜索请求
///
/// 每道题构建一次，构建后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// 搜索关键词（占位符已替换）
    pub keyword: String,
    /// 页面标题（占位符已替换）
    pub title: String,
    /// 结果 URL 中必须包含的子串
    pub required_substring: String,
    /// 发送给搜索引擎的完整查询语句
    pub text: String,
}

/// 搜索引擎返回的一条结果
///
/// 只有 `url` 参与匹配，`title` 仅用于日志。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
}

impl SearchResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
        }
    }

    pub fn with_title(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}
