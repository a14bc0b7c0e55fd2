//! 查询构建 - 业务能力层
//!
//! 纯函数，不做占位符替换

use url::Url;

use crate::models::SearchQuery;

/// 查询构建器
///
/// 生成 `site:<host> title:<title> "<keyword>"` 形式的查询语句
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    site_host: String,
}

impl QueryBuilder {
    /// # 参数
    /// - `site`: 站点地址，如 `https://www.examtopics.com`
    pub fn new(site: &str) -> Self {
        Self {
            site_host: site_host(site),
        }
    }

    pub fn site_host(&self) -> &str {
        &self.site_host
    }

    pub fn build(&self, keyword: &str, title: &str, required_substring: &str) -> SearchQuery {
        let text = format!("site:{} title:{} \"{}\"", self.site_host, title, keyword);
        SearchQuery {
            keyword: keyword.to_string(),
            title: title.to_string(),
            required_substring: required_substring.to_string(),
            text,
        }
    }
}

/// 从站点地址提取主机名并去掉 `www.` 前缀，无法解析时原样返回
fn site_host(site: &str) -> String {
    let trimmed = site.trim();
    let host = Url::parse(trimmed)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| trimmed.trim_end_matches('/').to_string());
    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query() {
        let builder = QueryBuilder::new("https://www.examtopics.com");
        let query = builder.build(
            "saa-c03 topic 1 question 5",
            "SAA-C03 topic 1 question 5 discussion",
            "saa-c03",
        );

        assert_eq!(
            query.text,
            "site:examtopics.com title:SAA-C03 topic 1 question 5 discussion \"saa-c03 topic 1 question 5\""
        );
        assert_eq!(query.keyword, "saa-c03 topic 1 question 5");
        assert_eq!(query.title, "SAA-C03 topic 1 question 5 discussion");
        assert_eq!(query.required_substring, "saa-c03");
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = QueryBuilder::new("https://www.examtopics.com");
        assert_eq!(builder.build("k", "t", "s"), builder.build("k", "t", "s"));
    }

    #[test]
    fn test_site_host_variants() {
        assert_eq!(QueryBuilder::new("https://www.examtopics.com/").site_host(), "examtopics.com");
        assert_eq!(QueryBuilder::new("http://examtopics.com").site_host(), "examtopics.com");
        assert_eq!(QueryBuilder::new("examtopics.com").site_host(), "examtopics.com");
        assert_eq!(QueryBuilder::new("www.examtopics.com/").site_host(), "examtopics.com");
    }
}
