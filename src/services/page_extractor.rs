//! 页码提取 - 业务能力层
//!
//! 从渲染好的文档中只保留答案所在的几页

use serde::Deserialize;
use tracing::{debug, Span};

use crate::error::{ConfigError, DocumentError};
use crate::infrastructure::PdfDocument;

/// 页码筛选策略
///
/// 页数小于 `fallback_threshold` 时保留全部页面，
/// 否则保留 `min_page..=min(max_page, 页数)`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageSelection {
    pub min_page: u32,
    pub max_page: u32,
    pub fallback_threshold: u32,
}

impl Default for PageSelection {
    fn default() -> Self {
        Self {
            min_page: 3,
            max_page: 5,
            fallback_threshold: 3,
        }
    }
}

impl PageSelection {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_page == 0 || self.min_page > self.max_page {
            return Err(ConfigError::InvalidPageSelection {
                min_page: self.min_page,
                max_page: self.max_page,
            });
        }
        Ok(())
    }

    /// 计算要保留的页码（从 1 开始，升序）
    pub fn select(&self, page_count: usize) -> Vec<u32> {
        let count = u32::try_from(page_count).unwrap_or(u32::MAX);
        let all = || (1..=count).collect::<Vec<u32>>();

        if count < self.fallback_threshold || self.min_page > count {
            return all();
        }
        (self.min_page..=self.max_page.min(count)).collect()
    }
}

/// 页码提取器
pub struct PageExtractor {
    selection: PageSelection,
    span: Span,
}

impl PageExtractor {
    pub fn new(selection: PageSelection, span: Span) -> Self {
        Self { selection, span }
    }

    /// 按策略筛选页面，保留页的顺序与原文档一致
    pub fn extract(&self, mut doc: PdfDocument) -> Result<PdfDocument, DocumentError> {
        let _enter = self.span.enter();

        let page_count = doc.page_count();
        let keep = self.selection.select(page_count);
        debug!(
            "{}: 共 {} 页, 保留 {:?}",
            doc.origin(),
            page_count,
            keep
        );

        if keep.len() < page_count {
            doc.retain_pages(&keep);
        }
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::pdf_document::fixtures::{labeled, labels};

    fn extractor() -> PageExtractor {
        PageExtractor::new(PageSelection::default(), Span::none())
    }

    #[test]
    fn test_short_documents_are_unchanged() {
        let selection = PageSelection::default();
        assert_eq!(selection.select(0), Vec::<u32>::new());
        assert_eq!(selection.select(1), vec![1]);
        assert_eq!(selection.select(2), vec![1, 2]);
    }

    #[test]
    fn test_default_window() {
        let selection = PageSelection::default();
        assert_eq!(selection.select(3), vec![3]);
        assert_eq!(selection.select(4), vec![3, 4]);
        assert_eq!(selection.select(5), vec![3, 4, 5]);
        assert_eq!(selection.select(6), vec![3, 4, 5]);
        assert_eq!(selection.select(40), vec![3, 4, 5]);
    }

    #[test]
    fn test_window_size_formula() {
        let selection = PageSelection::default();
        for count in 3..=20usize {
            let expected = count.min(5) - 3 + 1;
            assert_eq!(selection.select(count).len(), expected, "page_count={}", count);
        }
    }

    #[test]
    fn test_custom_selection() {
        let selection = PageSelection {
            min_page: 2,
            max_page: 3,
            fallback_threshold: 4,
        };
        assert_eq!(selection.select(3), vec![1, 2, 3]);
        assert_eq!(selection.select(4), vec![2, 3]);
        assert_eq!(selection.select(10), vec![2, 3]);
    }

    #[test]
    fn test_min_page_beyond_document_keeps_everything() {
        let selection = PageSelection {
            min_page: 5,
            max_page: 8,
            fallback_threshold: 1,
        };
        assert_eq!(selection.select(3), vec![1, 2, 3]);
    }

    #[test]
    fn test_validate() {
        assert!(PageSelection::default().validate().is_ok());
        assert!(PageSelection {
            min_page: 0,
            max_page: 5,
            fallback_threshold: 3
        }
        .validate()
        .is_err());
        assert!(PageSelection {
            min_page: 6,
            max_page: 5,
            fallback_threshold: 3
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_extract_six_pages() {
        let doc = extractor().extract(labeled(6)).unwrap();
        assert_eq!(labels(&doc), vec![3, 4, 5]);
    }

    #[test]
    fn test_extract_four_pages() {
        let doc = extractor().extract(labeled(4)).unwrap();
        assert_eq!(labels(&doc), vec![3, 4]);
    }

    #[test]
    fn test_extract_three_pages() {
        let doc = extractor().extract(labeled(3)).unwrap();
        assert_eq!(labels(&doc), vec![3]);
    }

    #[test]
    fn test_extract_two_pages_unchanged() {
        let doc = extractor().extract(labeled(2)).unwrap();
        assert_eq!(labels(&doc), vec![1, 2]);
    }
}
