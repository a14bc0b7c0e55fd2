//! 集成测试共用的假组件和 PDF 构造工具

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lopdf::{dictionary, Document, Object};

use dumps_search::error::{ProviderError, RenderError};
use dumps_search::models::SearchResult;
use dumps_search::services::{Renderer, SearchProvider};
use dumps_search::PdfDocument;

/// 生成 `count` 页的 PDF，每页带有 `Label` = 页码
pub fn labeled_pdf(count: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for n in 1..=count {
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Label" => n as i64,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count as i64,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// 按页码顺序读出每页的 `Label`
pub fn labels(doc: &PdfDocument) -> Vec<i64> {
    (1..=doc.page_count() as u32)
        .map(|n| {
            doc.page(n)
                .unwrap()
                .get(b"Label")
                .and_then(|o| o.as_i64())
                .unwrap()
        })
        .collect()
}

/// 按查询语句中的关键词返回预设结果的搜索引擎
///
/// 没有命中任何关键词时返回空结果。
pub struct FakeProvider {
    pub answers: Vec<(String, Vec<SearchResult>)>,
    pub calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new(answers: Vec<(&str, Vec<&str>)>) -> Self {
        Self {
            answers: answers
                .into_iter()
                .map(|(needle, urls)| {
                    (
                        needle.to_string(),
                        urls.into_iter().map(SearchResult::new).collect(),
                    )
                })
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for FakeProvider {
    async fn search(
        &self,
        text: &str,
        _max_results: usize,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .answers
            .iter()
            .find(|(needle, _)| text.contains(needle.as_str()))
            .map(|(_, results)| results.clone())
            .unwrap_or_default())
    }
}

/// 按 URL 返回预设 PDF 的渲染器，未知 URL 视为渲染失败
pub struct FakeRenderer {
    pub pages: HashMap<String, Vec<u8>>,
}

impl FakeRenderer {
    pub fn new(pages: Vec<(&str, Vec<u8>)>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|(url, bytes)| (url.to_string(), bytes))
                .collect(),
        }
    }
}

#[async_trait]
impl Renderer for FakeRenderer {
    async fn render(&self, url: &str) -> Result<Vec<u8>, RenderError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| RenderError::EmptyOutput {
                url: url.to_string(),
            })
    }
}
