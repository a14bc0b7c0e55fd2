//! PDF 文档读写 - 基础设施层
//!
//! 对 `lopdf` 的薄封装，只暴露"按页码读写"的能力

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::DocumentError;

/// 可以从父节点继承的页面属性
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// 分页文档
///
/// 页码从 1 开始且连续，页数等于 `page_count()`。
#[derive(Debug)]
pub struct PdfDocument {
    inner: Document,
    origin: String,
}

impl PdfDocument {
    /// 从文件加载
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let origin = path.display().to_string();
        let inner = Document::load(path).map_err(|e| DocumentError::corrupt(&origin, e))?;
        Ok(Self { inner, origin })
    }

    /// 从内存加载
    pub fn from_bytes(bytes: &[u8], origin: impl Into<String>) -> Result<Self, DocumentError> {
        let origin = origin.into();
        let inner = Document::load_mem(bytes).map_err(|e| DocumentError::corrupt(&origin, e))?;
        Ok(Self { inner, origin })
    }

    /// 来源描述（文件路径或 URL），用于日志
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// 读取第 `index` 页（从 1 开始）的页面字典
    pub fn page(&self, index: u32) -> Result<&Dictionary, DocumentError> {
        let pages = self.inner.get_pages();
        let page_id = pages
            .get(&index)
            .copied()
            .ok_or(DocumentError::PageOutOfRange {
                index,
                page_count: pages.len(),
            })?;
        self.inner
            .get_dictionary(page_id)
            .map_err(|e| DocumentError::corrupt(&self.origin, e))
    }

    /// 只保留给定页码，其余页面删除，保留页的相对顺序不变
    pub fn retain_pages(&mut self, keep: &[u32]) {
        let keep: BTreeSet<u32> = keep.iter().copied().collect();
        let drop: Vec<u32> = self
            .inner
            .get_pages()
            .keys()
            .copied()
            .filter(|n| !keep.contains(n))
            .collect();

        if drop.is_empty() {
            return;
        }
        self.inner.delete_pages(&drop);
        self.inner.prune_objects();
    }

    /// 保存到文件
    pub fn save(&mut self, path: &Path) -> Result<(), DocumentError> {
        let file = File::create(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.inner
            .save_to(&mut writer)
            .map_err(|e| DocumentError::write_failed(path, e))?;
        writer.flush().map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    /// 从 `start` 开始重新编号所有对象，返回编号后的最大对象号
    pub(crate) fn renumber_from(&mut self, start: u32) -> u32 {
        self.inner.renumber_objects_with(start);
        self.inner.max_id
    }

    /// 按页码顺序取出所有页面，继承属性已展开到页面字典上
    ///
    /// 用于把页面挂到新的页面树下。
    pub(crate) fn into_pages(self) -> (Document, Vec<(ObjectId, Dictionary)>) {
        let doc = self.inner;
        let pages = doc
            .get_pages()
            .into_values()
            .filter_map(|page_id| {
                let mut dict = doc.get_dictionary(page_id).ok()?.clone();
                flatten_inherited(&doc, &mut dict);
                Some((page_id, dict))
            })
            .collect();
        (doc, pages)
    }
}

/// 把父节点上的可继承属性复制到页面字典
fn flatten_inherited(doc: &Document, page: &mut Dictionary) {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    // 防止损坏文件中的循环引用
    let mut depth = 0;

    while let Some(parent_id) = parent {
        if depth > 32 {
            break;
        }
        depth += 1;

        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE_ATTRIBUTES {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    use super::PdfDocument;

    /// 生成 `count` 页的 PDF，每页带有 `Label` = 页码，便于断言页面顺序
    pub fn labeled_document(count: u32) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for n in 1..=count {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(format!("page {}", n))]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Label" => n as i64,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    pub fn labeled_bytes(count: u32) -> Vec<u8> {
        let mut doc = labeled_document(count);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    pub fn labeled(count: u32) -> PdfDocument {
        PdfDocument::from_bytes(&labeled_bytes(count), format!("fixture-{}", count)).unwrap()
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
}

#[cfg(test)]
mod tests {
    use super::fixtures::{labeled, labeled_bytes, labels};
    use super::*;

    #[test]
    fn test_page_count_and_access() {
        let doc = labeled(4);
        assert_eq!(doc.page_count(), 4);
        assert_eq!(labels(&doc), vec![1, 2, 3, 4]);
        assert!(matches!(
            doc.page(5),
            Err(DocumentError::PageOutOfRange {
                index: 5,
                page_count: 4
            })
        ));
        assert!(doc.page(0).is_err());
    }

    #[test]
    fn test_garbage_bytes_are_corrupt() {
        let result = PdfDocument::from_bytes(b"definitely not a pdf", "garbage");
        assert!(matches!(result, Err(DocumentError::Corrupt { .. })));
    }

    #[test]
    fn test_retain_pages_keeps_order() {
        let mut doc = labeled(6);
        doc.retain_pages(&[5, 3, 4]);
        assert_eq!(doc.page_count(), 3);
        assert_eq!(labels(&doc), vec![3, 4, 5]);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");

        let mut doc = labeled(3);
        doc.retain_pages(&[2, 3]);
        doc.save(&path).unwrap();

        let reloaded = PdfDocument::load(&path).unwrap();
        assert_eq!(labels(&reloaded), vec![2, 3]);
        assert_eq!(reloaded.origin(), path.display().to_string());
    }

    #[test]
    fn test_renumber_from_shifts_object_ids() {
        let mut doc = labeled(2);
        let max_id = doc.renumber_from(100);
        assert!(max_id >= 100);
        assert_eq!(labels(&doc), vec![1, 2]);
    }

    #[test]
    fn test_into_pages_flattens_inherited_attributes() {
        let doc = PdfDocument::from_bytes(&labeled_bytes(2), "fixture").unwrap();
        let (_, pages) = doc.into_pages();
        assert_eq!(pages.len(), 2);
        for (_, dict) in &pages {
            assert!(dict.has(b"MediaBox"));
            assert!(dict.has(b"Resources"));
        }
    }
}
