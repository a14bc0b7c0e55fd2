//! PDF 合并 - 业务能力层
//!
//! 把多个已筛选的文档按顺序拼接成一个文件。
//! 单个输入无效时跳过并记录警告，不影响其余文件。

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use lopdf::{dictionary, Document, Object};
use tracing::{debug, error, warn, Span};

use crate::error::{DocumentError, MergeError};
use crate::infrastructure::PdfDocument;

/// 合并结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// 输出文件
    pub output: PathBuf,
    /// 合并后的总页数
    pub page_count: usize,
    /// 实际参与合并的输入
    pub merged_inputs: Vec<PathBuf>,
    /// 被跳过的无效输入
    pub skipped_inputs: Vec<PathBuf>,
}

/// PDF 合并器
///
/// 职责：
/// - 逐个校验输入文件
/// - 按输入顺序拼接所有页面
/// - 一次性写出并校验输出文件
/// - 失败时删除残留的输出文件
pub struct PdfMerger {
    span: Span,
}

impl PdfMerger {
    pub fn new(span: Span) -> Self {
        Self { span }
    }

    /// 合并 PDF
    ///
    /// # 参数
    /// - `inputs`: 待合并的文件，按最终顺序排列
    /// - `output`: 输出文件路径
    ///
    /// # 返回
    /// 返回合并结果；没有任何有效输入时返回 [`MergeError::NoValidInputs`]
    pub fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<MergeReport, MergeError> {
        let _enter = self.span.enter();
        debug!("开始合并 {} 个文件", inputs.len());

        let mut guard = OutputGuard::new(output);
        let result = self.merge_inner(inputs, output);
        match &result {
            Ok(_) => guard.commit(),
            Err(e) => error!("PDF 合并失败: {}", e),
        }
        result
    }

    fn merge_inner(&self, inputs: &[PathBuf], output: &Path) -> Result<MergeReport, MergeError> {
        if inputs.is_empty() {
            error!("没有提供需要合并的文件");
            return Err(MergeError::NoValidInputs);
        }

        let mut documents = Vec::new();
        let mut merged_inputs = Vec::new();
        let mut skipped_inputs = Vec::new();

        for path in inputs {
            match validate_input(path) {
                Ok(doc) => {
                    debug!("有效文件: {} ({} 页)", path.display(), doc.page_count());
                    documents.push(doc);
                    merged_inputs.push(path.clone());
                }
                Err(e) => {
                    warn!("跳过无效或损坏的 PDF {}: {}", path.display(), e);
                    skipped_inputs.push(path.clone());
                }
            }
        }

        if documents.is_empty() {
            error!("没有可合并的有效文件");
            return Err(MergeError::NoValidInputs);
        }
        if !skipped_inputs.is_empty() {
            warn!(
                "{} 个文件中只有 {} 个有效",
                inputs.len(),
                documents.len()
            );
        }

        let mut merged = concatenate(documents);
        let page_count = merged.get_pages().len();

        write_once(&mut merged, output)?;
        verify_output(output)?;

        debug!(
            "合并完成: {} ({} 页, {} 个文件)",
            output.display(),
            page_count,
            merged_inputs.len()
        );

        Ok(MergeReport {
            output: output.to_path_buf(),
            page_count,
            merged_inputs,
            skipped_inputs,
        })
    }
}

/// 校验单个输入：存在、非空、可解析、至少一页且第一页可读
fn validate_input(path: &Path) -> Result<PdfDocument, DocumentError> {
    let metadata = fs::metadata(path).map_err(|_| DocumentError::NotFound {
        path: path.to_path_buf(),
    })?;
    if metadata.len() == 0 {
        return Err(DocumentError::Empty {
            path: path.to_path_buf(),
        });
    }

    let doc = PdfDocument::load(path)?;
    if doc.page_count() == 0 {
        return Err(DocumentError::NoPages {
            origin: doc.origin().to_string(),
        });
    }
    doc.page(1)?;
    Ok(doc)
}

/// 把所有文档的页面挂到同一个页面树下
///
/// 每个文档的对象先整体重新编号，避免 ID 冲突；
/// 页面按文档顺序、文档内页码顺序排列。
fn concatenate(documents: Vec<PdfDocument>) -> Document {
    let mut merged = Document::with_version("1.5");
    let mut next_id = 1;
    let mut kids: Vec<Object> = Vec::new();
    let mut pages = Vec::new();

    for mut doc in documents {
        next_id = doc.renumber_from(next_id) + 1;

        let (inner, doc_pages) = doc.into_pages();
        for (page_id, dict) in doc_pages {
            kids.push(page_id.into());
            pages.push((page_id, dict));
        }

        for (object_id, object) in inner.objects {
            match object.type_name().unwrap_or_default() {
                "Catalog" | "Pages" | "Page" | "Outlines" | "Outline" => {}
                _ => {
                    merged.objects.insert(object_id, object);
                }
            }
        }
    }

    merged.max_id = next_id;
    let pages_id = merged.new_object_id();

    for (page_id, mut dict) in pages {
        dict.set("Parent", pages_id);
        merged.objects.insert(page_id, Object::Dictionary(dict));
    }

    let count = kids.len() as i64;
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);
    merged.compress();
    merged
}

/// 先写入同目录的临时文件，完成后一次性移动到目标路径
fn write_once(doc: &mut Document, output: &Path) -> Result<(), MergeError> {
    let dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| MergeError::io(&dir, e))?;

    let temp = tempfile::Builder::new()
        .prefix(".merge_")
        .suffix(".pdf")
        .tempfile_in(&dir)
        .map_err(|e| MergeError::io(&dir, e))?;

    {
        let mut writer = BufWriter::new(temp.as_file());
        doc.save_to(&mut writer)
            .map_err(|e| DocumentError::write_failed(temp.path(), e))?;
        writer.flush().map_err(|e| MergeError::io(temp.path(), e))?;
    }

    temp.persist(output)
        .map_err(|e| MergeError::io(output, e.error))?;
    Ok(())
}

/// 写入后必须存在且非空
fn verify_output(output: &Path) -> Result<(), MergeError> {
    match fs::metadata(output) {
        Ok(meta) if meta.len() > 0 => Ok(()),
        _ => Err(MergeError::WriteVerificationFailed {
            path: output.to_path_buf(),
        }),
    }
}

/// 输出文件守卫：未提交就离开作用域时删除本次调用产生的输出文件
///
/// 调用前已经存在的文件不归本次调用所有，不会被删除。
struct OutputGuard<'a> {
    path: &'a Path,
    armed: bool,
    committed: bool,
}

impl<'a> OutputGuard<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            armed: !path.exists(),
            committed: false,
        }
    }

    fn commit(&mut self) {
        self.committed = true;
    }
}

impl Drop for OutputGuard<'_> {
    fn drop(&mut self) {
        if !self.armed || self.committed || !self.path.exists() {
            return;
        }
        match fs::remove_file(self.path) {
            Ok(()) => debug!("已删除不完整的输出文件: {}", self.path.display()),
            Err(e) => warn!("删除不完整的输出文件失败 {}: {}", self.path.display(), e),
        }
    }
}
