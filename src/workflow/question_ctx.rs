//! 题目处理上下文
//!
//! 封装"我正在处理哪个考试、哪个主题的第几题"这一信息

use std::fmt::Display;
use std::path::PathBuf;

use crate::models::ExamConfig;

/// 题目处理上下文
#[derive(Debug, Clone)]
pub struct QuestionCtx {
    /// 考试代码
    pub exam: String,

    /// 主题编号
    pub topic: u32,

    /// 题号
    pub question: u32,

    /// 页面标题（占位符已替换）
    pub title: String,

    /// 搜索关键词（占位符已替换）
    pub keyword: String,

    /// URL 中必须包含的子串
    pub url_substring: String,

    /// 筛选后的 PDF 保存位置
    pub output_path: PathBuf,
}

impl QuestionCtx {
    /// 根据考试配置创建上下文
    ///
    /// # 参数
    /// - `exam`: 考试配置
    /// - `topic`: 主题编号
    /// - `question`: 题号
    /// - `output_dir`: 输出目录
    pub fn new(exam: &ExamConfig, topic: u32, question: u32, output_dir: &std::path::Path) -> Self {
        Self {
            exam: exam.exam.clone(),
            topic,
            question,
            title: exam.title_for(topic, question),
            keyword: exam.keyword_for(topic, question),
            url_substring: exam.url_substring.clone(),
            output_path: output_dir.join(exam.question_file_name(topic, question)),
        }
    }
}

impl Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} 主题#{} 题目#{}]",
            self.exam, self.topic, self.question
        )
    }
}
