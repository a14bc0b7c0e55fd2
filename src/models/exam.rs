use serde::{Deserialize, Serialize};

/// 主题编号占位符
pub const TOPIC_PLACEHOLDER: &str = "#TOPIC";
/// 题号占位符
pub const QUESTION_PLACEHOLDER: &str = "#QUESTION";

/// 单个考试的搜索模板
///
/// `title` 与 `keyword` 中可以包含 `#TOPIC` 和 `#QUESTION` 占位符，
/// 处理每道题之前由调用方替换。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamConfig {
    /// 考试代码，例如 `saa-c03`
    pub exam: String,
    /// 页面标题模板
    pub title: String,
    /// 搜索关键词模板
    pub keyword: String,
    /// 结果 URL 中必须包含的子串
    pub url_substring: String,
}

impl ExamConfig {
    /// 生成指定主题、题号的页面标题
    pub fn title_for(&self, topic: u32, question: u32) -> String {
        fill_placeholders(&self.title, topic, question)
    }

    /// 生成指定主题、题号的搜索关键词
    pub fn keyword_for(&self, topic: u32, question: u32) -> String {
        fill_placeholders(&self.keyword, topic, question)
    }

    /// 单题 PDF 文件名
    pub fn question_file_name(&self, topic: u32, question: u32) -> String {
        format!("{}_topic{}_question{}.pdf", self.exam, topic, question)
    }

    /// 合并后的 PDF 文件名
    pub fn merged_file_name(&self, topic: u32, begin: u32, end: u32) -> String {
        format!(
            "{}_topic{}_questions{}-{}_merged.pdf",
            self.exam, topic, begin, end
        )
    }
}

fn fill_placeholders(template: &str, topic: u32, question: u32) -> String {
    template
        .replace(TOPIC_PLACEHOLDER, &topic.to_string())
        .replace(QUESTION_PLACEHOLDER, &question.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExamConfig {
        ExamConfig {
            exam: "saa-c03".to_string(),
            title: "SAA-C03 topic #TOPIC question #QUESTION discussion".to_string(),
            keyword: "saa-c03 topic #TOPIC question #QUESTION".to_string(),
            url_substring: "aws-certified-solutions-architect-associate-saa-c03".to_string(),
        }
    }

    #[test]
    fn test_placeholders_replaced() {
        let exam = sample();
        assert_eq!(
            exam.title_for(2, 17),
            "SAA-C03 topic 2 question 17 discussion"
        );
        assert_eq!(exam.keyword_for(1, 5), "saa-c03 topic 1 question 5");
    }

    #[test]
    fn test_template_without_placeholders_is_unchanged() {
        let mut exam = sample();
        exam.keyword = "plain keyword".to_string();
        assert_eq!(exam.keyword_for(3, 9), "plain keyword");
    }

    #[test]
    fn test_file_names() {
        let exam = sample();
        assert_eq!(exam.question_file_name(1, 12), "saa-c03_topic1_question12.pdf");
        assert_eq!(
            exam.merged_file_name(1, 1, 20),
            "saa-c03_topic1_questions1-20_merged.pdf"
        );
    }
}
