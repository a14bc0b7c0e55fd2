//! 单题处理结果与批次台账

use std::fmt;
use std::path::PathBuf;

/// 未找到 URL 的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// 搜索成功但没有符合条件的结果
    NoMatch,
    /// 搜索引擎多次重试后仍失败
    ProviderExhausted(String),
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::NoMatch => write!(f, "没有符合条件的搜索结果"),
            UnresolvedReason::ProviderExhausted(e) => write!(f, "搜索失败: {}", e),
        }
    }
}

/// 单题的最终状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// 找到 URL 并生成了筛选后的 PDF
    Success {
        url: String,
        path: PathBuf,
        pages: usize,
    },
    /// 找到 URL 但渲染或提取失败
    RenderFailed { url: String, reason: String },
    /// 没有找到 URL
    Unresolved { reason: UnresolvedReason },
}

/// 各状态计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub resolved: usize,
    pub render_failed: usize,
    pub unresolved: usize,
}

/// 批次台账
///
/// 每道题追加一次，批次结束后只读。
#[derive(Debug, Default)]
pub struct BatchLedger {
    entries: Vec<(u32, ItemOutcome)>,
}

impl BatchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一道题的结果
    pub fn record(&mut self, question: u32, outcome: ItemOutcome) {
        self.entries.push((question, outcome));
    }

    pub fn entries(&self) -> &[(u32, ItemOutcome)] {
        &self.entries
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.entries.len(),
            ..Default::default()
        };
        for (_, outcome) in &self.entries {
            match outcome {
                ItemOutcome::Success { .. } => summary.resolved += 1,
                ItemOutcome::RenderFailed { .. } => summary.render_failed += 1,
                ItemOutcome::Unresolved { .. } => summary.unresolved += 1,
            }
        }
        summary
    }

    /// 成功生成的文件，按题号升序
    pub fn successful_documents(&self) -> Vec<(u32, PathBuf)> {
        let mut docs: Vec<(u32, PathBuf)> = self
            .entries
            .iter()
            .filter_map(|(question, outcome)| match outcome {
                ItemOutcome::Success { path, .. } => Some((*question, path.clone())),
                _ => None,
            })
            .collect();
        docs.sort_by_key(|(question, _)| *question);
        docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(path: &str) -> ItemOutcome {
        ItemOutcome::Success {
            url: format!("https://example.com/{}", path),
            path: PathBuf::from(path),
            pages: 3,
        }
    }

    #[test]
    fn test_summary_counts_each_state() {
        let mut ledger = BatchLedger::new();
        ledger.record(1, success("q1.pdf"));
        ledger.record(
            2,
            ItemOutcome::RenderFailed {
                url: "https://example.com/2".to_string(),
                reason: "timeout".to_string(),
            },
        );
        ledger.record(
            3,
            ItemOutcome::Unresolved {
                reason: UnresolvedReason::NoMatch,
            },
        );
        ledger.record(
            4,
            ItemOutcome::Unresolved {
                reason: UnresolvedReason::ProviderExhausted("boom".to_string()),
            },
        );

        assert_eq!(
            ledger.summary(),
            BatchSummary {
                total: 4,
                resolved: 1,
                render_failed: 1,
                unresolved: 2,
            }
        );
    }

    #[test]
    fn test_successful_documents_sorted_by_question() {
        let mut ledger = BatchLedger::new();
        ledger.record(7, success("q7.pdf"));
        ledger.record(
            3,
            ItemOutcome::Unresolved {
                reason: UnresolvedReason::NoMatch,
            },
        );
        ledger.record(2, success("q2.pdf"));

        let docs = ledger.successful_documents();
        assert_eq!(
            docs,
            vec![(2, PathBuf::from("q2.pdf")), (7, PathBuf::from("q7.pdf"))]
        );
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = BatchLedger::new();
        assert_eq!(ledger.summary(), BatchSummary::default());
        assert!(ledger.successful_documents().is_empty());
    }
}
