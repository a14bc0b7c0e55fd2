//! 批量题目处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一个题号范围的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建搜索引擎、启动或连接浏览器
//! 2. **顺序处理**：按题号依次交给 `QuestionFlow`，结果写入台账
//! 3. **统计**：输出各状态的数量
//! 4. **合并**：按题号顺序合并成功的文件，按需清理单题文件
//! 5. **资源管理**：唯一持有浏览器的模块，结束时负责关闭

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, info_span, warn, Instrument};

use crate::browser;
use crate::cli::Args;
use crate::config::Config;
use crate::error::{AppResult, MergeError};
use crate::models::{BatchLedger, BatchSummary, ExamConfig};
use crate::services::{
    BrowserRenderer, DuckDuckGoProvider, MergeReport, PageExtractor, PdfMerger, QueryBuilder,
    Renderer, Resolver, SearchProvider,
};
use crate::utils::logging;
use crate::workflow::{QuestionCtx, QuestionFlow};

/// 应用主结构
pub struct App {
    exam: ExamConfig,
    args: Args,
    flow: QuestionFlow,
    merger: PdfMerger,
    browser: Option<Arc<BrowserRenderer>>,
}

/// 一次运行的结果
#[derive(Debug)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub ledger: BatchLedger,
    pub merge: Option<MergeOutcome>,
}

/// 合并及清理结果
#[derive(Debug)]
pub struct MergeOutcome {
    pub report: MergeReport,
    /// 已删除的单题文件数
    pub removed: usize,
    /// 删除失败的单题文件数
    pub removal_failures: usize,
}

/// dry-run 模式下每道题的计划
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem {
    pub question: u32,
    pub query: String,
    pub output_path: PathBuf,
}

impl App {
    /// 初始化应用：创建搜索引擎并获取浏览器
    pub async fn initialize(config: &Config, exam: ExamConfig, args: Args) -> anyhow::Result<Self> {
        let provider = DuckDuckGoProvider::new().context("创建搜索客户端失败")?;

        info!("🌐 正在准备浏览器...");
        let session = browser::acquire(&config.browser)
            .await
            .context("获取浏览器失败")?;
        let renderer = Arc::new(BrowserRenderer::new(
            session,
            Duration::from_secs(config.browser.render_timeout_secs),
            info_span!("renderer"),
        ));

        let mut app = Self::with_components(
            config,
            exam,
            args,
            Arc::new(provider),
            renderer.clone(),
        );
        app.browser = Some(renderer);
        Ok(app)
    }

    /// 使用给定的搜索引擎和渲染器组装应用
    pub fn with_components(
        config: &Config,
        exam: ExamConfig,
        args: Args,
        provider: Arc<dyn SearchProvider>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        let flow = QuestionFlow::new(
            QueryBuilder::new(&config.site),
            Resolver::new(provider, &config.search, info_span!("resolver")),
            renderer,
            PageExtractor::new(config.pages, info_span!("extractor")),
            args.output.clone(),
        );

        Self {
            exam,
            args,
            flow,
            merger: PdfMerger::new(info_span!("merger")),
            browser: None,
        }
    }

    /// 运行应用主逻辑
    ///
    /// 单题失败只记录在台账中；合并失败作为错误返回。
    pub async fn run(&self) -> AppResult<BatchReport> {
        let Args {
            begin, end, topic, ..
        } = self.args;

        logging::log_startup(&self.exam.exam, topic, begin, end, &self.args.output);
        fs::create_dir_all(&self.args.output)?;

        let mut ledger = BatchLedger::new();
        for question in begin..=end {
            let ctx = QuestionCtx::new(&self.exam, topic, question, &self.args.output);
            let outcome = self
                .flow
                .run(&ctx)
                .instrument(info_span!("question", n = question))
                .await;
            ledger.record(question, outcome);
        }

        logging::log_summary(&ledger);
        let merge = self.merge_and_cleanup(&ledger)?;

        Ok(BatchReport {
            summary: ledger.summary(),
            ledger,
            merge,
        })
    }

    /// 关闭浏览器（如果是本程序启动的）
    pub async fn shutdown(self) {
        let App { flow, browser, .. } = self;
        drop(flow);

        if let Some(renderer) = browser {
            match Arc::try_unwrap(renderer) {
                Ok(renderer) => renderer.shutdown().await,
                Err(_) => warn!("浏览器仍在使用中，跳过关闭"),
            }
        }
    }

    fn merge_and_cleanup(&self, ledger: &BatchLedger) -> Result<Option<MergeOutcome>, MergeError> {
        if !self.args.merge {
            return Ok(None);
        }

        let inputs: Vec<PathBuf> = ledger
            .successful_documents()
            .into_iter()
            .map(|(_, path)| path)
            .collect();
        if inputs.is_empty() {
            warn!("⚠️ 没有成功生成的文件，跳过合并");
            return Ok(None);
        }

        let output = self.args.output.join(self.exam.merged_file_name(
            self.args.topic,
            self.args.begin,
            self.args.end,
        ));
        info!("📚 正在合并 {} 个文件...", inputs.len());
        let report = self.merger.merge(&inputs, &output)?;

        let (removed, removal_failures) = if self.args.keep_individual {
            (0, 0)
        } else {
            remove_files(&report.merged_inputs)
        };
        logging::log_merge_summary(&report, removed, removal_failures);

        Ok(Some(MergeOutcome {
            report,
            removed,
            removal_failures,
        }))
    }
}

/// 生成 dry-run 计划：每道题的搜索语句和输出文件
pub fn plan_batch(config: &Config, exam: &ExamConfig, args: &Args) -> Vec<PlannedItem> {
    let builder = QueryBuilder::new(&config.site);
    (args.begin..=args.end)
        .map(|question| {
            let ctx = QuestionCtx::new(exam, args.topic, question, &args.output);
            let query = builder.build(&ctx.keyword, &ctx.title, &ctx.url_substring);
            PlannedItem {
                question,
                query: query.text,
                output_path: ctx.output_path,
            }
        })
        .collect()
}

/// 删除已合并的单题文件，返回 (成功数, 失败数)
fn remove_files(paths: &[PathBuf]) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => {
                warn!("删除文件失败 {}: {}", path.display(), e);
                failed += 1;
            }
        }
    }
    (removed, failed)
}

// ========== 日志辅助函数 ==========

/// 打印 dry-run 计划
pub fn log_plan(plan: &[PlannedItem], merged_name: Option<String>) {
    info!("{}", "=".repeat(60));
    info!("📝 Dry run - 不会联网，也不会启动浏览器");
    info!("{}", "=".repeat(60));
    for item in plan {
        info!("题目 {}: {}", item.question, item.query);
        info!("    → {}", item.output_path.display());
    }
    if let Some(name) = merged_name {
        info!("📚 合并输出: {}", name);
    }
}
