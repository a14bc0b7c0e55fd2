//! 题目处理流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整处理流程
//!
//! 流程顺序：
//! 1. 构造搜索语句 → 解析 URL
//! 2. 渲染页面 → 写入临时文件
//! 3. 筛选页面 → 保存到题目文件
//!
//! 任何一步失败都只影响当前这道题，结果以 [`ItemOutcome`] 返回。

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::infrastructure::{PdfDocument, TempDocument};
use crate::models::{ItemOutcome, UnresolvedReason};
use crate::services::{PageExtractor, QueryBuilder, Renderer, Resolver};
use crate::workflow::question_ctx::QuestionCtx;

/// 题目处理流程
///
/// - 编排单题的完整处理流程
/// - 决定何时搜索、何时渲染、何时记为失败
/// - 不持有浏览器，只依赖业务能力（services）
pub struct QuestionFlow {
    query_builder: QueryBuilder,
    resolver: Resolver,
    renderer: Arc<dyn Renderer>,
    extractor: PageExtractor,
    temp_dir: PathBuf,
}

impl QuestionFlow {
    /// 创建新的题目处理流程
    ///
    /// # 参数
    /// - `temp_dir`: 存放渲染中间文件的目录
    pub fn new(
        query_builder: QueryBuilder,
        resolver: Resolver,
        renderer: Arc<dyn Renderer>,
        extractor: PageExtractor,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            query_builder,
            resolver,
            renderer,
            extractor,
            temp_dir,
        }
    }

    /// 处理一道题
    ///
    /// # 返回
    /// 返回这道题的最终状态，永远不会让整个批次中断
    pub async fn run(&self, ctx: &QuestionCtx) -> ItemOutcome {
        // ========== 步骤 1: 解析 URL ==========
        let query = self
            .query_builder
            .build(&ctx.keyword, &ctx.title, &ctx.url_substring);
        info!("{} 🔍 正在搜索...", ctx);

        let url = match self.resolver.resolve(&query).await {
            Ok(Some(url)) => {
                info!("{} ✓ 找到 URL: {}", ctx, url);
                url
            }
            Ok(None) => {
                warn!("{} ⚠️ 未找到符合条件的 URL", ctx);
                return ItemOutcome::Unresolved {
                    reason: UnresolvedReason::NoMatch,
                };
            }
            Err(e) => {
                warn!("{} ⚠️ 搜索失败: {}", ctx, e);
                return ItemOutcome::Unresolved {
                    reason: UnresolvedReason::ProviderExhausted(e.to_string()),
                };
            }
        };

        // ========== 步骤 2: 渲染并筛选 ==========
        match self.render_and_extract(ctx, &url).await {
            Ok(pages) => {
                info!(
                    "{} ✓ 已保存 {} ({} 页)",
                    ctx,
                    ctx.output_path.display(),
                    pages
                );
                ItemOutcome::Success {
                    url,
                    path: ctx.output_path.clone(),
                    pages,
                }
            }
            Err(e) => {
                warn!("{} ❌ 渲染失败: {}", ctx, e);
                ItemOutcome::RenderFailed {
                    url,
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn render_and_extract(&self, ctx: &QuestionCtx, url: &str) -> Result<usize, AppError> {
        let bytes = self.renderer.render(url).await?;

        let temp = TempDocument::create_in(&self.temp_dir, &bytes)?;
        debug!("{} 临时文件: {}", ctx, temp.path().display());

        let result = self.extract_to(temp.path(), &ctx.output_path);
        temp.discard();
        result
    }

    /// 从临时文件筛选页面并保存到目标路径，失败时不留下残缺文件
    fn extract_to(&self, source: &Path, target: &Path) -> Result<usize, AppError> {
        let doc = PdfDocument::load(source)?;
        let mut filtered = self.extractor.extract(doc)?;

        if let Err(e) = filtered.save(target) {
            if target.exists() {
                if let Err(remove_err) = fs::remove_file(target) {
                    warn!("删除残缺文件失败 {}: {}", target.display(), remove_err);
                }
            }
            return Err(e.into());
        }
        Ok(filtered.page_count())
    }
}
