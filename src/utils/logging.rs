//! 日志工具模块
//!
//! 提供日志初始化和格式化输出的辅助函数

use anyhow::{anyhow, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::models::{BatchLedger, ItemOutcome};
use crate::services::MergeReport;

/// 初始化全局日志
///
/// # 参数
/// - `level`: 配置中的日志级别（debug / info / warning / error）
/// - `verbose`: 为 true 时强制使用 debug
///
/// 设置了 `RUST_LOG` 时以环境变量为准。
pub fn init(level: &str, verbose: bool) -> Result<()> {
    let directive = if verbose { "debug" } else { level_directive(level) };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("初始化日志失败: {}", e))
}

/// 把配置中的级别名称转换成过滤指令，无法识别时使用 info
pub fn level_directive(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "debug" => "debug",
        "warning" | "warn" => "warn",
        "error" => "error",
        _ => "info",
    }
}

/// 记录程序启动信息
///
/// # 参数
/// - `exam`: 考试代码
/// - `topic`: 主题编号
/// - `begin` / `end`: 题号范围
/// - `output`: 输出目录
pub fn log_startup(exam: &str, topic: u32, begin: u32, end: u32, output: &std::path::Path) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📋 考试: {} 主题: {}", exam, topic);
    info!("📄 题号范围: {}-{} (共 {} 题)", begin, end, end - begin + 1);
    info!("📁 输出目录: {}", output.display());
    info!("{}", "=".repeat(60));
}

/// 打印批次统计信息
///
/// 每道题的失败原因只在 debug 级别输出
pub fn log_summary(ledger: &BatchLedger) {
    let summary = ledger.summary();

    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", summary.resolved, summary.total);
    info!("❌ 渲染失败: {}", summary.render_failed);
    info!("⚠️ 未找到: {}", summary.unresolved);
    info!("{}", "=".repeat(60));

    for (question, outcome) in ledger.entries() {
        match outcome {
            ItemOutcome::Success { .. } => {}
            ItemOutcome::RenderFailed { url, reason } => {
                debug!("题目 {}: 渲染失败 {} ({})", question, url, reason)
            }
            ItemOutcome::Unresolved { reason } => debug!("题目 {}: {}", question, reason),
        }
    }
}

/// 打印合并结果
///
/// # 参数
/// - `report`: 合并结果
/// - `removed`: 已删除的单题文件数
/// - `failed`: 删除失败的单题文件数
pub fn log_merge_summary(report: &MergeReport, removed: usize, failed: usize) {
    info!("\n{}", "─".repeat(60));
    info!("📚 合并完成: {}", report.output.display());
    info!(
        "共 {} 页, 来自 {} 个文件",
        report.page_count,
        report.merged_inputs.len()
    );
    if !report.skipped_inputs.is_empty() {
        warn!("跳过了 {} 个无效文件", report.skipped_inputs.len());
    }
    if removed > 0 || failed > 0 {
        info!("🧹 已清理单题文件: {} 个, 失败 {} 个", removed, failed);
    }
    info!("{}", "─".repeat(60));
}
