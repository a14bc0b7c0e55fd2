//! # Dumps Search
//!
//! 按题号搜索考试讨论页，渲染成 PDF，只保留答案所在的几页，并可合并成一个文件
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page、文件），只暴露能力
//! - `PdfPrinter` - 唯一的 page owner，提供打印 PDF 的能力
//! - `PdfDocument` - 按页码读写 PDF
//! - `TempDocument` - 离开作用域即删除的临时文件
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个请求
//! - `QueryBuilder` - 构造搜索语句
//! - `Resolver` - 搜索并挑出合格的 URL（带重试）
//! - `Renderer` - 把 URL 渲染成 PDF
//! - `PageExtractor` - 筛选答案页
//! - `PdfMerger` - 合并多个 PDF
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整处理流程
//! - `QuestionCtx` - 上下文封装（exam + topic + question）
//! - `QuestionFlow` - 流程编排（search → render → extract → save）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 题号范围处理器，管理浏览器、统计、合并
//!
//! ## 模块结构

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{PdfDocument, PdfPrinter, TempDocument};
pub use models::{BatchLedger, BatchSummary, ExamConfig, ItemOutcome, UnresolvedReason};
pub use orchestrator::{App, BatchReport};
pub use workflow::{QuestionCtx, QuestionFlow};
